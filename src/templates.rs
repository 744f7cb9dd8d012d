use minijinja::{ context, AutoEscape, Environment };
use serde::Serialize;

use crate::config::widget::WidgetConfig;
use crate::models::chat::{ Role, Turn };

pub const WIDGET_CSS: &str = include_str!("../assets/widget.css");
pub const WIDGET_JS: &str = include_str!("../assets/widget.js");

const INDEX: &str = "index.html";
const MESSAGES: &str = "messages.html";

/// A turn as the message template sees it.
#[derive(Serialize)]
struct Bubble<'a> {
    role: &'static str,
    text: &'a str,
}

fn bubbles(turns: &[Turn]) -> Vec<Bubble<'_>> {
    turns
        .iter()
        .filter(|t| t.role != Role::System)
        .map(|t| Bubble { role: t.role.as_str(), text: &t.text })
        .collect()
}

/// The widget page and its message list, rendered with HTML autoescape.
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.add_template(INDEX, include_str!("../assets/index.html"))?;
        env.add_template(MESSAGES, include_str!("../assets/messages.html"))?;
        Ok(Self { env })
    }

    /// Markup of the message list. System turns are instructions, not bubbles.
    pub fn render_messages(&self, turns: &[Turn], avatar_url: &str) -> Result<String, minijinja::Error> {
        self.env.get_template(MESSAGES)?.render(context! {
            turns => bubbles(turns),
            avatar_url => avatar_url,
        })
    }

    /// The widget page, with the welcome turn already drawn for first paint.
    pub fn render_page(&self, config: &WidgetConfig) -> Result<String, minijinja::Error> {
        let welcome = [config.welcome_turn()];
        self.env.get_template(INDEX)?.render(context! {
            config => config,
            turns => bubbles(&welcome),
            avatar_url => config.avatar_url.as_str(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_in_turn_text() {
        let templates = Templates::new().unwrap();
        let html = templates
            .render_messages(&[Turn::user("<script>alert('x')</script>")], "a.png")
            .unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn user_and_model_bubbles_differ_and_keep_order() {
        let templates = Templates::new().unwrap();
        let html = templates
            .render_messages(
                &[Turn::system("tajné"), Turn::model("Vítejte!"), Turn::user("Ahoj")],
                "a.png"
            )
            .unwrap();
        let bot = html.find(r#"<div class="tereza-bot">"#).unwrap();
        let user = html.find(r#"<div class="tereza-user">"#).unwrap();
        assert!(bot < user);
        assert_eq!(html.matches(r#"class="tereza-bubble""#).count(), 2);
        assert!(!html.contains("tajné"));
    }

    #[test]
    fn page_has_one_bubble_and_quick_links() {
        let page = Templates::new().unwrap().render_page(&WidgetConfig::default()).unwrap();
        assert_eq!(page.matches(r#"class="tereza-bot""#).count(), 1);
        assert_eq!(page.matches(r#"class="tereza-user""#).count(), 0);
        assert!(!page.contains("{{"));
        assert!(!page.contains("{%"));
        assert!(page.contains("<title>Terezka - EDC Chatbot</title>"));
        assert_eq!(page.matches(r#"class="tereza-item""#).count(), 6);
    }

    #[test]
    fn injected_config_cannot_close_script() {
        let config = WidgetConfig {
            system_prompt: "</script><script>alert(1)</script>".into(),
            ..WidgetConfig::default()
        };
        let page = Templates::new().unwrap().render_page(&config).unwrap();
        assert_eq!(page.matches("</script>").count(), 2);
    }

    #[test]
    fn injected_config_round_trips() {
        let page = Templates::new().unwrap().render_page(&WidgetConfig::default()).unwrap();
        let marker = r#"type="application/json">"#;
        let start = page.find(marker).unwrap() + marker.len();
        let end = start + page[start..].find("</script>").unwrap();
        let parsed: WidgetConfig = serde_json::from_str(&page[start..end]).unwrap();
        assert_eq!(parsed, WidgetConfig::default());
    }
}
