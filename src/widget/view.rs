use std::io::Write;
use std::sync::Arc;

use log::{ debug, warn };

use crate::models::chat::{ Role, Turn };
use crate::templates::Templates;

/// Where the widget draws itself.
pub trait View {
    /// Full redraw of the message list, ending scrolled to the newest turn.
    fn draw(&mut self, turns: &[Turn]);
    fn set_typing(&mut self, visible: bool);
}

/// Keeps the last drawn markup, the way the browser keeps the DOM.
pub struct HtmlView {
    templates: Arc<Templates>,
    avatar_url: String,
    markup: String,
    bubbles: usize,
    scrolled_to_latest: bool,
    typing_visible: bool,
    draws: usize,
}

impl HtmlView {
    pub fn new(templates: Arc<Templates>, avatar_url: impl Into<String>) -> Self {
        Self {
            templates,
            avatar_url: avatar_url.into(),
            markup: String::new(),
            bubbles: 0,
            scrolled_to_latest: false,
            typing_visible: false,
            draws: 0,
        }
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn bubble_count(&self) -> usize {
        self.bubbles
    }

    pub fn is_scrolled_to_latest(&self) -> bool {
        self.scrolled_to_latest
    }

    pub fn is_typing_visible(&self) -> bool {
        self.typing_visible
    }

    pub fn draw_count(&self) -> usize {
        self.draws
    }
}

impl View for HtmlView {
    fn draw(&mut self, turns: &[Turn]) {
        match self.templates.render_messages(turns, &self.avatar_url) {
            Ok(markup) => self.markup = markup,
            // Keep the previous markup; the turns are still in the conversation.
            Err(e) => warn!("Failed to render messages: {}", e),
        }
        self.bubbles = turns
            .iter()
            .filter(|t| t.role != Role::System)
            .count();
        self.scrolled_to_latest = true;
        self.draws += 1;
    }

    fn set_typing(&mut self, visible: bool) {
        self.typing_visible = visible;
    }
}

/// Prints the transcript to a terminal.
///
/// Appends only what is new; a conversation that got shorter (reset) is
/// printed again from the top.
pub struct TerminalView<W: Write> {
    out: W,
    assistant_name: String,
    shown: usize,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W, assistant_name: impl Into<String>) -> Self {
        Self { out, assistant_name: assistant_name.into(), shown: 0 }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn label(&self, role: Role) -> &str {
        match role {
            Role::Model => &self.assistant_name,
            Role::User => "Vy",
            Role::System => "system",
        }
    }

    /// A closed terminal must not take the conversation down with it.
    fn write_line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{}", line) {
            debug!("Terminal write failed: {}", e);
        }
    }

    fn flush(&mut self) {
        if let Err(e) = self.out.flush() {
            debug!("Terminal flush failed: {}", e);
        }
    }
}

impl<W: Write> View for TerminalView<W> {
    fn draw(&mut self, turns: &[Turn]) {
        if turns.len() < self.shown {
            self.write_line("----------------");
            self.shown = 0;
        }
        let lines = turns[self.shown..]
            .iter()
            .filter(|t| t.role != Role::System)
            .map(|t| format!("{}: {}", self.label(t.role), t.text))
            .collect::<Vec<_>>();
        for line in lines {
            self.write_line(&line);
        }
        self.shown = turns.len();
        self.flush();
    }

    fn set_typing(&mut self, visible: bool) {
        if visible {
            let line = format!("{} píše…", self.assistant_name);
            self.write_line(&line);
            self.flush();
        }
    }
}
