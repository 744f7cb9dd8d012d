use serde::{ Deserialize, Serialize };
use std::fs;
use std::path::Path;
use log::info;

use crate::error::ConfigError;
use crate::models::chat::Turn;
use crate::relay::FALLBACK_REPLY;

const AVATAR_URL: &str =
    "https://images.unsplash.com/photo-1494790108377-be9c29b29330?w=140&h=140&fit=crop&crop=face";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QuickLink {
    pub label: String,
    pub question: String,
}

/// Persona and wiring of the chat widget.
///
/// Shared by the server (page rendering, fallback reply) and both widget
/// implementations. Every field may be overridden from a JSON file; fields
/// the file leaves out keep their defaults.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct WidgetConfig {
    pub page_title: String,
    pub assistant_name: String,
    pub assistant_status: String,
    pub avatar_url: String,
    pub system_prompt: String,
    pub welcome_message: String,
    pub fallback_reply: String,
    pub input_placeholder: String,
    pub storage_key: String,
    pub endpoint: String,
    pub quick_links_title: String,
    pub quick_links: Vec<QuickLink>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        let link = |label: &str, question: &str| QuickLink {
            label: label.to_string(),
            question: question.to_string(),
        };
        Self {
            page_title: "Terezka - EDC Chatbot".into(),
            assistant_name: "Terezka".into(),
            assistant_status: "Online • EDC Asistentka".into(),
            avatar_url: AVATAR_URL.into(),
            system_prompt: "Jsi Terezka, milá a lidská virtuální asistentka EDC. Odpovídej vždy česky, přátelsky a primárně z EDC.".into(),
            welcome_message: "Vítejte! Jsem Terezka, vaše virtuální asistentka EDC. Jak vám dnes mohu pomoci?".into(),
            fallback_reply: FALLBACK_REPLY.into(),
            input_placeholder: "Napište zprávu…".into(),
            storage_key: "terezaMessages".into(),
            endpoint: "/api/chat".into(),
            quick_links_title: "Rychlé odkazy".into(),
            quick_links: vec![
                link("O společnosti", "Co je EDC?"),
                link("Kontakty a sídlo", "Jaké jsou kontakty na EDC?"),
                link("Komunitní energetika", "Co je sdílení energie v komunitě?"),
                link("Video návody", "Jak fungují videonávody ke sdílení?"),
                link("Dokumenty", "Kde najdu dokumenty ke sdílení?"),
                link("FAQ", "FAQ ke sdílení elektřiny")
            ],
        }
    }
}

impl WidgetConfig {
    pub fn welcome_turn(&self) -> Turn {
        Turn::model(self.welcome_message.clone())
    }

    pub fn system_turn(&self) -> Turn {
        Turn::system(self.system_prompt.clone())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("welcomeMessage", &self.welcome_message),
            ("fallbackReply", &self.fallback_reply),
            ("storageKey", &self.storage_key),
            ("endpoint", &self.endpoint),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("'{}' must not be empty", name)));
            }
        }
        Ok(())
    }
}

pub fn load_widget_config<P: AsRef<Path>>(path: P) -> Result<WidgetConfig, ConfigError> {
    let json_str = fs::read_to_string(&path)?;
    let config: WidgetConfig = serde_json::from_str(&json_str)?;
    config.validate()?;
    info!("Loaded widget config from {}", path.as_ref().display());
    Ok(config)
}

/// Loads the configured file, or the built-in persona when none is given.
pub fn resolve_widget_config(path: Option<&str>) -> Result<WidgetConfig, ConfigError> {
    match path.filter(|p| !p.trim().is_empty()) {
        Some(p) => load_widget_config(p),
        None => Ok(WidgetConfig::default()),
    }
}
