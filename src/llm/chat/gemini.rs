use async_trait::async_trait;
use log::{ debug, info };
use reqwest::Client as HttpClient;
use serde::{ Deserialize, Serialize };

use super::ChatClient;
use crate::error::RelayError;
use crate::llm::LlmConfig;
use crate::models::chat::{ Role, Turn };

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GeminiContent>,
    pub contents: Vec<GeminiContent>,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<&'static str>,
    pub parts: Vec<GeminiPart>,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct GeminiPart {
    pub text: String,
}

// Every level is optional; a missing segment must end in `MissingReply`
// rather than a decode error.
#[derive(Deserialize)]
struct GoogleResponse {
    candidates: Option<Vec<GoogleCandidate>>,
}

#[derive(Deserialize)]
struct GoogleCandidate {
    content: Option<GoogleContent>,
}

#[derive(Deserialize)]
struct GoogleContent {
    parts: Option<Vec<GooglePart>>,
}

#[derive(Deserialize)]
struct GooglePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct GoogleErrorBody {
    error: GoogleError,
}

#[derive(Deserialize)]
struct GoogleError {
    message: Option<String>,
    status: Option<String>,
}

/// Translates a conversation into a `generateContent` body.
///
/// System turns are lifted into `systemInstruction`; the provider does not
/// accept them inside `contents`. Neighbouring turns of the same role are
/// merged because the provider expects user and model turns to alternate.
pub fn to_gemini_request(turns: &[Turn]) -> Result<GenerateContentRequest, RelayError> {
    let mut system_texts = Vec::new();
    let mut contents: Vec<GeminiContent> = Vec::new();

    for turn in turns {
        let role = match turn.role {
            Role::System => {
                system_texts.push(turn.text.clone());
                continue;
            }
            Role::User => "user",
            Role::Model => "model",
        };
        let part = GeminiPart { text: turn.text.clone() };
        match contents.last_mut() {
            Some(last) if last.role == Some(role) => last.parts.push(part),
            _ =>
                contents.push(GeminiContent {
                    role: Some(role),
                    parts: vec![part],
                }),
        }
    }

    if contents.is_empty() {
        return Err(RelayError::EmptyConversation);
    }

    let system_instruction = if system_texts.is_empty() {
        None
    } else {
        Some(GeminiContent {
            role: None,
            parts: vec![GeminiPart { text: system_texts.join("\n\n") }],
        })
    };

    Ok(GenerateContentRequest { system_instruction, contents })
}

/// Reads `candidates[0].content.parts[0].text` out of a response body.
pub fn extract_reply(body: &str) -> Result<String, RelayError> {
    let parsed: GoogleResponse = serde_json::from_str(body)?;
    parsed.candidates
        .and_then(|c| c.into_iter().next())
        .and_then(|c| c.content)
        .and_then(|c| c.parts)
        .and_then(|p| p.into_iter().next())
        .and_then(|p| p.text)
        .filter(|t| !t.trim().is_empty())
        .ok_or(RelayError::MissingReply)
}

fn upstream_error_message(body: &str) -> String {
    match serde_json::from_str::<GoogleErrorBody>(body) {
        Ok(GoogleErrorBody { error }) =>
            match (error.status, error.message) {
                (Some(status), Some(message)) => format!("{}: {}", status, message),
                (None, Some(message)) => message,
                (Some(status), None) => status,
                (None, None) => "unknown error".to_string(),
            }
        Err(_) => body.chars().take(200).collect(),
    }
}

pub struct GeminiChatClient {
    http: HttpClient,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiChatClient {
    pub fn new(api_key: String, model: Option<String>, base_url: Option<String>) -> Self {
        let model = model
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = base_url
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self {
            http: HttpClient::new(),
            api_key,
            model,
            base_url,
        }
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        Self::new(
            config.api_key.clone().unwrap_or_default(),
            config.completion_model.clone(),
            config.base_url.clone()
        )
    }

    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url.trim_end_matches('/'), self.model)
    }
}

#[async_trait]
impl ChatClient for GeminiChatClient {
    async fn generate(&self, turns: &[Turn]) -> Result<String, RelayError> {
        // Keyless calls never leave the process.
        if self.api_key.trim().is_empty() {
            return Err(RelayError::MissingApiKey);
        }
        let payload = to_gemini_request(turns)?;
        let url = self.endpoint();
        info!("GeminiChatClient::generate() → model={} turns={}", self.model, turns.len());

        let resp = self.http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send().await?;

        let status = resp.status();
        let body = resp.text().await?;
        debug!("Gemini responded {} with {} bytes", status, body.len());

        if !status.is_success() {
            return Err(RelayError::Upstream {
                status: status.as_u16(),
                message: upstream_error_message(&body),
            });
        }

        extract_reply(&body)
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }
}
