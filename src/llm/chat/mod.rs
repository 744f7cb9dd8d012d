pub mod gemini;

use async_trait::async_trait;
use std::sync::Arc;

use super::LlmConfig;
use self::gemini::GeminiChatClient;
use crate::error::RelayError;
use crate::models::chat::Turn;

/// An upstream provider that turns a conversation into one reply.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn generate(&self, turns: &[Turn]) -> Result<String, RelayError>;

    fn get_model(&self) -> String;
}

pub fn new_client(config: &LlmConfig) -> Arc<dyn ChatClient> {
    Arc::new(GeminiChatClient::from_config(config))
}
