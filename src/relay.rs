use log::{ error, info };

use crate::llm::chat::ChatClient;
use crate::models::chat::{ RelayResponse, Turn };

/// Reply sent whenever any step of the relay fails.
pub const FALLBACK_REPLY: &str = "Omlouvám se, došlo k chybě.";

/// Forwards a conversation upstream and always comes back with a reply.
///
/// Failures of every kind are logged here and replaced by the fallback reply.
pub async fn relay(client: &dyn ChatClient, turns: &[Turn], fallback: &str) -> RelayResponse {
    match client.generate(turns).await {
        Ok(reply) => {
            info!("Relayed {} turns, reply of {} chars", turns.len(), reply.chars().count());
            RelayResponse { reply }
        }
        Err(e) => {
            error!("Relay to {} failed: {}", client.get_model(), e);
            RelayResponse { reply: fallback.to_string() }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RelayError;
    use async_trait::async_trait;

    struct Scripted(fn() -> Result<String, RelayError>);

    #[async_trait]
    impl ChatClient for Scripted {
        async fn generate(&self, _turns: &[Turn]) -> Result<String, RelayError> {
            (self.0)()
        }

        fn get_model(&self) -> String {
            "scripted".into()
        }
    }

    #[tokio::test]
    async fn passes_reply_through() {
        let client = Scripted(|| Ok("Dobrý den!".into()));
        let resp = relay(&client, &[Turn::user("Ahoj")], FALLBACK_REPLY).await;
        assert_eq!(resp.reply, "Dobrý den!");
    }

    #[tokio::test]
    async fn every_error_becomes_fallback() {
        let failures: [fn() -> Result<String, RelayError>; 4] = [
            || Err(RelayError::MissingApiKey),
            || Err(RelayError::MissingReply),
            || Err(RelayError::EmptyConversation),
            || Err(RelayError::Upstream { status: 503, message: "UNAVAILABLE".into() }),
        ];
        for failure in failures {
            let resp = relay(&Scripted(failure), &[Turn::user("Ahoj")], FALLBACK_REPLY).await;
            assert_eq!(resp.reply, FALLBACK_REPLY);
        }
    }
}
