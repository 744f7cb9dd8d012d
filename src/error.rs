use thiserror::Error;

/// Everything that can go wrong between receiving a conversation and
/// extracting a reply. None of these reach the widget; the relay maps all of
/// them to the fallback reply.
#[derive(Debug, Error)]
pub enum RelayError {
    /// No key is configured. Raised before any outbound request: a keyless
    /// call could only come back as an upstream auth error, so the relay
    /// answers with the fallback reply without touching the network.
    #[error("no API key configured for the upstream provider")]
    MissingApiKey,

    #[error("conversation has no user or model turns to send")]
    EmptyConversation,

    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned {status}: {message}")]
    Upstream {
        status: u16,
        message: String,
    },

    #[error("upstream payload could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("upstream response carried no reply text")]
    MissingReply,

    /// The caller stopped waiting before the relay answered.
    #[error("relay call was cancelled")]
    Cancelled,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("history file IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("history JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
