pub mod chat;

use clap::{ Parser, Subcommand };

use crate::llm::chat::gemini::{ DEFAULT_BASE_URL, DEFAULT_MODEL };

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    // --- Server Args ---
    /// Host address and port for the server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:8000")]
    pub server_addr: String,

    /// Optional directory whose files are served for paths no route matches.
    #[arg(long, env = "STATIC_DIR")]
    pub static_dir: Option<String>,

    /// Optional JSON file overriding the widget persona (name, prompts, quick links).
    #[arg(long, env = "WIDGET_CONFIG_PATH")]
    pub widget_config: Option<String>,

    // --- Upstream Provider Args ---
    /// API key for the Gemini API. Without it every chat call answers with the fallback reply.
    #[arg(long, env = "GOOGLE_API_KEY", default_value = "", hide_env_values = true)]
    pub google_api_key: String,

    /// Model name used for generateContent calls.
    #[arg(long, env = "CHAT_MODEL", default_value = DEFAULT_MODEL)]
    pub chat_model: String,

    /// Base URL of the Gemini API, without the model path.
    #[arg(long, env = "CHAT_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub chat_base_url: String,

    // --- TLS Args ---
    /// Optional path to the TLS certificate file (PEM format). Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format). Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP relay and serve the widget page (default).
    Serve,
    /// Chat with a running relay from the terminal.
    Chat(ChatArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct ChatArgs {
    /// Base URL of a running relay.
    #[arg(long, env = "RELAY_ENDPOINT", default_value = "http://127.0.0.1:8000")]
    pub endpoint: String,

    /// File holding the persisted conversation.
    #[arg(long, env = "HISTORY_FILE", default_value = ".terezka_history.json")]
    pub history_file: String,
}
