pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod relay;
pub mod server;
pub mod templates;
pub mod widget;

use cli::{ Args, Command };
use config::widget::{ resolve_widget_config, WidgetConfig };
use llm::LlmConfig;
use llm::chat::new_client;
use log::{ info, warn };
use server::Server;
use server::api::AppState;
use std::error::Error;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let widget_config = resolve_widget_config(args.widget_config.as_deref())?;

    match args.command {
        Some(Command::Chat(ref chat_args)) => cli::chat::run_chat(chat_args, widget_config).await,
        None | Some(Command::Serve) => serve(args, widget_config).await,
    }
}

async fn serve(args: Args, widget_config: WidgetConfig) -> Result<(), Box<dyn Error + Send + Sync>> {
    let llm_config = LlmConfig::from_args(&args);

    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Chat Model: {}", args.chat_model);
    info!("Chat Base URL: {}", args.chat_base_url);
    info!("API Key Configured: {}", llm_config.has_api_key());
    info!("Widget Config: {}", args.widget_config.as_deref().unwrap_or("built-in"));
    info!("Static Dir: {}", args.static_dir.as_deref().unwrap_or("none"));
    info!("TLS Enabled: {}", args.enable_tls);
    info!("-------------------------");

    if !llm_config.has_api_key() {
        warn!("GOOGLE_API_KEY is not set. Every chat request will get the fallback reply.");
    }

    let client = new_client(&llm_config);
    let state = AppState::new(client, widget_config)?;
    let server = Server::new(args.server_addr.clone(), state, args);
    server.run().await?;

    Ok(())
}
