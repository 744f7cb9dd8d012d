use log::info;
use std::error::Error;
use std::io::stdout;
use tokio::io::{ AsyncBufReadExt, BufReader };

use super::ChatArgs;
use crate::config::widget::WidgetConfig;
use crate::widget::store::FileStore;
use crate::widget::transport::HttpRelayTransport;
use crate::widget::view::TerminalView;
use crate::widget::{ SubmitOutcome, Widget };

/// Runs the widget loop against a relay, reading input lines from stdin.
pub async fn run_chat(
    args: &ChatArgs,
    config: WidgetConfig
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let transport = HttpRelayTransport::new(&args.endpoint, &config.endpoint)?;
    info!("Chatting with relay at {}", transport.url());
    info!("Conversation is kept in {}", args.history_file);

    let view = TerminalView::new(stdout(), config.assistant_name.clone());
    let store = FileStore::new(&args.history_file);
    let mut widget = Widget::initialize(config, store, transport, view);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "/quit" | "/exit" => {
                break;
            }
            "/reset" => widget.reset(),
            text => {
                if let SubmitOutcome::Replied { fallback: true, .. } = widget.submit(text).await {
                    info!("Relay answered with the fallback reply");
                }
            }
        }
    }

    Ok(())
}
