//! Tutor client - terminal front end for the tutoring chat
//!
//! Drives a conversation state machine against the tutoring service:
//! typed or photographed exercises, streamed hints and answer checks.

mod backend;
mod chat;
mod config;
mod input;
mod runtime;
mod state_machine;
mod stream;

use backend::{HttpBackend, LoggingBackend};
use chat::TerminalView;
use config::ClientConfig;
use input::{parse_input, InputCommand};
use runtime::{spawn_conversation, RuntimeInput};
use state_machine::ConvContext;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging; stdout belongs to the chat
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tutor_client=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = ClientConfig::from_env();
    tracing::info!(
        api_url = %config.api_url,
        student = %config.student_name,
        timeout_secs = ?config.request_timeout.map(|t| t.as_secs()),
        "Starting tutor client"
    );

    let backend = LoggingBackend::new(HttpBackend::new(&config)?);
    let context = ConvContext::new(uuid::Uuid::new_v4().to_string(), config.student_name);
    let handle = spawn_conversation(context, backend, TerminalView::new(std::io::stdout()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = match parse_input(&line) {
            InputCommand::Dispatch(event) => RuntimeInput::Event(event),
            InputCommand::Reset => RuntimeInput::Reset,
            InputCommand::Help => {
                println!("{}", input::HELP);
                continue;
            }
            InputCommand::Usage(usage) => {
                println!("{usage}");
                continue;
            }
            InputCommand::Quit => break,
        };

        if handle.send(input).await.is_err() {
            tracing::warn!("Conversation stopped, no longer accepting input");
            break;
        }
    }

    handle.shutdown().await?;
    tracing::info!("Tutor client stopped");
    Ok(())
}
