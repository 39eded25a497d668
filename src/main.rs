//! Gridball Headless Client
//!
//! Connects to the game server, joins with the identity from the
//! environment, and drives the engine from stdin: arrow key names or
//! `up`/`down`/`left`/`right`, `start` to begin the match, `quit` to
//! leave.

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use gridball::{
    AsciiView, ClientConfig, EnvIdentity, InputEvent, SyncClient, BOARD_COLUMNS, BOARD_ROWS,
    VERSION,
};

/// Map one stdin line to an input event. Unknown words pass through as
/// raw key names, which the engine treats as inert.
fn parse_line(line: &str) -> Option<InputEvent> {
    let word = line.trim();
    match word {
        "" => None,
        "start" => Some(InputEvent::GameStarted),
        "quit" | "exit" => Some(InputEvent::Shutdown),
        "up" | "w" => Some(InputEvent::Key("ArrowUp".into())),
        "down" | "s" => Some(InputEvent::Key("ArrowDown".into())),
        "left" | "a" => Some(InputEvent::Key("ArrowLeft".into())),
        "right" | "d" => Some(InputEvent::Key("ArrowRight".into())),
        other => Some(InputEvent::Key(other.to_owned())),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Gridball client v{}", VERSION);
    info!("Board: {}x{} cells", BOARD_COLUMNS, BOARD_ROWS);

    let hostname = std::env::var("HOSTNAME").unwrap_or_default();
    let config = ClientConfig::for_host(&hostname);
    info!("Endpoint: {}", config.endpoint);

    let mut provider = EnvIdentity::new();
    let persisted = EnvIdentity::new();
    let (client, mut events) = SyncClient::new(config, AsciiView::new());

    // Stdin feeds the input channel; the engine consumes it as discrete
    // events.
    let (input_tx, input_rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let Some(event) = parse_line(&line) else {
                continue;
            };
            let stop = event == InputEvent::Shutdown;
            if input_tx.send(event).is_err() || stop {
                break;
            }
        }
    });

    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            debug!(?event, "game event");
        }
    });

    if let Err(err) = client
        .run(&mut provider, &persisted, input_rx)
        .await
        .context("client stopped")
    {
        error!("{err:#}");
        return Err(err);
    }

    Ok(())
}
