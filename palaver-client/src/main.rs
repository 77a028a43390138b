//! palaver - console chat client
//!
//! Connects to a chat server over TCP, prints incoming messages to stdout,
//! and sends stdin lines as chat messages. `/name`, `/room` and `/quit`
//! control the session.

use tokio::io::{AsyncBufReadExt, BufReader};

use palaver_client::cli::Args;
use palaver_client::{config, Session, SessionEvents};
use palaver_utils::{init_logging_with_config, LogConfig, Result};

/// Prints received chat messages to the terminal
struct Console;

impl SessionEvents for Console {
    fn on_message(&mut self, messages: Vec<String>) {
        for message in messages {
            println!("{}", message);
        }
    }

    fn on_connect(&mut self, endpoint: &str) {
        println!("* connected to {}", endpoint);
    }

    fn on_disconnect(&mut self) {
        println!("* disconnected");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_args();

    init_logging_with_config(LogConfig::client())?;
    tracing::info!("palaver client starting");
    tracing::debug!("CLI args: {:?}", args);

    match run(args).await {
        Ok(()) => {
            tracing::info!("palaver client exiting normally");
            Ok(())
        }
        Err(e) => {
            tracing::error!("palaver client error: {}", e);
            eprintln!("Error: {}", e);
            Err(e)
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config = args.apply(config::load());
    let session = Session::new(Console, config);

    session.connect().await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(name) = line.strip_prefix("/name ") {
            session.change_name(name.trim()).await;
        } else if let Some(room) = line.strip_prefix("/room ") {
            session.change_room(room.trim()).await;
        } else if line == "/quit" {
            break;
        } else {
            session.send_message(line).await;
        }

        if !session.is_connected().await {
            // Server dropped us while we were typing
            break;
        }
    }

    session.disconnect().await;
    Ok(())
}
