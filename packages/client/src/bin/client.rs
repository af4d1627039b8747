//! Minichat console client.
//!
//! Joins a room through the WebSocket chat bridge and sends lines read from
//! stdin. Type `/quit` (or press Ctrl+D) to leave the room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin minichat-client -- --user alice --room general
//! cargo run --bin minichat-client -- -u bob -r general --host chat.internal --port 6000
//! ```

use std::time::Duration;

use clap::Parser;
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::{mpsc, watch};

use minichat_client::{
    ChatClient, ClientConfig, ConnectParams, ConsoleView, ViewEvent, WebSocketConnector,
    config::DEFAULT_SERVER_URL, view::MessageFormatter,
};
use minichat_shared::logger::setup_logger;

const QUIT_COMMAND: &str = "/quit";

#[derive(Parser, Debug)]
#[command(name = "minichat-client")]
#[command(about = "Console chat client for the Minichat WebSocket bridge", long_about = None)]
struct Args {
    /// Username to join as
    #[arg(short = 'u', long)]
    user: String,

    /// Room to join
    #[arg(short = 'r', long)]
    room: String,

    /// Chat backend host forwarded to the bridge (default: localhost)
    #[arg(long, default_value = "")]
    host: String,

    /// Chat backend port forwarded to the bridge (default: 50051)
    #[arg(long, default_value = "")]
    port: String,

    /// WebSocket URL of the bridge
    #[arg(long, default_value = DEFAULT_SERVER_URL)]
    url: String,

    /// Seconds between liveness pings
    #[arg(long, default_value_t = 30)]
    ping_interval_secs: u64,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();
    let config = ClientConfig::new(args.url)
        .with_ping_interval(Duration::from_secs(args.ping_interval_secs));

    let (view_tx, mut view_rx) = mpsc::unbounded_channel::<ViewEvent>();
    let (client, client_handle) = ChatClient::spawn(WebSocketConnector, view_tx, config);

    // The readline thread shows the same prompt the console view redisplays
    let (prompt_tx, prompt_rx) = watch::channel(MessageFormatter::format_prompt(
        args.user.trim(),
        args.room.trim(),
        0,
    ));

    // Render projection events until the session returns to login or the
    // client stops
    let mut render_task = tokio::spawn(async move {
        let mut console = ConsoleView::stdout();
        while let Some(event) = view_rx.recv().await {
            event.apply_to(&mut console);
            if let Some(prompt) = console.prompt() {
                prompt_tx.send_replace(prompt);
            }
            if event == ViewEvent::ReturnToLogin {
                break;
            }
        }
    });

    let params = ConnectParams::new(args.user.as_str(), args.room.as_str())
        .with_host(args.host)
        .with_port(args.port);
    if let Err(e) = client.connect(params).await {
        tracing::error!("Failed to join room: {}", e);
        client.shutdown();
        let _ = client_handle.await;
        // The view channel is closed now, so the banner has been rendered
        let _ = render_task.await;
        std::process::exit(1);
    }

    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // rustyline is synchronous, so it gets its own thread
    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                tracing::error!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            let prompt = prompt_rx.borrow().clone();
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(line).ok();
                    if input_tx.send(line.to_string()).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    loop {
        tokio::select! {
            line = input_rx.recv() => match line {
                Some(line) if line == QUIT_COMMAND => client.disconnect().await,
                Some(line) => match client.send_chat_message(line).await {
                    Ok(true) => {}
                    Ok(false) => tracing::debug!("Message was not sent"),
                    Err(e) => tracing::warn!("Failed to send message: {}", e),
                },
                None => {
                    client.disconnect().await;
                    client.shutdown();
                    let _ = (&mut render_task).await;
                    break;
                }
            },
            _ = &mut render_task => break,
        }
    }

    client.shutdown();
    let _ = client_handle.await;
}
