//! Chat client runtime.
//!
//! [`ChatClient`] is a cloneable handle to one event loop task that owns the
//! [`ConnectionManager`]. User commands, transport events and liveness ticks
//! are all applied from that task, one at a time, so the session and the
//! connection never need a lock.

use std::time::Duration;

use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};

use crate::{
    config::ClientConfig,
    domain::{ConnectParams, Session},
    error::ClientError,
    manager::{ConnectReply, ConnectionManager, ConnectionState},
    transport::{Connector, TransportEvent},
    view::ChatView,
};

/// Lower bound for the liveness period; `tokio::time::interval` rejects zero.
const MIN_PING_INTERVAL: Duration = Duration::from_millis(1);

enum Command {
    Connect {
        params: ConnectParams,
        reply: ConnectReply,
    },
    SendChatMessage {
        text: String,
        reply: oneshot::Sender<Result<bool, ClientError>>,
    },
    Disconnect {
        reply: oneshot::Sender<()>,
    },
    Snapshot {
        reply: oneshot::Sender<(ConnectionState, Session)>,
    },
    Shutdown,
}

/// Handle to a running chat client.
#[derive(Clone)]
pub struct ChatClient {
    commands: mpsc::UnboundedSender<Command>,
}

impl ChatClient {
    /// Start the event loop on the current tokio runtime.
    ///
    /// The liveness timer starts now, independent of any connection; its first
    /// tick is one period away.
    pub fn spawn<C, V>(connector: C, view: V, config: ClientConfig) -> (Self, JoinHandle<()>)
    where
        C: Connector + 'static,
        V: ChatView + 'static,
    {
        let (commands, commands_rx) = mpsc::unbounded_channel();
        let (manager, events_rx) = ConnectionManager::new(connector, view, config.url);
        let handle = tokio::spawn(run_event_loop(
            manager,
            commands_rx,
            events_rx,
            config.ping_interval,
        ));
        (Self { commands }, handle)
    }

    /// Connect and join a room; resolves once the backend answers `joined`.
    pub async fn connect(&self, params: ConnectParams) -> Result<(), ClientError> {
        let (reply, rx) = oneshot::channel();
        self.request(Command::Connect { params, reply })?;
        rx.await.map_err(|_| ClientError::ConnectionAborted)?
    }

    /// Send a chat line. `Ok(false)` when it was dropped (blank or not joined).
    pub async fn send_chat_message(&self, text: impl Into<String>) -> Result<bool, ClientError> {
        let (reply, rx) = oneshot::channel();
        self.request(Command::SendChatMessage {
            text: text.into(),
            reply,
        })?;
        rx.await.map_err(|_| ClientError::ClientStopped)?
    }

    /// Close the connection and reset the session. Safe to call at any time.
    pub async fn disconnect(&self) {
        let (reply, rx) = oneshot::channel();
        if self.request(Command::Disconnect { reply }).is_ok() {
            let _ = rx.await;
        }
    }

    /// Current session record.
    pub async fn session(&self) -> Result<Session, ClientError> {
        self.snapshot().await.map(|(_, session)| session)
    }

    /// Current connection state.
    pub async fn state(&self) -> Result<ConnectionState, ClientError> {
        self.snapshot().await.map(|(state, _)| state)
    }

    /// Disconnect and stop the event loop.
    pub fn shutdown(&self) {
        let _ = self.commands.send(Command::Shutdown);
    }

    async fn snapshot(&self) -> Result<(ConnectionState, Session), ClientError> {
        let (reply, rx) = oneshot::channel();
        self.request(Command::Snapshot { reply })?;
        rx.await.map_err(|_| ClientError::ClientStopped)
    }

    fn request(&self, command: Command) -> Result<(), ClientError> {
        self.commands
            .send(command)
            .map_err(|_| ClientError::ClientStopped)
    }
}

async fn run_event_loop<C: Connector, V: ChatView>(
    mut manager: ConnectionManager<C, V>,
    mut commands: mpsc::UnboundedReceiver<Command>,
    mut events: mpsc::UnboundedReceiver<TransportEvent>,
    ping_interval: Duration,
) {
    let period = ping_interval.max(MIN_PING_INTERVAL);
    let mut liveness = tokio::time::interval_at(Instant::now() + period, period);
    liveness.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(Command::Shutdown) | None => break,
                Some(command) => handle_command(&mut manager, command),
            },
            Some(event) = events.recv() => manager.handle_event(event),
            _ = liveness.tick() => {
                manager.on_liveness_tick();
            }
        }
    }

    manager.disconnect();
    tracing::info!("Chat client stopped");
}

fn handle_command<C: Connector, V: ChatView>(manager: &mut ConnectionManager<C, V>, command: Command) {
    match command {
        Command::Connect { params, reply } => manager.connect(params, reply),
        Command::SendChatMessage { text, reply } => {
            let _ = reply.send(manager.send_chat_message(&text));
        }
        Command::Disconnect { reply } => {
            manager.disconnect();
            let _ = reply.send(());
        }
        Command::Snapshot { reply } => {
            let _ = reply.send((manager.state(), manager.session().clone()));
        }
        Command::Shutdown => {}
    }
}
