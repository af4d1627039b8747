//! Connection manager: owns the transport, the session and the join handshake.
//!
//! Every input is a method call with one transition each: user operations
//! (`connect`, `disconnect`, `send_chat_message`), transport events
//! (`handle_event`) and liveness ticks (`on_liveness_tick`). The manager never
//! blocks or awaits; a caller that needs the outcome of `connect` passes a
//! oneshot sender which is settled when the handshake finishes.
//!
//! ```text
//! Idle/Closed --connect--> Connecting --opened--> AwaitingJoin --joined--> Joined
//!      ^                        |                      |                     |
//!      +------ error / close ---+----------------------+---- close/disconnect+
//! ```

use tokio::sync::{mpsc, oneshot};

use crate::{
    dispatcher::{Handshake, dispatch},
    domain::{ConnectParams, JoinRequest, Session},
    error::{ClientError, ProtocolError, TransportError},
    protocol::{self, OutboundFrame},
    transport::{
        ConnectionId, Connector, Transport, TransportEvent, TransportEventKind,
        TransportEventSender,
    },
    view::ChatView,
};

/// Settled once the join handshake succeeds or fails.
pub type ConnectReply = oneshot::Sender<Result<(), ClientError>>;

/// Lifecycle of the (single) connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No connection has been made yet
    Idle,
    /// Transport is opening
    Connecting,
    /// `init` sent, waiting for `joined`
    AwaitingJoin,
    Joined,
    /// The last connection ended
    Closed,
}

impl ConnectionState {
    /// Whether a new `connect` may start from this state.
    pub fn accepts_connect(&self) -> bool {
        matches!(self, ConnectionState::Idle | ConnectionState::Closed)
    }
}

struct ActiveConnection {
    id: ConnectionId,
    transport: Box<dyn Transport>,
    request: JoinRequest,
    pending: Option<ConnectReply>,
}

pub struct ConnectionManager<C: Connector, V: ChatView> {
    connector: C,
    view: V,
    url: String,
    session: Session,
    state: ConnectionState,
    active: Option<ActiveConnection>,
    last_id: ConnectionId,
    events: TransportEventSender,
}

impl<C: Connector, V: ChatView> ConnectionManager<C, V> {
    /// Create a manager and the receiver its transports report to.
    ///
    /// The caller must feed every received event back into [`Self::handle_event`].
    pub fn new(
        connector: C,
        view: V,
        url: impl Into<String>,
    ) -> (Self, mpsc::UnboundedReceiver<TransportEvent>) {
        let (events, events_rx) = mpsc::unbounded_channel();
        let manager = Self {
            connector,
            view,
            url: url.into(),
            session: Session::new(),
            state: ConnectionState::Idle,
            active: None,
            last_id: ConnectionId::new(0),
            events,
        };
        (manager, events_rx)
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Start a connection and join handshake.
    ///
    /// `reply` is settled with `AlreadyConnecting` unless the manager is idle
    /// or closed, with `Validation` for blank user/room (also shown as a
    /// banner), and otherwise once the handshake completes or fails.
    pub fn connect(&mut self, params: ConnectParams, reply: ConnectReply) {
        if !self.state.accepts_connect() {
            tracing::warn!("Rejecting connect while {:?}", self.state);
            settle(reply, Err(ClientError::AlreadyConnecting));
            return;
        }

        let request = match JoinRequest::try_from(params) {
            Ok(request) => request,
            Err(e) => {
                self.view.on_error(&e.to_string());
                settle(reply, Err(e));
                return;
            }
        };

        self.last_id = self.last_id.next();
        let id = self.last_id;
        tracing::info!(
            "Connecting to {} as '{}' in room '{}' (connection {})",
            self.url,
            request.user,
            request.room,
            id
        );

        let transport = self.connector.open(&self.url, id, self.events.clone());
        self.active = Some(ActiveConnection {
            id,
            transport,
            request,
            pending: Some(reply),
        });
        self.state = ConnectionState::Connecting;
    }

    /// Close the connection, if any, and return to the pre-login view.
    ///
    /// Idempotent. A pending connect settles with `ConnectionAborted` and, as
    /// with any failed handshake, the view gets no leave notification.
    pub fn disconnect(&mut self) {
        tracing::info!("Disconnecting ({:?})", self.state);
        self.teardown();
    }

    /// Send a chat line.
    ///
    /// Returns `Ok(false)` without sending when not joined or when the text is
    /// blank after trimming.
    pub fn send_chat_message(&mut self, text: &str) -> Result<bool, ClientError> {
        let text = text.trim();
        if text.is_empty() {
            tracing::debug!("Dropping blank message");
            return Ok(false);
        }
        if self.state != ConnectionState::Joined {
            tracing::debug!("Dropping message while {:?}", self.state);
            return Ok(false);
        }
        let Some(active) = self.active.as_mut() else {
            return Ok(false);
        };

        let frame = OutboundFrame::Message {
            text: text.to_string(),
        };
        if let Err(e) = send_frame(active.transport.as_mut(), &frame) {
            tracing::warn!("Failed to send message: {}", e);
            return Err(e);
        }
        Ok(true)
    }

    /// Liveness timer firing: ping if a transport is open right now.
    ///
    /// Nothing is sent until the `Opened` event has been handled, so `init` is
    /// always the first frame on a connection. Returns whether a ping was sent.
    pub fn on_liveness_tick(&mut self) -> bool {
        if !matches!(
            self.state,
            ConnectionState::AwaitingJoin | ConnectionState::Joined
        ) {
            return false;
        }
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        if !active.transport.is_open() {
            return false;
        }

        match send_frame(active.transport.as_mut(), &OutboundFrame::Ping) {
            Ok(()) => {
                tracing::debug!("Sent ping on connection {}", active.id);
                true
            }
            Err(e) => {
                tracing::warn!("Failed to send ping: {}", e);
                false
            }
        }
    }

    /// Apply one transport event. Events of other connections are ignored.
    pub fn handle_event(&mut self, event: TransportEvent) {
        let is_current = self
            .active
            .as_ref()
            .is_some_and(|active| active.id == event.connection);
        if !is_current {
            tracing::debug!(
                "Ignoring {:?} from stale connection {}",
                event.kind,
                event.connection
            );
            return;
        }

        match event.kind {
            TransportEventKind::Opened => self.on_open(),
            TransportEventKind::Frame(text) => self.on_frame(&text),
            TransportEventKind::Error(reason) => self.on_transport_error(reason),
            TransportEventKind::Closed => self.on_close(),
        }
    }

    fn on_open(&mut self) {
        if self.state != ConnectionState::Connecting {
            return;
        }
        let Some(active) = self.active.as_mut() else {
            return;
        };

        self.state = ConnectionState::AwaitingJoin;
        let init = OutboundFrame::Init {
            user: active.request.user.clone(),
            room: active.request.room.clone(),
            host: active.request.host.clone(),
            port: active.request.port,
        };
        match send_frame(active.transport.as_mut(), &init) {
            Ok(()) => tracing::debug!("Sent init on connection {}", active.id),
            Err(e) => self.fail_handshake(e, true),
        }
    }

    fn on_frame(&mut self, text: &str) {
        tracing::debug!("Received frame: {}", text);

        let frame = match protocol::decode(text) {
            Ok(frame) => frame,
            Err(e) if self.state == ConnectionState::Joined => {
                tracing::warn!("Ignoring frame: {}", e);
                return;
            }
            Err(e) => {
                self.fail_handshake(e.into(), true);
                return;
            }
        };

        let Some(active) = self.active.as_ref() else {
            return;
        };
        let result = dispatch(frame, &mut self.session, &active.request);
        for event in &result.events {
            event.apply_to(&mut self.view);
        }

        match result.handshake {
            Some(Handshake::Joined) => self.complete_handshake(),
            Some(Handshake::Rejected(reason)) => {
                // The dispatcher already emitted the banner
                self.fail_handshake(ProtocolError::Backend(reason).into(), false);
            }
            None => {}
        }
    }

    fn on_transport_error(&mut self, reason: String) {
        match self.state {
            ConnectionState::Connecting => {
                self.fail_handshake(TransportError::Open(reason).into(), true)
            }
            ConnectionState::AwaitingJoin => {
                self.fail_handshake(TransportError::Receive(reason).into(), true)
            }
            _ => tracing::warn!("Transport error: {}", reason),
        }
    }

    fn on_close(&mut self) {
        match self.state {
            ConnectionState::Connecting | ConnectionState::AwaitingJoin => {
                self.fail_handshake(ClientError::ConnectionAborted, true)
            }
            ConnectionState::Joined => {
                tracing::info!("Connection closed by the server");
                self.teardown();
            }
            ConnectionState::Idle | ConnectionState::Closed => {}
        }
    }

    fn complete_handshake(&mut self) {
        if !matches!(
            self.state,
            ConnectionState::Connecting | ConnectionState::AwaitingJoin
        ) {
            return;
        }
        self.state = ConnectionState::Joined;

        if let Some(active) = self.active.as_mut() {
            tracing::info!(
                "Joined room '{}' as '{}' (connection {})",
                self.session.room().unwrap_or_default(),
                self.session.user().unwrap_or_default(),
                active.id
            );
            if let Some(reply) = active.pending.take() {
                settle(reply, Ok(()));
            }
        }
    }

    /// End a connection that never joined. The user stays on the login view.
    fn fail_handshake(&mut self, error: ClientError, show_banner: bool) {
        tracing::warn!("Join handshake failed: {}", error);

        if let Some(mut active) = self.active.take() {
            active.transport.close();
            if let Some(reply) = active.pending.take() {
                settle(reply, Err(error.clone()));
            }
        }
        self.session.reset();
        self.state = ConnectionState::Closed;

        if show_banner {
            self.view.on_error(&error.to_string());
        }
    }

    /// Close and reset. The view is told to leave the room only if one was
    /// entered, so every `on_return_to_login` follows an `on_enter_chat`.
    fn teardown(&mut self) {
        let was_joined = self.state == ConnectionState::Joined;

        if let Some(mut active) = self.active.take() {
            active.transport.close();
            if let Some(reply) = active.pending.take() {
                settle(reply, Err(ClientError::ConnectionAborted));
            }
            self.state = ConnectionState::Closed;
        }
        self.session.reset();

        if was_joined {
            self.view.on_connection_status_changed(false);
            self.view.on_return_to_login();
        }
    }
}

fn send_frame(transport: &mut dyn Transport, frame: &OutboundFrame) -> Result<(), ClientError> {
    let text = protocol::encode(frame)?;
    transport.send(text)?;
    Ok(())
}

fn settle(reply: ConnectReply, result: Result<(), ClientError>) {
    if reply.send(result).is_err() {
        tracing::debug!("Connect caller is no longer waiting");
    }
}
