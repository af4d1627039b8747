//! WebSocket transport built on `tokio-tungstenite`.
//!
//! Each opened transport runs one task that performs the handshake and then
//! splits the socket into a reader, which forwards text frames as events, and
//! a writer, which drains the outbound queue. When either side stops, the other
//! is aborted and a final `Closed` event is emitted.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use crate::error::TransportError;

use super::{
    ConnectionId, Connector, Transport, TransportEvent, TransportEventKind, TransportEventSender,
};

/// Items queued for the writer.
#[derive(Debug)]
enum Outbound {
    Text(String),
    Close,
}

/// Opens [`WebSocketTransport`]s. Must be used from within a tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebSocketConnector;

impl Connector for WebSocketConnector {
    fn open(
        &self,
        url: &str,
        id: ConnectionId,
        events: TransportEventSender,
    ) -> Box<dyn Transport> {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let open = Arc::new(AtomicBool::new(false));

        tokio::spawn(run_connection(
            url.to_string(),
            id,
            events,
            outbound_rx,
            open.clone(),
        ));

        Box::new(WebSocketTransport {
            outbound: outbound_tx,
            open,
        })
    }
}

/// Handle to one WebSocket connection.
///
/// Dropping the handle closes the outbound queue, which ends the connection.
pub struct WebSocketTransport {
    outbound: mpsc::UnboundedSender<Outbound>,
    open: Arc<AtomicBool>,
}

impl Transport for WebSocketTransport {
    fn send(&mut self, frame: String) -> Result<(), TransportError> {
        if !self.is_open() {
            return Err(TransportError::NotOpen);
        }

        self.outbound
            .send(Outbound::Text(frame))
            .map_err(|_| TransportError::Send("connection task has stopped".to_string()))
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst) && !self.outbound.is_closed()
    }

    fn close(&mut self) {
        self.open.store(false, Ordering::SeqCst);
        // The writer may already be gone
        let _ = self.outbound.send(Outbound::Close);
    }
}

fn emit(events: &TransportEventSender, id: ConnectionId, kind: TransportEventKind) {
    if events.send(TransportEvent::new(id, kind)).is_err() {
        tracing::debug!("Event receiver for connection {} dropped", id);
    }
}

/// Resolves once the handle asks to close or is dropped.
///
/// Text cannot be queued before the socket opens, since `send` checks `open`.
async fn closed_before_open(outbound: &mut mpsc::UnboundedReceiver<Outbound>) {
    while let Some(item) = outbound.recv().await {
        if matches!(item, Outbound::Close) {
            return;
        }
    }
}

async fn run_connection(
    url: String,
    id: ConnectionId,
    events: TransportEventSender,
    mut outbound: mpsc::UnboundedReceiver<Outbound>,
    open: Arc<AtomicBool>,
) {
    let dial = tokio::select! {
        result = connect_async(url.as_str()) => result,
        _ = closed_before_open(&mut outbound) => {
            tracing::debug!("Connection {} closed while dialing {}", id, url);
            emit(&events, id, TransportEventKind::Closed);
            return;
        }
    };

    let ws_stream = match dial {
        Ok((stream, response)) => {
            tracing::debug!(
                "WebSocket handshake with {} completed ({})",
                url,
                response.status()
            );
            stream
        }
        Err(e) => {
            tracing::warn!("Failed to connect to {}: {}", url, e);
            emit(&events, id, TransportEventKind::Error(e.to_string()));
            emit(&events, id, TransportEventKind::Closed);
            return;
        }
    };

    open.store(true, Ordering::SeqCst);
    tracing::info!("Connected to {} (connection {})", url, id);
    emit(&events, id, TransportEventKind::Opened);

    let (mut write, mut read) = ws_stream.split();

    // Drain the outbound queue into the socket
    let mut write_task = tokio::spawn(async move {
        while let Some(item) = outbound.recv().await {
            match item {
                Outbound::Text(text) => {
                    if let Err(e) = write.send(Message::Text(text.into())).await {
                        return Some(e.to_string());
                    }
                }
                Outbound::Close => {
                    if let Err(e) = write.send(Message::Close(None)).await {
                        tracing::debug!("Failed to send close frame: {}", e);
                    }
                    break;
                }
            }
        }
        None
    });

    // Forward inbound text frames as events
    let read_events = events.clone();
    let mut read_task = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    emit(
                        &read_events,
                        id,
                        TransportEventKind::Frame(text.as_str().to_owned()),
                    );
                }
                Ok(Message::Binary(data)) => {
                    tracing::debug!("Ignoring {} bytes of binary data", data.len());
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    emit(&read_events, id, TransportEventKind::Error(e.to_string()));
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut read_task => write_task.abort(),
        result = &mut write_task => {
            if let Ok(Some(reason)) = result {
                tracing::warn!("Failed to send frame: {}", reason);
                emit(&events, id, TransportEventKind::Error(reason));
            }
            read_task.abort();
        }
    }

    open.store(false, Ordering::SeqCst);
    emit(&events, id, TransportEventKind::Closed);
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::net::TcpListener;

    use super::*;

    #[tokio::test]
    async fn test_close_while_dialing_ends_connection_task() {
        // テスト項目: WebSocket ハンドシェイク中に close すると、ダイヤルを待たずに Closed が通知される
        // given (前提条件): TCP 接続は受け付けるが、ハンドシェイクには応答しないサーバー
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let silent_server = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let id = ConnectionId::new(1);
        let mut transport =
            WebSocketConnector.open(&format!("ws://{}/ws", addr), id, events_tx);
        tokio::time::sleep(Duration::from_millis(50)).await;

        // when (操作):
        transport.close();

        // then (期待する結果):
        let event = tokio::time::timeout(Duration::from_secs(1), events_rx.recv())
            .await
            .expect("connection task did not stop while dialing");
        assert_eq!(event, Some(TransportEvent::new(id, TransportEventKind::Closed)));
        assert!(!transport.is_open());
        silent_server.abort();
    }
}
