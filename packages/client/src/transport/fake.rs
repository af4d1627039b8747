//! In-memory transport for tests.

use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::error::TransportError;

use super::{
    ConnectionId, Connector, Transport, TransportEvent, TransportEventKind, TransportEventSender,
};

#[derive(Debug, Default)]
struct LinkState {
    sent: Vec<String>,
    open: bool,
    closed: bool,
}

/// Test-side view of one transport opened by [`FakeConnector`].
#[derive(Clone)]
pub(crate) struct FakeLink {
    pub id: ConnectionId,
    pub url: String,
    events: TransportEventSender,
    state: Arc<Mutex<LinkState>>,
}

impl FakeLink {
    /// Mark the link open and build the matching event.
    pub fn opened(&self) -> TransportEvent {
        self.state.lock().unwrap().open = true;
        TransportEvent::new(self.id, TransportEventKind::Opened)
    }

    pub fn frame(&self, value: Value) -> TransportEvent {
        TransportEvent::new(self.id, TransportEventKind::Frame(value.to_string()))
    }

    pub fn raw_frame(&self, text: &str) -> TransportEvent {
        TransportEvent::new(self.id, TransportEventKind::Frame(text.to_string()))
    }

    pub fn error(&self, reason: &str) -> TransportEvent {
        TransportEvent::new(self.id, TransportEventKind::Error(reason.to_string()))
    }

    /// Mark the link closed by the peer and build the matching event.
    pub fn closed(&self) -> TransportEvent {
        self.state.lock().unwrap().open = false;
        TransportEvent::new(self.id, TransportEventKind::Closed)
    }

    /// Deliver an event through the channel the connector was given.
    pub fn emit(&self, event: TransportEvent) {
        self.events.send(event).unwrap();
    }

    pub fn sent(&self) -> Vec<Value> {
        self.state
            .lock()
            .unwrap()
            .sent
            .iter()
            .map(|text| serde_json::from_str(text).unwrap())
            .collect()
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().unwrap().closed
    }
}

struct FakeTransport {
    state: Arc<Mutex<LinkState>>,
}

impl Transport for FakeTransport {
    fn send(&mut self, frame: String) -> Result<(), TransportError> {
        let mut state = self.state.lock().unwrap();
        if !state.open {
            return Err(TransportError::NotOpen);
        }
        state.sent.push(frame);
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.state.lock().unwrap().open
    }

    fn close(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.open = false;
        state.closed = true;
    }
}

/// Records every transport it opens.
#[derive(Clone, Default)]
pub(crate) struct FakeConnector {
    links: Arc<Mutex<Vec<FakeLink>>>,
}

impl FakeConnector {
    pub fn open_count(&self) -> usize {
        self.links.lock().unwrap().len()
    }

    pub fn last(&self) -> FakeLink {
        self.links
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no transport was opened")
    }
}

impl Connector for FakeConnector {
    fn open(
        &self,
        url: &str,
        id: ConnectionId,
        events: TransportEventSender,
    ) -> Box<dyn Transport> {
        let state = Arc::new(Mutex::new(LinkState::default()));
        self.links.lock().unwrap().push(FakeLink {
            id,
            url: url.to_string(),
            events,
            state: state.clone(),
        });
        Box::new(FakeTransport { state })
    }
}
