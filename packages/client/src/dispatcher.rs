//! Message dispatcher: routes inbound frames to session transitions and view
//! events.
//!
//! Pure with respect to I/O: it mutates only the [`Session`] it is given and
//! returns the projection events for the caller to deliver.

use crate::{
    domain::{ChatMessage, JoinRequest, Session},
    protocol::{InboundFrame, MessageRecord},
    view::ViewEvent,
};

/// Effect of a frame on the join handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handshake {
    /// The backend accepted the join
    Joined,
    /// The backend refused before the join completed
    Rejected(String),
}

/// Result of dispatching one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dispatch {
    /// Projection events, in emission order
    pub events: Vec<ViewEvent>,
    pub handshake: Option<Handshake>,
}

/// Apply one inbound frame.
///
/// # Arguments
///
/// * `frame` - The decoded frame
/// * `session` - The session to mutate
/// * `requested` - The join parameters sent in `init`, used when `joined`
///   omits the user or room
pub fn dispatch(frame: InboundFrame, session: &mut Session, requested: &JoinRequest) -> Dispatch {
    let mut dispatch = Dispatch::default();

    match frame {
        InboundFrame::Joined { user, room } => {
            let user = non_empty(user).unwrap_or_else(|| requested.user.clone());
            let room = non_empty(room).unwrap_or_else(|| requested.room.clone());
            session.join(user.clone(), room.clone());
            dispatch.events.push(ViewEvent::EnterChat { user, room });
            dispatch.events.push(ViewEvent::ConnectionStatusChanged(true));
            dispatch.handshake = Some(Handshake::Joined);
        }
        InboundFrame::History { messages } => {
            for record in messages {
                append(record, session, &mut dispatch.events);
            }
        }
        InboundFrame::Message(record) => append(record, session, &mut dispatch.events),
        InboundFrame::Error { message } => {
            if !session.is_connected() {
                dispatch.handshake = Some(Handshake::Rejected(message.clone()));
            }
            dispatch.events.push(ViewEvent::Error(message));
        }
        InboundFrame::Pong | InboundFrame::Unrecognized => {}
    }

    dispatch
}

fn append(record: MessageRecord, session: &mut Session, events: &mut Vec<ViewEvent>) {
    let message = ChatMessage::from(record);
    let count = session.append(&message);
    events.push(ViewEvent::MessageAppended { message, count });
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
