//! Session lifecycle over the relay connection: room membership, client
//! identity, liveness, and routing of inbound messages.
//!
//! The session never touches the socket itself. It queues outbound frames
//! which the transport drains via [`Session::take_outgoing`], and consumes
//! inbound frames via [`Session::handle_message`], handing decoded draw
//! operations back to the caller for dispatch.

use std::time::Duration;

use crate::protocol::{self, DrawOperation, Inbound, Request};

/// How often an empty liveness frame goes out while the session is open.
pub const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(30);

/// Connection lifecycle. `Closed` is terminal: there is no reconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

/// Who we are in the room, as told by the relay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientIdentity {
    local_id: Option<i64>,
    client_count: usize,
}

impl ClientIdentity {
    /// Local client id, already adjusted to be 1-based.
    pub fn local_id(&self) -> Option<i64> {
        self.local_id
    }

    pub fn client_count(&self) -> usize {
        self.client_count
    }

    /// Display label `#id/count`, or `None` while no id is assigned.
    pub fn label(&self) -> Option<String> {
        self.local_id.map(|id| format!("#{}/{}", id, self.client_count))
    }
}

/// Process-wide session state: one connection, one room, one identity.
#[derive(Debug)]
pub struct Session {
    state: ConnectionState,
    room: String,
    identity: ClientIdentity,
    /// Encoded frames waiting for the transport to send.
    outgoing: Vec<String>,
}

impl Session {
    /// A session that will join `room` once the connection opens.
    pub fn new(room: impl Into<String>) -> Self {
        Self {
            state: ConnectionState::Connecting,
            room: room.into(),
            identity: ClientIdentity::default(),
            outgoing: Vec::new(),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Open
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    pub fn identity(&self) -> &ClientIdentity {
        &self.identity
    }

    /// The connection finished its handshake: enter the room and subscribe
    /// to room-size updates.
    pub fn handle_open(&mut self) {
        if self.state != ConnectionState::Connecting {
            return;
        }
        log::info!("session open, entering room {:?}", self.room);
        self.state = ConnectionState::Open;
        self.queue(Request::EnterRoom(self.room.clone()));
        self.queue(Request::SubscribeClientCount);
    }

    /// The connection dropped. Clears identity and queues one best-effort
    /// `["end", null]` broadcast; the send races the closing socket and
    /// may be lost.
    pub fn handle_close(&mut self) {
        if self.state == ConnectionState::Closed {
            return;
        }
        log::info!("session closed");
        self.state = ConnectionState::Closed;
        // Identity is cleared before the broadcast goes out, so peers
        // always see a null client in the end event.
        self.identity.local_id = None;
        self.queue(Request::Broadcast(DrawOperation::SessionEnd { client: None }));
    }

    /// Timer tick: queue a liveness no-op while open.
    pub fn keepalive_tick(&mut self) {
        if self.state == ConnectionState::Open {
            self.queue(Request::Keepalive);
        }
    }

    /// Queue a drawing broadcast for the room.
    pub fn queue_broadcast(&mut self, op: DrawOperation) {
        self.queue(Request::Broadcast(op));
    }

    fn queue(&mut self, request: Request) {
        self.outgoing.push(protocol::encode_request(&request));
    }

    /// Drain the frames waiting to be sent.
    pub fn take_outgoing(&mut self) -> Vec<String> {
        std::mem::take(&mut self.outgoing)
    }

    pub fn has_outgoing(&self) -> bool {
        !self.outgoing.is_empty()
    }

    /// Consume one inbound text frame. Draw operations are returned for
    /// the dispatcher; session-level messages mutate identity in place.
    /// Malformed frames are logged and dropped, never propagated.
    pub fn handle_message(&mut self, text: &str) -> Option<DrawOperation> {
        match protocol::decode_message(text) {
            Ok(Inbound::ClientId(raw)) => {
                // The relay hands out 0-based ids; displayed ids are 1-based.
                self.identity.local_id = Some(raw + 1);
                log::info!("assigned identity {}", self.identity.label().unwrap_or_default());
                None
            }
            Ok(Inbound::ClientCount(count)) => {
                self.identity.client_count = count;
                None
            }
            Ok(Inbound::ServerError(detail)) => {
                log::warn!("server error: {detail}");
                None
            }
            Ok(Inbound::Draw(op)) => Some(op),
            Ok(Inbound::Ignored) => None,
            Err(err) => {
                log::warn!("dropping malformed frame: {err}");
                None
            }
        }
    }
}
