//! Wire codec for the relay protocol.
//!
//! Every message is a JSON array whose first element selects the handler.
//! Outbound requests go to the relay itself (`*enter-room*`,
//! `*subscribe-client-count*`, `*broadcast-message*`); broadcast payloads
//! are the drawing protocol proper and arrive at peers with the same array
//! shape, no wrapping selector.
//!
//! One deliberate asymmetry is preserved from the deployed protocol: local
//! stroke points go out as `draw-line`, which receivers render as discrete
//! dots, while the `draw` tag carries true line continuation but is never
//! emitted by this client. See [`DrawOperation`].

use serde_json::{json, Value};

use crate::surface::SurfaceId;

/// Relay request selectors.
pub const ENTER_ROOM: &str = "*enter-room*";
pub const SUBSCRIBE_CLIENT_COUNT: &str = "*subscribe-client-count*";
pub const BROADCAST_MESSAGE: &str = "*broadcast-message*";

/// Relay-originated selectors.
pub const CLIENT_ID: &str = "*client-id*";
pub const CLIENT_COUNT: &str = "*client-count*";
pub const SERVER_ERROR: &str = "*error*";

/// Drawing payload tags.
pub const TAG_DRAW_START: &str = "draw-start";
pub const TAG_DRAW_LINE: &str = "draw-line";
pub const TAG_DRAW: &str = "draw";
pub const TAG_END: &str = "end";

/// A decoded drawing event, local or relayed.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOperation {
    /// Begin a stroke on a wall. Wire: `["draw-start", surface, x, y]`.
    PathStart { surface: SurfaceId, x: f64, y: f64 },
    /// Continue the open path with a visible segment. Wire:
    /// `["draw", from, surface, x, y]`; accepted on receipt, never sent.
    PathPoint { from: i64, surface: SurfaceId, x: f64, y: f64 },
    /// A single point of a stroke, rendered by receivers as a filled dot.
    /// Wire: `["draw-line", surface, x, y]`.
    PointMark { surface: SurfaceId, x: f64, y: f64 },
    /// A client's session ended. Wire: `["end", clientId]`. Informational.
    SessionEnd { client: Option<i64> },
}

/// An outbound request to the relay.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    EnterRoom(String),
    SubscribeClientCount,
    Broadcast(DrawOperation),
    /// Liveness no-op: an empty payload, not a JSON array.
    Keepalive,
}

/// A decoded inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// Identity assigned by the relay (raw server value, before the +1
    /// adjustment the session applies).
    ClientId(i64),
    ClientCount(usize),
    ServerError(String),
    Draw(DrawOperation),
    /// Unknown selector or tag: a forward-compatible no-op.
    Ignored,
}

/// Decode failure. Malformed messages are dropped by the session, never
/// propagated.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("message is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("message is not an array")]
    NotAnArray,
    #[error("message selector is not a string")]
    Selector,
    #[error("`{tag}` expects {expected} elements, got {got}")]
    Arity { tag: String, expected: usize, got: usize },
    #[error("non-numeric field {index} in `{tag}` message")]
    FieldType { tag: String, index: usize },
}

/// Serialize a request to the text frame sent to the relay.
pub fn encode_request(request: &Request) -> String {
    match request {
        Request::EnterRoom(room) => json!([ENTER_ROOM, room]).to_string(),
        Request::SubscribeClientCount => json!([SUBSCRIBE_CLIENT_COUNT]).to_string(),
        Request::Broadcast(op) => json!([BROADCAST_MESSAGE, encode_operation(op)]).to_string(),
        Request::Keepalive => String::new(),
    }
}

/// Serialize a draw operation to its broadcast payload array.
pub fn encode_operation(op: &DrawOperation) -> Value {
    match op {
        DrawOperation::PathStart { surface, x, y } => json!([TAG_DRAW_START, surface, x, y]),
        DrawOperation::PointMark { surface, x, y } => json!([TAG_DRAW_LINE, surface, x, y]),
        DrawOperation::PathPoint { from, surface, x, y } => {
            json!([TAG_DRAW, from, surface, x, y])
        }
        DrawOperation::SessionEnd { client } => json!([TAG_END, client]),
    }
}

/// Decode one inbound text frame.
///
/// # Errors
///
/// Returns [`WireError`] for frames that are not JSON arrays, have the
/// wrong arity for their tag, or carry non-numeric coordinate fields.
/// Unknown selectors decode to [`Inbound::Ignored`].
pub fn decode_message(text: &str) -> Result<Inbound, WireError> {
    // The relay's liveness echoes are empty frames.
    if text.is_empty() {
        return Ok(Inbound::Ignored);
    }
    let value: Value = serde_json::from_str(text)?;
    let items = value.as_array().ok_or(WireError::NotAnArray)?;
    let selector = items
        .first()
        .ok_or(WireError::NotAnArray)?
        .as_str()
        .ok_or(WireError::Selector)?;

    match selector {
        CLIENT_ID => Ok(Inbound::ClientId(int_field(items, 1, selector)?)),
        CLIENT_COUNT => {
            let count = int_field(items, 1, selector)?;
            Ok(Inbound::ClientCount(usize::try_from(count).unwrap_or(0)))
        }
        SERVER_ERROR => {
            let detail = items.get(1).map(display_value).unwrap_or_default();
            Ok(Inbound::ServerError(detail))
        }
        TAG_DRAW_START => {
            check_arity(items, 4, selector)?;
            Ok(Inbound::Draw(DrawOperation::PathStart {
                surface: surface_field(items, 1, selector)?,
                x: num_field(items, 2, selector)?,
                y: num_field(items, 3, selector)?,
            }))
        }
        TAG_DRAW_LINE => {
            check_arity(items, 4, selector)?;
            Ok(Inbound::Draw(DrawOperation::PointMark {
                surface: surface_field(items, 1, selector)?,
                x: num_field(items, 2, selector)?,
                y: num_field(items, 3, selector)?,
            }))
        }
        TAG_DRAW => {
            check_arity(items, 5, selector)?;
            Ok(Inbound::Draw(DrawOperation::PathPoint {
                from: int_field(items, 1, selector)?,
                surface: surface_field(items, 2, selector)?,
                x: num_field(items, 3, selector)?,
                y: num_field(items, 4, selector)?,
            }))
        }
        TAG_END => {
            check_arity(items, 2, selector)?;
            Ok(Inbound::Draw(DrawOperation::SessionEnd {
                client: items.get(1).and_then(Value::as_i64),
            }))
        }
        _ => Ok(Inbound::Ignored),
    }
}

fn check_arity(items: &[Value], expected: usize, tag: &str) -> Result<(), WireError> {
    if items.len() == expected {
        Ok(())
    } else {
        Err(WireError::Arity { tag: tag.to_string(), expected, got: items.len() })
    }
}

fn num_field(items: &[Value], index: usize, tag: &str) -> Result<f64, WireError> {
    items
        .get(index)
        .and_then(Value::as_f64)
        .ok_or_else(|| WireError::FieldType { tag: tag.to_string(), index })
}

fn int_field(items: &[Value], index: usize, tag: &str) -> Result<i64, WireError> {
    if items.len() < index + 1 {
        return Err(WireError::Arity {
            tag: tag.to_string(),
            expected: index + 1,
            got: items.len(),
        });
    }
    items
        .get(index)
        .and_then(Value::as_i64)
        .ok_or_else(|| WireError::FieldType { tag: tag.to_string(), index })
}

fn surface_field(items: &[Value], index: usize, tag: &str) -> Result<SurfaceId, WireError> {
    let raw = int_field(items, index, tag)?;
    SurfaceId::try_from(raw).map_err(|_| WireError::FieldType { tag: tag.to_string(), index })
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
