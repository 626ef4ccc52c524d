//! Room fan-out
//!
//! Delivers one server event to every member of a room, or every member but
//! one. The payload is serialized once and the encoded bytes cloned per
//! recipient. Delivery is best-effort at-most-once: a member whose channel
//! is closed or full loses that message and the fan-out moves on - no
//! recipient can abort delivery to the rest, and nothing is reported back
//! to the sender. Ordering across recipients is unspecified.

use tracing::{debug, error};

use crate::message::ServerMessage;
use crate::room::Room;
use crate::types::ClientId;

/// Fan a message out to every room member except `exclude`
pub fn broadcast_to_room(room: &Room, message: &ServerMessage, exclude: Option<ClientId>) {
    let payload = match serde_json::to_string(message) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to serialize broadcast: {}", e);
            return;
        }
    };

    for (client_id, member) in &room.members {
        if Some(*client_id) == exclude {
            continue;
        }
        if let Err(e) = member.handle.send(payload.clone()) {
            debug!("Dropping message for {}: {}", client_id, e);
        }
    }
}

/// Deliver a message to a single room member
///
/// Used for the direct events of the join sequence (welcome, history
/// replay). Same contained failure handling as the fan-out.
pub fn send_to_member(room: &Room, client_id: ClientId, message: &ServerMessage) {
    let payload = match serde_json::to_string(message) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to serialize message: {}", e);
            return;
        }
    };

    if let Some(member) = room.members.get(&client_id) {
        if let Err(e) = member.handle.send(payload) {
            debug!("Dropping message for {}: {}", client_id, e);
        }
    }
}
