//! Connection handle definition
//!
//! The abstraction over one client's live bidirectional channel: an opaque
//! identity plus the sender side of the outbound message queue.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::error::SendError;
use crate::types::ClientId;

/// Handle to one connected client's outbound channel
///
/// Sends carry already-encoded JSON text so a broadcast serializes its
/// payload once and clones bytes per recipient. Delivery is fire-and-forget:
/// `try_send` never blocks, and a closed or backed-up channel is the
/// recipient's problem alone.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    /// Transport-assigned connection identity
    pub id: ClientId,
    /// Server → Client payload channel
    sender: mpsc::Sender<String>,
}

impl ConnectionHandle {
    /// Create a handle from a connection ID and its outbound channel
    pub fn new(id: ClientId, sender: mpsc::Sender<String>) -> Self {
        Self { id, sender }
    }

    /// Queue an encoded payload for delivery to this client
    ///
    /// Returns an error if the connection's write task is gone or its
    /// queue is full; callers drop the message and move on.
    pub fn send(&self, payload: String) -> Result<(), SendError> {
        self.sender.try_send(payload).map_err(|e| match e {
            TrySendError::Full(_) => SendError::ChannelFull,
            TrySendError::Closed(_) => SendError::ChannelClosed,
        })
    }

    /// Check whether the client side has gone away
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}
