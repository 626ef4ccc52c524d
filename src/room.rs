//! Room state and membership
//!
//! A room owns its members, their typing entries, and a bounded message
//! history. All access is serialized through the relay actor, so the room
//! itself carries no locking.

use std::collections::{HashMap, VecDeque};

use crate::connection::ConnectionHandle;
use crate::message::ChatMessage;
use crate::types::{ClientId, RoomId, UserId};
use crate::typing::TypingEntry;

/// Maximum chat messages retained per room (oldest evicted first)
pub const HISTORY_CAP: usize = 100;

/// One participant's presence in one room
///
/// Created on join, destroyed on leave. Owned exclusively by the room
/// holding it; the handle inside is the only route back to the client.
#[derive(Debug)]
pub struct Member {
    /// Server-generated id echoed to clients
    pub user_id: UserId,
    /// Client-supplied display name (not guaranteed unique)
    pub username: String,
    /// Wall-clock ms at join time
    pub connected_at: i64,
    /// The member's outbound channel
    pub handle: ConnectionHandle,
}

/// Chat room
///
/// Members keyed by connection id, a typing set keyed the same way, and a
/// FIFO-bounded history buffer.
#[derive(Debug)]
pub struct Room {
    /// Room key in the registry
    pub id: RoomId,
    /// All current members: ClientId -> Member
    pub members: HashMap<ClientId, Member>,
    /// Members currently flagged as typing
    pub typing: HashMap<ClientId, TypingEntry>,
    /// Retained chat messages, oldest first
    pub history: VecDeque<ChatMessage>,
    /// Monotonic counter distinguishing re-armed typing countdowns
    typing_seq: u64,
}

impl Room {
    /// Create an empty room
    pub fn new(id: RoomId) -> Self {
        Self {
            id,
            members: HashMap::new(),
            typing: HashMap::new(),
            history: VecDeque::new(),
            typing_seq: 0,
        }
    }

    /// Add a connection to the room, minting a fresh user id
    pub fn join(&mut self, handle: ConnectionHandle, username: String, connected_at: i64) -> &Member {
        let client_id = handle.id;
        let member = Member {
            user_id: UserId::generate(),
            username,
            connected_at,
            handle,
        };
        self.members.entry(client_id).or_insert(member)
    }

    /// Remove a connection from the room
    ///
    /// Returns the removed member so the caller can announce the departure.
    /// Idempotent: a second call for the same connection is a no-op. Any
    /// typing entry goes with the member, countdown aborted, no broadcast.
    pub fn leave(&mut self, client_id: ClientId) -> Option<Member> {
        self.typing.remove(&client_id);
        self.members.remove(&client_id)
    }

    /// Check if a connection is a member of this room
    pub fn contains(&self, client_id: ClientId) -> bool {
        self.members.contains_key(&client_id)
    }

    /// Check if the room has no members left
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Get the number of members in the room
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Append a message to the history, evicting the oldest past the cap
    pub fn push_history(&mut self, message: ChatMessage) {
        self.history.push_back(message);
        while self.history.len() > HISTORY_CAP {
            self.history.pop_front();
        }
    }

    /// Last `min(limit, len)` messages in original chronological order
    pub fn recent_history(&self, limit: usize) -> Vec<ChatMessage> {
        let skip = self.history.len().saturating_sub(limit);
        self.history.iter().skip(skip).cloned().collect()
    }

    /// Next typing countdown sequence number
    pub fn next_typing_seq(&mut self) -> u64 {
        self.typing_seq += 1;
        self.typing_seq
    }

    /// Record a member as typing, replacing (and aborting) any armed countdown
    pub fn start_typing(&mut self, client_id: ClientId, entry: TypingEntry) {
        self.typing.insert(client_id, entry);
    }

    /// Clear a member's typing state
    ///
    /// Returns the removed entry (its countdown aborts on drop), or None if
    /// the member was not typing.
    pub fn stop_typing(&mut self, client_id: ClientId) -> Option<TypingEntry> {
        self.typing.remove(&client_id)
    }

    /// Clear a member's typing state for a countdown expiry
    ///
    /// True only when the entry is still present and was armed by exactly
    /// this countdown; a re-armed or already-stopped entry leaves the expiry
    /// stale and ignored.
    pub fn expire_typing(&mut self, client_id: ClientId, seq: u64) -> bool {
        match self.typing.get(&client_id) {
            Some(entry) if entry.seq == seq => {
                self.typing.remove(&client_id);
                true
            }
            _ => false,
        }
    }
}
