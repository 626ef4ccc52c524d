//! Room registry
//!
//! Owns the room map for the process lifetime. Rooms are created lazily on
//! first join and removed as soon as the last member departs; an empty room
//! never survives the cleanup step that follows a leave.

use std::collections::HashMap;

use tracing::debug;

use crate::room::Room;
use crate::types::RoomId;

/// Mapping from room id to room state
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomId, Room>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            rooms: HashMap::new(),
        }
    }

    /// Return the room for `room_id`, inserting an empty one if absent
    pub fn get_or_create(&mut self, room_id: &RoomId) -> &mut Room {
        self.rooms
            .entry(room_id.clone())
            .or_insert_with(|| Room::new(room_id.clone()))
    }

    /// Look up an existing room
    pub fn get_mut(&mut self, room_id: &RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(room_id)
    }

    /// Drop the room iff it has no members; otherwise (or if absent) a no-op
    pub fn remove_if_empty(&mut self, room_id: &RoomId) {
        if self.rooms.get(room_id).is_some_and(|r| r.is_empty()) {
            self.rooms.remove(room_id);
            debug!("Room {} deleted (empty)", room_id);
        }
    }

    /// Check whether a room currently exists
    pub fn contains(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    /// Get the number of active rooms
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
