//! Basic type definitions for the chat relay
//!
//! Provides newtype wrappers for type safety:
//! - `ClientId`: UUID-based unique connection identifier
//! - `UserId`: short random per-member identifier sent to clients
//! - `RoomId`: case-sensitive room name

use serde::Serialize;
use uuid::Uuid;

/// Unique connection identifier (newtype pattern)
///
/// Wraps a UUID v4 for type-safe connection identification.
/// Assigned by the transport layer, never reused, never sent on the wire.
/// Implements Hash and Eq for use as HashMap keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(pub Uuid);

impl ClientId {
    /// Create a new random connection ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-member user identifier (9-character lowercase alphanumeric)
///
/// Generated when a connection joins a room and echoed to clients in
/// `welcome` and chat events. Random and unchecked: uniqueness is
/// probabilistic, not enforced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct UserId(pub String);

impl UserId {
    /// Generate a new random 9-character user ID
    pub fn generate() -> Self {
        use rand::Rng;
        let id: String = rand::thread_rng()
            .sample_iter(&rand::distributions::Alphanumeric)
            .take(9)
            .map(char::from)
            .collect::<String>()
            .to_lowercase();
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room identifier
///
/// An opaque, case-sensitive string key. Clients pick it via the `room`
/// query parameter; connections with no parameter land in `"default"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RoomId(pub String);

impl RoomId {
    /// Create a RoomId from a string (kept verbatim, case-sensitive)
    pub fn new(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_client_id_unique() {
        let id1 = ClientId::new();
        let id2 = ClientId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_user_id_shape() {
        let id = UserId::generate();
        assert_eq!(id.0.len(), 9);
        assert!(id
            .0
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_user_id_bulk_distinct() {
        // Generation is random with no collision check; a clash here is a
        // latent defect in the id scheme, not a test flake.
        let ids: HashSet<String> = (0..1000).map(|_| UserId::generate().0).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_room_id_case_sensitive() {
        let a = RoomId::new("Lobby".to_string());
        let b = RoomId::new("lobby".to_string());
        assert_ne!(a, b);
    }
}
