//! Message protocol definitions
//!
//! JSON-based bidirectional message protocol using Serde's tagged enum
//! for type-safe serialization/deserialization. Type tags are snake_case,
//! field names camelCase.

use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// Client → Server message
///
/// All messages from client to server. Uses tagged enum with snake_case
/// naming. Payloads with an unrecognized `type` tag decode to `Unknown`
/// and are dropped by the router; only malformed JSON is a parse error.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Send a chat message to the sender's room
    ChatMessage { text: String },
    /// Indicate typing started
    TypingStart,
    /// Indicate typing stopped
    TypingStop,
    /// Any unrecognized message type (ignored)
    #[serde(other)]
    Unknown,
}

/// One chat message as retained in a room's history
///
/// Immutable once created; `timestamp` is server-assigned wall-clock
/// milliseconds with no monotonicity guarantee across concurrent senders.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub user_id: UserId,
    pub username: String,
    pub text: String,
    pub timestamp: i64,
}

/// Server → Client message
///
/// All messages from server to client. Uses tagged enum with snake_case
/// naming; struct fields serialize as camelCase.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Sent to a client right after it joins a room
    #[serde(rename_all = "camelCase")]
    Welcome {
        user_id: UserId,
        room_id: String,
        username: String,
        message: String,
    },
    /// Another member joined the room
    #[serde(rename_all = "camelCase")]
    UserJoined {
        username: String,
        user_id: UserId,
        message: String,
        timestamp: i64,
    },
    /// A member left the room
    #[serde(rename_all = "camelCase")]
    UserLeft {
        username: String,
        user_id: UserId,
        message: String,
        timestamp: i64,
    },
    /// Chat message relayed to the room (sender included)
    ChatMessage(ChatMessage),
    /// Batched history replay for a joining client
    RecentMessages { messages: Vec<ChatMessage> },
    /// A member started typing
    TypingStart { username: String, timestamp: i64 },
    /// A member stopped typing (explicit or timed out)
    TypingStop { username: String, timestamp: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_message_deserialize() {
        let json = r#"{"type": "chat_message", "text": "hello"}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        match msg {
            ClientMessage::ChatMessage { text } => assert_eq!(text, "hello"),
            _ => panic!("Wrong variant"),
        }
    }

    #[test]
    fn test_typing_start_deserialize() {
        let json = r#"{"type": "typing_start"}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        assert!(matches!(msg, ClientMessage::TypingStart));
    }

    #[test]
    fn test_unknown_type_deserializes_to_unknown() {
        let json = r#"{"type": "set_nickname", "nickname": "Alice"}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        assert!(matches!(msg, ClientMessage::Unknown));
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(serde_json::from_str::<ClientMessage>("not json").is_err());
        assert!(serde_json::from_str::<ClientMessage>(r#"{"text": "no tag"}"#).is_err());
    }

    #[test]
    fn test_welcome_serialize() {
        let msg = ServerMessage::Welcome {
            user_id: UserId("abc123def".to_string()),
            room_id: "r1".to_string(),
            username: "alice".to_string(),
            message: "Welcome to room r1, alice!".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"welcome\""));
        assert!(json.contains("\"userId\":\"abc123def\""));
        assert!(json.contains("\"roomId\":\"r1\""));
    }

    #[test]
    fn test_chat_broadcast_serialize() {
        let msg = ServerMessage::ChatMessage(ChatMessage {
            user_id: UserId("abc123def".to_string()),
            username: "alice".to_string(),
            text: "hi".to_string(),
            timestamp: 1700000000000,
        });
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"chat_message\""));
        assert!(json.contains("\"userId\":\"abc123def\""));
        assert!(json.contains("\"timestamp\":1700000000000"));
    }

    #[test]
    fn test_recent_messages_serialize() {
        let msg = ServerMessage::RecentMessages {
            messages: vec![ChatMessage {
                user_id: UserId("abc123def".to_string()),
                username: "alice".to_string(),
                text: "hi".to_string(),
                timestamp: 1,
            }],
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"recent_messages\""));
        assert!(json.contains("\"messages\":[{"));
    }

    #[test]
    fn test_typing_events_serialize() {
        let start = ServerMessage::TypingStart {
            username: "bob".to_string(),
            timestamp: 2,
        };
        let stop = ServerMessage::TypingStop {
            username: "bob".to_string(),
            timestamp: 3,
        };
        assert!(serde_json::to_string(&start)
            .unwrap()
            .contains("\"type\":\"typing_start\""));
        assert!(serde_json::to_string(&stop)
            .unwrap()
            .contains("\"type\":\"typing_stop\""));
    }
}
