//! Multi-room WebSocket Chat Relay Library
//!
//! A room-based chat relay built with tokio-tungstenite using the Actor
//! pattern for state management.
//!
//! # Features
//! - WebSocket connection handling with join parameters in the URL query
//! - Named rooms, created lazily and reclaimed when the last member leaves
//! - Room-wide broadcast with per-recipient failure isolation
//! - Bounded per-room message history with replay on join
//! - Typing indicators with a 3-second auto-stop countdown
//! - Presence events (welcome / user_joined / user_left)
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `RelayServer` is the central actor owning the room registry
//! - Each connection has a `handler` task communicating with the server
//! - Typing countdowns post their expiry back into the actor's mailbox
//! - No locks needed - all state access goes through message passing
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use tokio::sync::mpsc;
//! use chat_relay::{handle_connection, RelayServer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await.unwrap();
//!     let (cmd_tx, cmd_rx) = mpsc::channel(256);
//!
//!     tokio::spawn(RelayServer::new(cmd_tx.clone(), cmd_rx).run());
//!
//!     while let Ok((stream, _)) = listener.accept().await {
//!         let cmd_tx = cmd_tx.clone();
//!         tokio::spawn(handle_connection(stream, cmd_tx));
//!     }
//! }
//! ```

pub mod broadcast;
pub mod config;
pub mod connection;
pub mod error;
pub mod handler;
pub mod message;
pub mod registry;
pub mod room;
pub mod server;
pub mod types;
pub mod typing;

// Re-export main types for convenience
pub use broadcast::{broadcast_to_room, send_to_member};
pub use config::ServerConfig;
pub use connection::ConnectionHandle;
pub use error::{AppError, SendError};
pub use handler::{handle_connection, JoinParams};
pub use message::{ChatMessage, ClientMessage, ServerMessage};
pub use registry::RoomRegistry;
pub use room::{Member, Room};
pub use server::{RelayServer, ServerCommand};
pub use types::{ClientId, RoomId, UserId};
