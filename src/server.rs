//! RelayServer actor implementation
//!
//! The central actor that owns the room registry and all room state.
//! Connection handlers and typing countdowns talk to it exclusively through
//! its command channel, so every join, leave, history append, and typing
//! update is serialized on one event loop - no locks anywhere in the relay.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::broadcast::{broadcast_to_room, send_to_member};
use crate::connection::ConnectionHandle;
use crate::message::{ChatMessage, ServerMessage};
use crate::registry::RoomRegistry;
use crate::types::{ClientId, RoomId};
use crate::typing::{self, TypingEntry};

/// Most history entries replayed to a joining client
pub const RECENT_LIMIT: usize = 50;

/// Commands sent from handlers and countdown tasks to the RelayServer actor
#[derive(Debug)]
pub enum ServerCommand {
    /// New client connected and picked a room
    Connect {
        handle: ConnectionHandle,
        room_id: RoomId,
        username: String,
    },
    /// Client disconnected (close frame or transport error)
    Disconnect { client_id: ClientId },
    /// Client sent a chat message
    Chat { client_id: ClientId, text: String },
    /// Client started typing
    TypingStart { client_id: ClientId },
    /// Client stopped typing
    TypingStop { client_id: ClientId },
    /// A typing countdown ran out
    TypingExpired { client_id: ClientId, seq: u64 },
}

/// The main RelayServer actor
///
/// Owns the registry and the connection-to-room index. Keeps a sender to its
/// own mailbox so typing countdowns can post their expiry back in.
pub struct RelayServer {
    /// All rooms, created lazily and reclaimed when empty
    registry: RoomRegistry,
    /// Connection to room index for fast dispatch: ClientId -> RoomId
    conn_rooms: HashMap<ClientId, RoomId>,
    /// Sender side of the mailbox, cloned into countdown tasks
    cmd_tx: mpsc::Sender<ServerCommand>,
    /// Command receiver channel
    receiver: mpsc::Receiver<ServerCommand>,
}

impl RelayServer {
    /// Create a new RelayServer around an existing command channel
    pub fn new(cmd_tx: mpsc::Sender<ServerCommand>, receiver: mpsc::Receiver<ServerCommand>) -> Self {
        Self {
            registry: RoomRegistry::new(),
            conn_rooms: HashMap::new(),
            cmd_tx,
            receiver,
        }
    }

    /// Run the RelayServer event loop
    ///
    /// Continuously receives and processes commands until all senders are dropped.
    pub async fn run(mut self) {
        info!("RelayServer started");

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd).await;
        }

        info!("RelayServer shutting down");
    }

    /// Process a single command
    async fn handle_command(&mut self, cmd: ServerCommand) {
        match cmd {
            ServerCommand::Connect {
                handle,
                room_id,
                username,
            } => {
                self.handle_connect(handle, room_id, username).await;
            }
            ServerCommand::Disconnect { client_id } => {
                self.handle_disconnect(client_id).await;
            }
            ServerCommand::Chat { client_id, text } => {
                self.handle_chat(client_id, text).await;
            }
            ServerCommand::TypingStart { client_id } => {
                self.handle_typing_start(client_id).await;
            }
            ServerCommand::TypingStop { client_id } => {
                self.handle_typing_stop(client_id).await;
            }
            ServerCommand::TypingExpired { client_id, seq } => {
                self.handle_typing_expired(client_id, seq).await;
            }
        }
    }

    /// Handle a new connection joining its room
    ///
    /// Order matters: welcome to the joiner, `user_joined` to the others,
    /// then the history replay to the joiner (only when non-empty).
    async fn handle_connect(&mut self, handle: ConnectionHandle, room_id: RoomId, username: String) {
        let client_id = handle.id;
        info!(
            "Client {} joined room {} as '{}'",
            client_id, room_id, username
        );

        let now = Utc::now().timestamp_millis();
        let room = self.registry.get_or_create(&room_id);
        let member = room.join(handle, username, now);
        let user_id = member.user_id.clone();
        let username = member.username.clone();

        send_to_member(
            room,
            client_id,
            &ServerMessage::Welcome {
                user_id: user_id.clone(),
                room_id: room_id.to_string(),
                username: username.clone(),
                message: format!("Welcome to room {}, {}!", room_id, username),
            },
        );

        broadcast_to_room(
            room,
            &ServerMessage::UserJoined {
                username: username.clone(),
                user_id,
                message: format!("{} joined the chat", username),
                timestamp: now,
            },
            Some(client_id),
        );

        let recent = room.recent_history(RECENT_LIMIT);
        if !recent.is_empty() {
            send_to_member(
                room,
                client_id,
                &ServerMessage::RecentMessages { messages: recent },
            );
        }

        self.conn_rooms.insert(client_id, room_id);
        debug!(
            "Total connections: {}, Total rooms: {}",
            self.conn_rooms.len(),
            self.registry.room_count()
        );
    }

    /// Handle a connection going away
    async fn handle_disconnect(&mut self, client_id: ClientId) {
        info!("Client {} disconnected", client_id);

        let Some(room_id) = self.conn_rooms.remove(&client_id) else {
            return;
        };
        let Some(room) = self.registry.get_mut(&room_id) else {
            return;
        };

        // Announce only if the member was actually still present
        if let Some(member) = room.leave(client_id) {
            broadcast_to_room(
                room,
                &ServerMessage::UserLeft {
                    username: member.username.clone(),
                    user_id: member.user_id.clone(),
                    message: format!("{} left the chat", member.username),
                    timestamp: Utc::now().timestamp_millis(),
                },
                None,
            );
        }

        self.registry.remove_if_empty(&room_id);
        debug!(
            "Total connections: {}, Total rooms: {}",
            self.conn_rooms.len(),
            self.registry.room_count()
        );
    }

    /// Handle a chat message
    ///
    /// The relayed event goes to every member including the sender; clients
    /// rely on the echo instead of locally appending their own messages.
    async fn handle_chat(&mut self, client_id: ClientId, text: String) {
        let Some(room_id) = self.conn_rooms.get(&client_id) else {
            debug!("Chat from {} outside any room, discarding", client_id);
            return;
        };
        let Some(room) = self.registry.get_mut(room_id) else {
            return;
        };
        let Some(member) = room.members.get(&client_id) else {
            debug!("Chat from non-member {}, discarding", client_id);
            return;
        };

        let message = ChatMessage {
            user_id: member.user_id.clone(),
            username: member.username.clone(),
            text,
            timestamp: Utc::now().timestamp_millis(),
        };

        room.push_history(message.clone());
        broadcast_to_room(room, &ServerMessage::ChatMessage(message), None);
    }

    /// Handle typing indicator start
    ///
    /// A start while already typing re-arms the countdown under a fresh
    /// sequence; the replaced entry aborts its timer on drop.
    async fn handle_typing_start(&mut self, client_id: ClientId) {
        let Some(room_id) = self.conn_rooms.get(&client_id) else {
            return;
        };
        let Some(room) = self.registry.get_mut(room_id) else {
            return;
        };
        let Some(member) = room.members.get(&client_id) else {
            return;
        };
        let username = member.username.clone();

        let now = Utc::now().timestamp_millis();
        let seq = room.next_typing_seq();
        let timer = typing::arm_timer(self.cmd_tx.clone(), client_id, seq);
        room.start_typing(client_id, TypingEntry::new(now, seq, timer));

        broadcast_to_room(
            room,
            &ServerMessage::TypingStart {
                username,
                timestamp: now,
            },
            Some(client_id),
        );
    }

    /// Handle explicit typing indicator stop
    async fn handle_typing_stop(&mut self, client_id: ClientId) {
        let Some(room_id) = self.conn_rooms.get(&client_id) else {
            return;
        };
        let Some(room) = self.registry.get_mut(room_id) else {
            return;
        };

        // Not typing? Nothing to announce
        if room.stop_typing(client_id).is_none() {
            return;
        }
        let Some(member) = room.members.get(&client_id) else {
            return;
        };

        broadcast_to_room(
            room,
            &ServerMessage::TypingStop {
                username: member.username.clone(),
                timestamp: Utc::now().timestamp_millis(),
            },
            Some(client_id),
        );
    }

    /// Handle a typing countdown running out
    ///
    /// The sequence check makes an expiry that lost the race against an
    /// explicit stop or a re-arm a silent no-op, so each typing episode
    /// ends in exactly one `typing_stop`.
    async fn handle_typing_expired(&mut self, client_id: ClientId, seq: u64) {
        let Some(room_id) = self.conn_rooms.get(&client_id) else {
            return;
        };
        let Some(room) = self.registry.get_mut(room_id) else {
            return;
        };

        if !room.expire_typing(client_id, seq) {
            return;
        }
        let Some(member) = room.members.get(&client_id) else {
            return;
        };
        debug!("Typing countdown expired for {}", client_id);

        broadcast_to_room(
            room,
            &ServerMessage::TypingStop {
                username: member.username.clone(),
                timestamp: Utc::now().timestamp_millis(),
            },
            Some(client_id),
        );
    }
}
