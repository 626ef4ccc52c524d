//! WebSocket connection handler
//!
//! Handles individual client connections: WebSocket handshake, join
//! parameter extraction, message parsing, and bidirectional communication
//! with the RelayServer.

use std::sync::{Arc, Mutex};

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use crate::connection::ConnectionHandle;
use crate::error::AppError;
use crate::message::ClientMessage;
use crate::server::ServerCommand;
use crate::types::{ClientId, RoomId};

/// Room used when the client supplies none
pub const DEFAULT_ROOM: &str = "default";

/// Username used when the client supplies none
pub const DEFAULT_USERNAME: &str = "Anonymous";

/// Per-connection outbound queue depth
const CLIENT_BUFFER_SIZE: usize = 32;

/// Join parameters from the connection URL
///
/// Taken from the `room` and `username` query parameters of the handshake
/// request. A missing or empty value falls back to the default; anything
/// else rides along untouched (room ids stay case-sensitive).
#[derive(Debug, PartialEq)]
pub struct JoinParams {
    pub room: RoomId,
    pub username: String,
}

impl JoinParams {
    /// Parse join parameters from a raw query string
    pub fn from_query(query: Option<&str>) -> Self {
        let mut room = None;
        let mut username = None;

        if let Some(query) = query {
            for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
                match key.as_ref() {
                    "room" => room = Some(value.into_owned()),
                    "username" => username = Some(value.into_owned()),
                    _ => {}
                }
            }
        }

        Self {
            room: RoomId::new(
                room.filter(|r| !r.is_empty())
                    .unwrap_or_else(|| DEFAULT_ROOM.to_string()),
            ),
            username: username
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
        }
    }
}

/// Handle a new TCP connection
///
/// Performs the WebSocket handshake (capturing the request URI for the join
/// parameters), registers with the RelayServer, and pumps messages both
/// ways until the client goes away.
pub async fn handle_connection(
    stream: TcpStream,
    cmd_tx: mpsc::Sender<ServerCommand>,
) -> Result<(), AppError> {
    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    debug!("New TCP connection from {}", peer_addr);

    // WebSocket handshake; the callback is the only place the request URI
    // is visible, so stash the query string for the join parameters
    let query = Arc::new(Mutex::new(None::<String>));
    let query_capture = Arc::clone(&query);
    let ws_stream = tokio_tungstenite::accept_hdr_async(
        stream,
        move |req: &Request, response: Response| -> Result<Response, ErrorResponse> {
            if let Ok(mut slot) = query_capture.lock() {
                *slot = req.uri().query().map(|q| q.to_string());
            }
            Ok(response)
        },
    )
    .await?;
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let params = JoinParams::from_query(query.lock().ok().and_then(|q| q.clone()).as_deref());

    // Generate connection ID
    let client_id = ClientId::new();
    info!(
        "Client {} connected from {} (room '{}', username '{}')",
        client_id, peer_addr, params.room, params.username
    );

    // Create channel for server -> client payloads
    let (msg_tx, mut msg_rx) = mpsc::channel::<String>(CLIENT_BUFFER_SIZE);
    let handle = ConnectionHandle::new(client_id, msg_tx);

    // Register with the RelayServer; it replies with the welcome event
    if cmd_tx
        .send(ServerCommand::Connect {
            handle,
            room_id: params.room,
            username: params.username,
        })
        .await
        .is_err()
    {
        error!("Failed to register client {} - server closed", client_id);
        return Err(AppError::ChannelSend);
    }

    // Clone cmd_tx for read task
    let cmd_tx_read = cmd_tx.clone();

    // Spawn read task (WebSocket -> ServerCommand)
    let read_task = tokio::spawn(async move {
        while let Some(msg_result) = ws_receiver.next().await {
            match msg_result {
                Ok(Message::Text(text)) => {
                    match serde_json::from_str::<ClientMessage>(&text) {
                        Ok(client_msg) => {
                            let Some(cmd) = client_message_to_command(client_id, client_msg)
                            else {
                                continue;
                            };
                            if cmd_tx_read.send(cmd).await.is_err() {
                                debug!("Server closed, ending read task for {}", client_id);
                                break;
                            }
                        }
                        Err(e) => {
                            // Contained: the connection stays open and no
                            // error goes back to the client
                            warn!("Invalid JSON from {}: {}", client_id, e);
                        }
                    }
                }
                Ok(Message::Close(_)) => {
                    debug!("Client {} sent close frame", client_id);
                    break;
                }
                Ok(Message::Ping(data)) => {
                    debug!("Ping from {}", client_id);
                    // Pong is handled automatically by tungstenite
                    let _ = data; // Suppress unused warning
                }
                Ok(Message::Pong(_)) => {
                    debug!("Pong from {}", client_id);
                }
                Ok(_) => {
                    // Binary or other message types - ignore
                }
                Err(e) => {
                    error!("WebSocket error for {}: {}", client_id, e);
                    break;
                }
            }
        }
        debug!("Read task ended for {}", client_id);
    });

    // Spawn write task (encoded payload -> WebSocket)
    let write_task = tokio::spawn(async move {
        while let Some(json) = msg_rx.recv().await {
            if ws_sender.send(Message::Text(json.into())).await.is_err() {
                debug!("WebSocket send failed, ending write task");
                break;
            }
        }
        debug!("Write task ended for client");

        // Send close frame when done
        let _ = ws_sender.close().await;
    });

    // Wait for either task to complete
    tokio::select! {
        _ = read_task => {
            debug!("Read task completed for {}", client_id);
        }
        _ = write_task => {
            debug!("Write task completed for {}", client_id);
        }
    }

    // Send disconnect command
    let _ = cmd_tx.send(ServerCommand::Disconnect { client_id }).await;

    info!("Client {} disconnected", client_id);

    Ok(())
}

/// Convert a ClientMessage to a ServerCommand
///
/// Returns None for the catch-all variant: unrecognized message types are
/// dropped without a protocol-level error.
fn client_message_to_command(client_id: ClientId, msg: ClientMessage) -> Option<ServerCommand> {
    match msg {
        ClientMessage::ChatMessage { text } => Some(ServerCommand::Chat { client_id, text }),
        ClientMessage::TypingStart => Some(ServerCommand::TypingStart { client_id }),
        ClientMessage::TypingStop => Some(ServerCommand::TypingStop { client_id }),
        ClientMessage::Unknown => {
            debug!("Ignoring unrecognized message type from {}", client_id);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_params_defaults() {
        let params = JoinParams::from_query(None);
        assert_eq!(params.room, RoomId::new("default".to_string()));
        assert_eq!(params.username, "Anonymous");
    }

    #[test]
    fn test_join_params_from_query() {
        let params = JoinParams::from_query(Some("room=r1&username=alice"));
        assert_eq!(params.room, RoomId::new("r1".to_string()));
        assert_eq!(params.username, "alice");
    }

    #[test]
    fn test_join_params_empty_values_fall_back() {
        let params = JoinParams::from_query(Some("room=&username="));
        assert_eq!(params.room, RoomId::new("default".to_string()));
        assert_eq!(params.username, "Anonymous");
    }

    #[test]
    fn test_join_params_percent_decoding() {
        let params = JoinParams::from_query(Some("room=team%20chat&username=alice%21"));
        assert_eq!(params.room, RoomId::new("team chat".to_string()));
        assert_eq!(params.username, "alice!");
    }

    #[test]
    fn test_join_params_ignores_unknown_keys() {
        let params = JoinParams::from_query(Some("token=abc&room=r1"));
        assert_eq!(params.room, RoomId::new("r1".to_string()));
        assert_eq!(params.username, "Anonymous");
    }

    #[test]
    fn test_unknown_message_maps_to_none() {
        let client_id = ClientId::new();
        assert!(client_message_to_command(client_id, ClientMessage::Unknown).is_none());
        assert!(matches!(
            client_message_to_command(client_id, ClientMessage::TypingStart),
            Some(ServerCommand::TypingStart { .. })
        ));
    }
}
