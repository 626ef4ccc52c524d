//! Error types for the chat relay
//!
//! Defines connection-level errors and message send errors.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Connection-level errors
///
/// Everything here ends a single connection at most; nothing in the relay
/// core is fatal to the process. Malformed client payloads never surface as
/// an `AppError` - they are contained at the router and logged.
#[derive(Debug, Error)]
pub enum AppError {
    /// WebSocket protocol error (handshake or transport)
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Command channel send error (relay actor gone)
    #[error("Channel send error")]
    ChannelSend,
}

/// Message send errors
///
/// Occurs when delivering an encoded payload to one member's outbound
/// channel. Contained per recipient during fan-out, never propagated.
#[derive(Debug, Error)]
pub enum SendError {
    /// The receiving end of the channel has been closed
    #[error("Channel closed")]
    ChannelClosed,

    /// The outbound channel is full (slow client)
    #[error("Channel full")]
    ChannelFull,
}
