//! Typing-indicator countdown
//!
//! Each typing member holds one armed countdown task. The task does nothing
//! but sleep and post a `TypingExpired` command back to the relay actor; the
//! actor decides whether the expiry is still current. A repeated
//! `typing_start` aborts the old task and arms a fresh one under a bumped
//! sequence number, so a stale expiry that already left the task can never
//! emit a second `typing_stop`.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::server::ServerCommand;
use crate::types::ClientId;

/// Countdown before an unanswered `typing_start` auto-emits `typing_stop`
pub const TYPING_TIMEOUT: Duration = Duration::from_millis(3000);

/// One member's entry in a room's typing set
#[derive(Debug)]
pub struct TypingEntry {
    /// Wall-clock ms of the most recent `typing_start`
    pub started_at: i64,
    /// Sequence of the armed countdown; expiries with an older sequence are stale
    pub seq: u64,
    /// The armed countdown task
    pub timer: JoinHandle<()>,
}

impl TypingEntry {
    pub fn new(started_at: i64, seq: u64, timer: JoinHandle<()>) -> Self {
        Self {
            started_at,
            seq,
            timer,
        }
    }
}

impl Drop for TypingEntry {
    fn drop(&mut self) {
        self.timer.abort();
    }
}

/// Arm the auto-stop countdown for one (room, member) pair
///
/// After `TYPING_TIMEOUT` the task posts `TypingExpired` into the relay
/// actor's mailbox and exits. Aborting the returned handle before the sleep
/// completes suppresses the expiry entirely.
pub fn arm_timer(
    cmd_tx: mpsc::Sender<ServerCommand>,
    client_id: ClientId,
    seq: u64,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(TYPING_TIMEOUT).await;
        let _ = cmd_tx.send(ServerCommand::TypingExpired { client_id, seq }).await;
    })
}
