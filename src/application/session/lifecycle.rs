//! Session lifecycle state shared by the hub and both pumps.
//!
//! ```text
//! Active ──begin_close(reason)──> Closing(reason) ──finish_close()──> Closed
//! ```
//!
//! Transitions only move forward. The first `begin_close` wins and fixes the
//! reason; later calls are no-ops, which is what makes concurrent close
//! requests from the hub and both pumps safe.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

/// Why a session started closing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The inbound pump failed to read a frame (remote close, protocol or
    /// transport error, read deadline).
    ReadFailed,
    /// The outbound pump failed to write a frame.
    WriteFailed,
    /// The hub processed an unregister for this session.
    Unregistered,
    /// The hub found the outbound queue full (or already closed) during a
    /// broadcast.
    Evicted,
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ReadFailed => "read_failed",
            Self::WriteFailed => "write_failed",
            Self::Unregistered => "unregistered",
            Self::Evicted => "evicted",
        };
        f.write_str(name)
    }
}

/// Lifecycle state of a client session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Closing(CloseReason),
    Closed,
}

impl SessionState {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Shared, cloneable handle to one session's lifecycle state.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    state: Arc<watch::Sender<SessionState>>,
}

impl Lifecycle {
    pub fn new() -> Self {
        let (state, _) = watch::channel(SessionState::Active);
        Self {
            state: Arc::new(state),
        }
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Move from `Active` to `Closing(reason)`.
    ///
    /// Returns `true` only for the call that performed the transition.
    pub fn begin_close(&self, reason: CloseReason) -> bool {
        self.state.send_if_modified(|state| {
            if state.is_active() {
                *state = SessionState::Closing(reason);
                true
            } else {
                false
            }
        })
    }

    /// Mark the connection as released. Implies `begin_close` if nobody
    /// requested it yet.
    pub fn finish_close(&self) {
        self.state.send_if_modified(|state| {
            if *state == SessionState::Closed {
                false
            } else {
                *state = SessionState::Closed;
                true
            }
        });
    }

    /// Resolves once the session has left `Active`.
    pub async fn closing(&self) {
        self.wait_for(|state| !state.is_active()).await;
    }

    /// Resolves once the connection has been released.
    pub async fn closed(&self) {
        self.wait_for(|state| *state == SessionState::Closed).await;
    }

    async fn wait_for(&self, predicate: impl FnMut(&SessionState) -> bool) {
        let mut rx = self.state.subscribe();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = rx.wait_for(predicate).await;
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}
