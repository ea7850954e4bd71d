//! Pairing and relay state machine.
//!
//! A token moves through `Created → Attached → Closed`. The viewer's
//! connection task owns the socket; the relay only hands it a queue.
//! Submissions enqueue into that queue, so frames for one viewer are
//! written by a single task and in submission order.

use std::sync::Arc;

use ink_common::{RelayError, Token};
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::eviction::EvictionPolicy;
use crate::protocol::Payload;
use crate::session::{Phase, Session};
use crate::store::SessionStore;

/// Attempts at drawing a fresh token before giving up.
const MAX_TOKEN_ATTEMPTS: usize = 8;

/// Default frames buffered per viewer.
pub const DEFAULT_OUTBOUND_CAPACITY: usize = 256;

/// Session registry keyed by token.
pub type Sessions = SessionStore<Token, Arc<Session>>;

/// Receiving half handed to the viewer's connection task on attach.
#[derive(Debug)]
pub struct ViewerAttachment {
    pub token: Token,
    pub outbound: mpsc::Receiver<String>,
}

/// Entry point for every pairing and relay operation.
#[derive(Clone)]
pub struct Relay {
    sessions: Sessions,
    outbound_capacity: usize,
}

impl Relay {
    pub fn new(outbound_capacity: usize) -> Self {
        Self::with_store(SessionStore::new(), outbound_capacity)
    }

    /// Build a relay over an existing store.
    pub fn with_store(sessions: Sessions, outbound_capacity: usize) -> Self {
        Self {
            sessions,
            outbound_capacity: outbound_capacity.max(1),
        }
    }

    pub fn sessions(&self) -> &Sessions {
        &self.sessions
    }

    /// Issue a new token for `owner_id` and register an unattached session.
    pub async fn create(&self, owner_id: &str) -> Result<Token, RelayError> {
        for _ in 0..MAX_TOKEN_ATTEMPTS {
            let token = Token::generate();
            let session = Arc::new(Session::new(token.clone(), owner_id));
            if self.sessions.insert_new(token.clone(), session).await {
                tracing::info!(token = %token, owner = %owner_id, "Session created");
                return Ok(token);
            }
            tracing::warn!(token = %token, "Token collision, regenerating");
        }
        Err(RelayError::Fatal(format!(
            "no unique token after {MAX_TOKEN_ATTEMPTS} attempts"
        )))
    }

    /// Bind a viewer to `token`. The returned queue carries every frame
    /// destined for that viewer until the session closes.
    pub async fn attach(&self, token: &Token) -> Result<ViewerAttachment, RelayError> {
        let session = self
            .sessions
            .get(token)
            .await
            .ok_or(RelayError::TokenExpired)?;

        let (tx, rx) = mpsc::channel(self.outbound_capacity);
        session.bind(tx)?;

        tracing::info!(token = %token, owner = %session.owner_id(), "Viewer attached");
        Ok(ViewerAttachment {
            token: token.clone(),
            outbound: rx,
        })
    }

    /// Relay `payload` to the viewer bound to `token`.
    ///
    /// Returns once the frame is queued; delivery is not awaited. A failed
    /// enqueue is logged and reported, never retried.
    pub async fn submit(&self, token: &Token, payload: Payload) -> Result<(), RelayError> {
        let session = self
            .sessions
            .get(token)
            .await
            .ok_or(RelayError::TokenExpired)?;

        let kind = payload.kind();
        match session.push(payload.encode()) {
            Ok(()) => {
                tracing::debug!(token = %token, kind = ?kind, "Payload relayed");
                Ok(())
            }
            Err(e @ RelayError::DeliveryFailed(_)) => {
                tracing::warn!(token = %token, kind = ?kind, error = %e, "Delivery failed");
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Remove the session for `token` and drop its viewer queue.
    /// Returns true if a session was removed.
    pub async fn close(&self, token: &Token) -> bool {
        match self.sessions.delete(token).await {
            Some(session) => {
                let previous = session.release();
                tracing::info!(token = %token, was = ?previous, "Session closed");
                true
            }
            None => false,
        }
    }

    /// Close every session. Returns how many were removed.
    pub async fn close_all(&self) -> usize {
        self.sessions
            .retain(|_, session| {
                session.release();
                false
            })
            .await
    }

    /// Current phase of `token`, or `None` if it is not in the store.
    pub async fn phase(&self, token: &Token) -> Option<Phase> {
        self.sessions.get(token).await.map(|s| s.phase())
    }

    /// Drop every session `policy` selects. Returns how many were removed.
    pub async fn reap(&self, policy: &dyn EvictionPolicy) -> usize {
        let now = Instant::now();
        self.sessions
            .retain(|token, session| {
                if policy.should_evict(session, now) {
                    session.release();
                    tracing::info!(token = %token, "Reaping stale session");
                    false
                } else {
                    true
                }
            })
            .await
    }

    /// Number of live sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.len().await
    }
}

impl Default for Relay {
    fn default() -> Self {
        Self::new(DEFAULT_OUTBOUND_CAPACITY)
    }
}

#[cfg(test)]
mod tests;
