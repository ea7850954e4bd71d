//! A pairing session: token, owner, and the viewer's outbound slot.

use std::sync::{Mutex, MutexGuard, PoisonError};

use ink_common::{RelayError, Token};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::time::Instant;

/// Handle used to enqueue text frames for the viewer's connection task.
pub type Outbound = mpsc::Sender<String>;

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Issued, no viewer bound yet.
    Created,
    /// A viewer connection is the relay target.
    Attached,
    /// Viewer gone or session evicted. Terminal.
    Closed,
}

enum Slot {
    Unattached,
    Attached(Outbound),
    Closed,
}

/// One viewer/peer pairing.
///
/// The outbound slot has its own lock, separate from the store's, so pushes
/// to different sessions never contend. The lock is only held for a
/// non-blocking enqueue and is never held across an `.await`.
pub struct Session {
    token: Token,
    owner_id: String,
    created_at: Instant,
    outbound: Mutex<Slot>,
}

impl Session {
    pub fn new(token: Token, owner_id: impl Into<String>) -> Self {
        Self {
            token,
            owner_id: owner_id.into(),
            created_at: Instant::now(),
            outbound: Mutex::new(Slot::Unattached),
        }
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub fn phase(&self) -> Phase {
        match *self.slot() {
            Slot::Unattached => Phase::Created,
            Slot::Attached(_) => Phase::Attached,
            Slot::Closed => Phase::Closed,
        }
    }

    /// Bind the viewer's outbound handle. Succeeds once per session.
    pub(crate) fn bind(&self, tx: Outbound) -> Result<(), RelayError> {
        let mut slot = self.slot();
        match *slot {
            Slot::Unattached => {
                *slot = Slot::Attached(tx);
                Ok(())
            }
            Slot::Attached(_) => Err(RelayError::AlreadyAttached),
            Slot::Closed => Err(RelayError::TokenExpired),
        }
    }

    /// Drop the outbound handle and mark the session closed.
    /// Returns the phase the session was in.
    pub(crate) fn release(&self) -> Phase {
        let mut slot = self.slot();
        let previous = match *slot {
            Slot::Unattached => Phase::Created,
            Slot::Attached(_) => Phase::Attached,
            Slot::Closed => Phase::Closed,
        };
        *slot = Slot::Closed;
        previous
    }

    /// Enqueue one frame for the viewer without waiting for delivery.
    pub(crate) fn push(&self, frame: String) -> Result<(), RelayError> {
        let slot = self.slot();
        let tx = match &*slot {
            Slot::Attached(tx) => tx,
            Slot::Unattached => return Err(RelayError::NotAttached),
            Slot::Closed => return Err(RelayError::TokenExpired),
        };
        tx.try_send(frame).map_err(|e| match e {
            TrySendError::Full(_) => RelayError::DeliveryFailed("viewer queue is full".into()),
            TrySendError::Closed(_) => {
                RelayError::DeliveryFailed("viewer connection is gone".into())
            }
        })
    }

    fn slot(&self) -> MutexGuard<'_, Slot> {
        // Critical sections never panic mid-update, so a poisoned slot is
        // still consistent.
        self.outbound.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token)
            .field("owner_id", &self.owner_id)
            .field("phase", &self.phase())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(Token::from("tok-A"), "cust-1")
    }

    #[test]
    fn new_session_is_unattached() {
        let s = session();
        assert_eq!(s.phase(), Phase::Created);
        assert_eq!(s.owner_id(), "cust-1");
        assert_eq!(s.token().as_str(), "tok-A");
    }

    #[test]
    fn push_before_bind_is_not_attached() {
        let s = session();
        assert_eq!(s.push("x".into()), Err(RelayError::NotAttached));
    }

    #[tokio::test]
    async fn bind_then_push_delivers() {
        let s = session();
        let (tx, mut rx) = mpsc::channel(4);
        s.bind(tx).unwrap();
        assert_eq!(s.phase(), Phase::Attached);

        s.push("hello".into()).unwrap();
        assert_eq!(rx.recv().await.as_deref(), Some("hello"));
    }

    #[test]
    fn second_bind_is_rejected() {
        let s = session();
        let (tx1, _rx1) = mpsc::channel(1);
        let (tx2, _rx2) = mpsc::channel(1);
        s.bind(tx1).unwrap();
        assert_eq!(s.bind(tx2), Err(RelayError::AlreadyAttached));
    }

    #[test]
    fn release_is_terminal() {
        let s = session();
        let (tx, _rx) = mpsc::channel(1);
        s.bind(tx).unwrap();
        assert_eq!(s.release(), Phase::Attached);
        assert_eq!(s.phase(), Phase::Closed);
        assert_eq!(s.push("x".into()), Err(RelayError::TokenExpired));

        let (tx, _rx) = mpsc::channel(1);
        assert_eq!(s.bind(tx), Err(RelayError::TokenExpired));
    }

    #[test]
    fn full_queue_is_delivery_failure() {
        let s = session();
        let (tx, _rx) = mpsc::channel(1);
        s.bind(tx).unwrap();
        s.push("one".into()).unwrap();
        assert!(matches!(
            s.push("two".into()),
            Err(RelayError::DeliveryFailed(_))
        ));
    }

    #[test]
    fn dropped_receiver_is_delivery_failure() {
        let s = session();
        let (tx, rx) = mpsc::channel(1);
        s.bind(tx).unwrap();
        drop(rx);
        assert!(matches!(
            s.push("x".into()),
            Err(RelayError::DeliveryFailed(_))
        ));
    }
}
