//! Session eviction: which sessions the periodic reaper removes.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::relay::Relay;
use crate::session::{Phase, Session};

/// Decides whether a session should be dropped from the store.
pub trait EvictionPolicy: Send + Sync {
    fn should_evict(&self, session: &Session, now: Instant) -> bool;
}

/// Evict sessions that never got a viewer within `ttl`.
///
/// Attached sessions are left alone; they end when their viewer disconnects.
#[derive(Debug, Clone, Copy)]
pub struct UnattachedTtl {
    ttl: Duration,
}

impl UnattachedTtl {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }
}

impl EvictionPolicy for UnattachedTtl {
    fn should_evict(&self, session: &Session, now: Instant) -> bool {
        match session.phase() {
            Phase::Created => now.duration_since(session.created_at()) > self.ttl,
            Phase::Attached => false,
            // Close already removed it from the store; drop any straggler.
            Phase::Closed => true,
        }
    }
}

/// Spawn the reaper loop. Runs until the returned handle is aborted.
pub fn spawn_reaper(
    relay: Relay,
    policy: Arc<dyn EvictionPolicy>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // First tick fires immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let reaped = relay.reap(policy.as_ref()).await;
            let count = relay.session_count().await;
            tracing::debug!(reaped, sessions = count, "Reaper tick");
        }
    })
}
