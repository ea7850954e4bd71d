use serde::{Deserialize, Serialize};

/// Session lifetime and viewer queue settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionsConfig {
    /// Sessions that never got a viewer are reaped after this many seconds.
    /// `0` disables reaping.
    pub unattached_ttl_secs: u64,
    /// Reaper tick interval in seconds (valid range: 1-3600).
    pub reap_interval_secs: u64,
    /// Frames buffered per viewer before submissions start failing.
    pub outbound_capacity: u32,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            unattached_ttl_secs: 300,
            reap_interval_secs: 60,
            outbound_capacity: 256,
        }
    }
}
