use serde::{Deserialize, Serialize};

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    pub port: u16,
    /// Scheme used in pairing QR codes when the request does not name one
    /// (`http` or `https`).
    pub public_scheme: String,
    /// Largest accepted drawing submission, in bytes.
    pub max_payload_bytes: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 20230,
            public_scheme: "http".into(),
            max_payload_bytes: 8 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding a listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
