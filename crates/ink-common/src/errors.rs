use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Outcome of a relay operation that did not go through.
///
/// Every variant is a per-request result; none of them should take down
/// the listener or any other session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RelayError {
    /// Token was never issued, or its session has already been closed.
    #[error("token is expired!")]
    TokenExpired,

    /// Token is live but no viewer connection is bound to it yet.
    #[error("no viewer attached to this token")]
    NotAttached,

    /// A viewer is already bound; sessions are never re-attached.
    #[error("a viewer is already attached to this token")]
    AlreadyAttached,

    /// Enqueueing a frame for the viewer failed.
    #[error("delivery to viewer failed: {0}")]
    DeliveryFailed(String),

    #[error("internal relay error: {0}")]
    Fatal(String),
}

#[derive(Debug, thiserror::Error)]
pub enum InkError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Relay(#[from] RelayError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}
