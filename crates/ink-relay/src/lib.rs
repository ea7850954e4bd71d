//! ink-relay: pairs a viewer with a peer by token and relays the peer's
//! drawings to the viewer over WebSocket.
//!
//! The viewer asks for a token, opens `/watch` with it, and from then on
//! every payload the peer submits under that token is pushed to the viewer
//! as a tagged JSON envelope. The relay never looks inside image payloads.

pub mod connection;
pub mod eviction;
pub mod pages;
pub mod protocol;
pub mod qr;
pub mod relay;
pub mod routes;
pub mod server;
pub mod session;
pub mod store;

pub use eviction::{EvictionPolicy, UnattachedTtl};
pub use protocol::{EnvelopeKind, Payload};
pub use relay::{Relay, ViewerAttachment};
pub use server::{build_router, start, AppState, ServerHandle};
pub use session::{Phase, Session};
pub use store::SessionStore;
