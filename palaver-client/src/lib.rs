//! palaver-client: client endpoint for the palaver chat protocol
//!
//! Provides [`Session`], a connection/session manager over one persistent TCP
//! connection, with message framing handled by `palaver-protocol` and decoded
//! chat messages dispatched to a caller-supplied [`SessionEvents`] handler.

pub mod cli;
pub mod config;
pub mod session;

pub use config::SessionConfig;
pub use session::{Session, SessionEvents, SessionState};
