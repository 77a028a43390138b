//! Chat session management
//!
//! One [`Session`] owns one TCP connection to a chat server, with message
//! framing and async dispatch handled by background tasks.

mod client;
mod handler;

pub use client::{Session, SessionState};
pub use handler::SessionEvents;
