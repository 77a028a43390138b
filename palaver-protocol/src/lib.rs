//! palaver-protocol: Wire protocol definitions for the palaver chat client
//!
//! This crate defines the frame types and the NUL-terminated tag framing
//! used between the palaver client and a chat server over TCP.

pub mod codec;
pub mod frame;

// Re-export main types at crate root
pub use codec::{CodecError, FrameCodec, FRAME_TERMINATOR};
pub use frame::{extract_messages, Frame};
