//! Protocol frame types and message payload extraction

/// One complete protocol unit exchanged over the connection.
///
/// On the wire, tagged frames take the form `<Tag>payload</Tag>` followed by a
/// NUL terminator. The disconnect notice is `<Disconnect>` plus the terminator
/// with no payload and no closing tag; the asymmetry is part of the protocol.
///
/// Payloads must not contain the NUL byte; the codec does not check for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Chat message: `<Message>payload</Message>`
    Message(String),
    /// Display name change: `<Name>payload</Name>`
    Name(String),
    /// Room change: `<RoomCode>payload</RoomCode>`
    Room(String),
    /// Disconnect notice: `<Disconnect>`
    Disconnect,
}

impl Frame {
    /// The bracketed tag name identifying this frame's kind on the wire
    pub fn tag(&self) -> &'static str {
        match self {
            Frame::Message(_) => "Message",
            Frame::Name(_) => "Name",
            Frame::Room(_) => "RoomCode",
            Frame::Disconnect => "Disconnect",
        }
    }
}

const MESSAGE_OPEN: &str = "<Message>";
const MESSAGE_CLOSE: &str = "</Message>";

/// Extract chat payloads from a completed frame text.
///
/// Scans for non-overlapping `<Message>...</Message>` spans, shortest inner
/// match first, and collects the payloads in order. Every other tag the server
/// may echo (`Name`, `RoomCode`, `Disconnect`) is dropped here; only chat
/// content reaches the application layer.
pub fn extract_messages(frame: &str) -> Vec<String> {
    let mut payloads = Vec::new();
    let mut rest = frame;

    while let Some(start) = rest.find(MESSAGE_OPEN) {
        let inner = &rest[start + MESSAGE_OPEN.len()..];
        match inner.find(MESSAGE_CLOSE) {
            Some(end) => {
                payloads.push(inner[..end].to_owned());
                rest = &inner[end + MESSAGE_CLOSE.len()..];
            }
            // Unterminated open tag: nothing more to extract
            None => break,
        }
    }

    payloads
}
