//! NUL-terminated tag framing for the chat wire protocol

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::frame::Frame;

/// Byte marking the end of every frame on the wire
pub const FRAME_TERMINATOR: u8 = 0x00;

/// Protocol codec error
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Frame is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Codec for outgoing [`Frame`]s and incoming frame texts.
///
/// Encoding produces `<Tag>payload</Tag>` plus the terminator byte
/// (`<Disconnect>` carries no payload and no closing tag). Decoding splits the
/// byte stream at terminators and yields each completed frame's text; tag
/// handling is left to [`crate::frame::extract_messages`]. An empty decoded
/// text (a lone terminator) is the server's disconnect signal.
pub struct FrameCodec;

impl FrameCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for FrameCodec {
    type Item = String;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let Some(pos) = src.iter().position(|&b| b == FRAME_TERMINATOR) else {
            // No terminator yet: keep accumulating
            return Ok(None);
        };

        let frame = src.split_to(pos);
        src.advance(1);

        // A second NUL right behind a non-empty frame's terminator marks the
        // remaining buffered bytes as zero padding from a fixed-size read;
        // drop them. A NUL at the start of the buffer is a real empty frame.
        if !frame.is_empty() && src.first() == Some(&FRAME_TERMINATOR) {
            src.clear();
        }

        let text = std::str::from_utf8(&frame)?.to_owned();
        Ok(Some(text))
    }
}

impl Encoder<Frame> for FrameCodec {
    type Error = CodecError;

    fn encode(&mut self, item: Frame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        match &item {
            Frame::Message(payload) | Frame::Name(payload) | Frame::Room(payload) => {
                let tag = item.tag();
                dst.reserve(2 * tag.len() + payload.len() + 6);
                dst.put_u8(b'<');
                dst.put_slice(tag.as_bytes());
                dst.put_u8(b'>');
                dst.put_slice(payload.as_bytes());
                dst.put_slice(b"</");
                dst.put_slice(tag.as_bytes());
                dst.put_u8(b'>');
            }
            Frame::Disconnect => {
                dst.put_slice(b"<Disconnect>");
            }
        }
        dst.put_u8(FRAME_TERMINATOR);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::extract_messages;

    fn encoded(frame: Frame) -> BytesMut {
        let mut codec = FrameCodec::new();
        let mut buf = BytesMut::new();
        codec.encode(frame, &mut buf).unwrap();
        buf
    }

    #[test]
    fn test_encode_message() {
        assert_eq!(&encoded(Frame::Message("hi".into()))[..], b"<Message>hi</Message>\0");
    }

    #[test]
    fn test_encode_name() {
        assert_eq!(&encoded(Frame::Name("Bob".into()))[..], b"<Name>Bob</Name>\0");
    }

    #[test]
    fn test_encode_room() {
        assert_eq!(
            &encoded(Frame::Room("AAAAA".into()))[..],
            b"<RoomCode>AAAAA</RoomCode>\0"
        );
    }

    #[test]
    fn test_encode_disconnect_has_no_closing_tag() {
        assert_eq!(&encoded(Frame::Disconnect)[..], b"<Disconnect>\0");
    }

    #[test]
    fn test_decode_waits_for_terminator() {
        let mut codec = FrameCodec::new();
        let mut buf = BytesMut::from(&b"<Message>hi</Message>"[..]);
        assert!(codec.decode(&mut buf).unwrap().is_none());

        buf.put_u8(FRAME_TERMINATOR);
        assert_eq!(codec.decode(&mut buf).unwrap().unwrap(), "<Message>hi</Message>");
    }

    #[test]
    fn test_roundtrip_through_arbitrary_chunks() {
        // Feed the encoded bytes to the decoder in every possible split
        let wire = encoded(Frame::Message("chunky payload".into()));
        for split in 1..wire.len() {
            let mut codec = FrameCodec::new();
            let mut buf = BytesMut::new();

            buf.extend_from_slice(&wire[..split]);
            let first = codec.decode(&mut buf).unwrap();

            buf.extend_from_slice(&wire[split..]);
            let second = codec.decode(&mut buf).unwrap();

            let text = match (first, second) {
                (Some(text), None) => text,
                (None, Some(text)) => text,
                other => panic!("split {}: unexpected decode result {:?}", split, other),
            };
            assert_eq!(extract_messages(&text), vec!["chunky payload"]);
        }
    }

    #[test]
    fn test_roundtrip_byte_by_byte() {
        let wire = encoded(Frame::Message("hi".into()));
        let mut codec = FrameCodec::new();
        let mut buf = BytesMut::new();
        let mut decoded = Vec::new();

        for &byte in wire.iter() {
            buf.put_u8(byte);
            while let Some(text) = codec.decode(&mut buf).unwrap() {
                decoded.push(text);
            }
        }

        assert_eq!(decoded, vec!["<Message>hi</Message>"]);
    }

    #[test]
    fn test_partial_frame_accumulation() {
        let mut codec = FrameCodec::new();
        let mut buf = BytesMut::new();

        buf.extend_from_slice(b"<Messa");
        assert!(codec.decode(&mut buf).unwrap().is_none());

        buf.extend_from_slice(b"ge>hi</Message>\0");
        assert_eq!(codec.decode(&mut buf).unwrap().unwrap(), "<Message>hi</Message>");
        assert!(codec.decode(&mut buf).unwrap().is_none());
    }

    #[test]
    fn test_multiple_frames_in_buffer() {
        let mut codec = FrameCodec::new();
        let mut buf = BytesMut::new();
        codec.encode(Frame::Message("a".into()), &mut buf).unwrap();
        codec.encode(Frame::Name("b".into()), &mut buf).unwrap();

        let first = codec.decode(&mut buf).unwrap().unwrap();
        let second = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(first, "<Message>a</Message>");
        assert_eq!(second, "<Name>b</Name>");
        assert!(codec.decode(&mut buf).unwrap().is_none());

        // Only the chat frame reaches the application layer
        let mut messages = extract_messages(&first);
        messages.extend(extract_messages(&second));
        assert_eq!(messages, vec!["a"]);
    }

    #[test]
    fn test_empty_frame_is_decoded() {
        // A lone terminator is a real (empty) frame: the disconnect signal
        let mut codec = FrameCodec::new();
        let mut buf = BytesMut::from(&b"\0"[..]);
        assert_eq!(codec.decode(&mut buf).unwrap().unwrap(), "");
    }

    #[test]
    fn test_zero_padding_is_discarded() {
        // Fixed 1024-byte read: one frame, rest zero padding
        let mut padded = [0u8; 1024];
        let wire = b"<Message>x</Message>\0";
        padded[..wire.len()].copy_from_slice(wire);

        let mut codec = FrameCodec::new();
        let mut buf = BytesMut::from(&padded[..]);

        let text = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(extract_messages(&text), vec!["x"]);
        assert!(buf.is_empty());
        assert!(codec.decode(&mut buf).unwrap().is_none());
    }

    #[test]
    fn test_padding_policy_eats_trailing_disconnect_signal() {
        // Known protocol ambiguity: a lone-NUL disconnect signal packed right
        // behind a data frame is indistinguishable from padding and is dropped
        let mut codec = FrameCodec::new();
        let mut buf = BytesMut::from(&b"<Message>x</Message>\0\0"[..]);

        assert_eq!(codec.decode(&mut buf).unwrap().unwrap(), "<Message>x</Message>");
        assert!(codec.decode(&mut buf).unwrap().is_none());
    }

    #[test]
    fn test_empty_frame_then_data_is_not_padding() {
        let mut codec = FrameCodec::new();
        let mut buf = BytesMut::from(&b"\0<Message>x</Message>\0"[..]);

        assert_eq!(codec.decode(&mut buf).unwrap().unwrap(), "");
        assert_eq!(codec.decode(&mut buf).unwrap().unwrap(), "<Message>x</Message>");
    }

    #[test]
    fn test_remainder_kept_after_frame() {
        let mut codec = FrameCodec::new();
        let mut buf = BytesMut::from(&b"<Message>a</Message>\0<Messa"[..]);

        assert_eq!(codec.decode(&mut buf).unwrap().unwrap(), "<Message>a</Message>");
        assert!(codec.decode(&mut buf).unwrap().is_none());

        buf.extend_from_slice(b"ge>b</Message>\0");
        assert_eq!(codec.decode(&mut buf).unwrap().unwrap(), "<Message>b</Message>");
    }

    #[test]
    fn test_invalid_utf8_is_an_error() {
        let mut codec = FrameCodec::new();
        let mut buf = BytesMut::from(&[0xff, 0xfe, 0x00][..]);
        assert!(matches!(codec.decode(&mut buf), Err(CodecError::Utf8(_))));
    }

    #[test]
    fn test_unicode_payload_roundtrip() {
        let wire = encoded(Frame::Message("héllo wörld 🦀".into()));
        let mut codec = FrameCodec::new();
        let mut buf = BytesMut::from(&wire[..]);

        let text = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(extract_messages(&text), vec!["héllo wörld 🦀"]);
    }
}
