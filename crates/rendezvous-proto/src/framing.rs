//! Length-delimited framing for streams carrying rendezvous messages.
//!
//! Each frame is a 4-byte big-endian length followed by that many bytes of
//! encoded [`Message`].

use crate::error::CodecError;
use crate::message::{MAX_MESSAGE_SIZE, Message};

/// Size of the length prefix.
pub const FRAME_HEADER_SIZE: usize = 4;

/// Encode `message` as one frame.
///
/// # Errors
///
/// Returns [`CodecError::FrameTooLarge`] if the encoded message exceeds
/// [`MAX_MESSAGE_SIZE`].
pub fn encode_frame(message: &Message) -> Result<Vec<u8>, CodecError> {
    let body = message.to_bytes()?;
    if body.len() > MAX_MESSAGE_SIZE {
        return Err(CodecError::FrameTooLarge {
            size: body.len(),
            max: MAX_MESSAGE_SIZE,
        });
    }

    let mut frame = Vec::with_capacity(FRAME_HEADER_SIZE + body.len());
    frame.extend_from_slice(&(body.len() as u32).to_be_bytes());
    frame.extend_from_slice(&body);
    Ok(frame)
}

/// Decode the first frame in `buf`.
///
/// Returns `Ok(None)` until `buf` holds a complete frame, otherwise the
/// message and the number of bytes it consumed.
///
/// # Errors
///
/// Returns [`CodecError::FrameTooLarge`] as soon as the header declares a
/// length over [`MAX_MESSAGE_SIZE`], or the decoder error for a bad body.
pub fn decode_frame(buf: &[u8]) -> Result<Option<(Message, usize)>, CodecError> {
    let Some(header) = buf.first_chunk::<FRAME_HEADER_SIZE>() else {
        return Ok(None);
    };
    let len = u32::from_be_bytes(*header) as usize;
    if len > MAX_MESSAGE_SIZE {
        return Err(CodecError::FrameTooLarge {
            size: len,
            max: MAX_MESSAGE_SIZE,
        });
    }

    let end = FRAME_HEADER_SIZE + len;
    if buf.len() < end {
        return Ok(None);
    }

    let message = Message::from_bytes(&buf[FRAME_HEADER_SIZE..end])?;
    Ok(Some((message, end)))
}
