//! Serial Frame Protocol
//!
//! Wire format spoken with the remote host over the serial link.
//!
//! # Framing
//! Every message is a header immediately followed by at most one payload. Header and
//! payload are handed to the link as two separate writes.
//!
//! ```text
//! header:  [type: u8][len: int]
//! CONFIG:  [rows: int][cols: int]
//! VISUAL:  [pixel: u8; rows * cols]   (one grayscale byte per pixel)
//! ACK:     [0x06]                     (sent by the host, one byte)
//! ```
//!
//! `int` is a little-endian unsigned integer whose width is selected by [`IntWidth`].
//! Fields are packed, there is no padding between `type` and `len`.

use core::fmt;
use core::ops::Deref;

/// Byte the host sends to acknowledge a header
pub const ACK: u8 = 0x06;

/// Largest encoded header or config payload (two 32-bit fields)
const MAX_ENCODED: usize = 8;

/// Width of the integer fields on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IntWidth {
    /// 16-bit fields, the native `int` of the e-puck controller
    U16,
    /// 32-bit fields
    U32,
}

impl IntWidth {
    /// Number of bytes one field occupies
    pub const fn size(self) -> usize {
        match self {
            IntWidth::U16 => 2,
            IntWidth::U32 => 4,
        }
    }

    /// Largest value a field can carry
    pub const fn max_value(self) -> u32 {
        match self {
            IntWidth::U16 => u16::MAX as u32,
            IntWidth::U32 => u32::MAX,
        }
    }

    fn put(self, value: u32, out: &mut WireBytes) {
        match self {
            IntWidth::U16 => out.push(&(value as u16).to_le_bytes()),
            IntWidth::U32 => out.push(&value.to_le_bytes()),
        }
    }

    fn get(self, bytes: &[u8]) -> Result<u32, ProtocolError> {
        match self {
            IntWidth::U16 => match bytes {
                [lo, hi, ..] => Ok(u16::from_le_bytes([*lo, *hi]) as u32),
                _ => Err(ProtocolError::Truncated),
            },
            IntWidth::U32 => match bytes {
                [a, b, c, d, ..] => Ok(u32::from_le_bytes([*a, *b, *c, *d])),
                _ => Err(ProtocolError::Truncated),
            },
        }
    }
}

/// Message type tag, first byte of every header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MessageType {
    /// Frame geometry announcement, sent once per handshake
    Config = 0x01,
    /// One captured frame
    Visual = 0x02,
}

impl TryFrom<u8> for MessageType {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x01 => Ok(MessageType::Config),
            0x02 => Ok(MessageType::Visual),
            other => Err(ProtocolError::UnknownType(other)),
        }
    }
}

/// Errors raised while decoding the host side of the stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    /// Fewer bytes than the structure needs
    Truncated,
    /// Header type byte is neither CONFIG nor VISUAL
    UnknownType(u8),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Truncated => write!(f, "message truncated"),
            ProtocolError::UnknownType(t) => write!(f, "unknown message type 0x{:02x}", t),
        }
    }
}

/// Message header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MessageHeader {
    pub kind: MessageType,
    /// Payload length in bytes
    pub len: u32,
}

impl MessageHeader {
    /// Header announcing a [`ConfigPayload`] encoded with `width`
    pub const fn config(width: IntWidth) -> Self {
        Self {
            kind: MessageType::Config,
            len: ConfigPayload::encoded_len(width) as u32,
        }
    }

    /// Header announcing a frame of `len` bytes
    pub const fn visual(len: u32) -> Self {
        Self {
            kind: MessageType::Visual,
            len,
        }
    }

    /// Size of an encoded header
    pub const fn encoded_len(width: IntWidth) -> usize {
        1 + width.size()
    }

    pub fn encode(&self, width: IntWidth) -> WireBytes {
        let mut out = WireBytes::new();
        out.push(&[self.kind as u8]);
        width.put(self.len, &mut out);
        out
    }

    /// Parses a header from the front of `bytes`.
    ///
    /// Returns the header and the number of bytes consumed.
    pub fn decode(bytes: &[u8], width: IntWidth) -> Result<(Self, usize), ProtocolError> {
        let (&tag, rest) = bytes.split_first().ok_or(ProtocolError::Truncated)?;
        let kind = MessageType::try_from(tag)?;
        let len = width.get(rest)?;
        Ok((Self { kind, len }, Self::encoded_len(width)))
    }
}

/// Frame geometry sent after the CONFIG header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigPayload {
    pub rows: u32,
    pub cols: u32,
}

impl ConfigPayload {
    pub const fn encoded_len(width: IntWidth) -> usize {
        2 * width.size()
    }

    pub fn encode(&self, width: IntWidth) -> WireBytes {
        let mut out = WireBytes::new();
        width.put(self.rows, &mut out);
        width.put(self.cols, &mut out);
        out
    }

    pub fn decode(bytes: &[u8], width: IntWidth) -> Result<(Self, usize), ProtocolError> {
        let rows = width.get(bytes)?;
        let cols = width.get(&bytes[width.size()..])?;
        Ok((Self { rows, cols }, Self::encoded_len(width)))
    }
}

/// Small fixed-capacity buffer holding one encoded header or config payload
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct WireBytes {
    buf: [u8; MAX_ENCODED],
    len: usize,
}

impl WireBytes {
    const fn new() -> Self {
        Self {
            buf: [0; MAX_ENCODED],
            len: 0,
        }
    }

    fn push(&mut self, bytes: &[u8]) {
        let end = self.len + bytes.len();
        self.buf[self.len..end].copy_from_slice(bytes);
        self.len = end;
    }
}

impl Deref for WireBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl fmt::Debug for WireBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
