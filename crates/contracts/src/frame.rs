//! Frame - payload of a SimpleBlock element

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::{ContractError, ElementKind};

const FLAG_KEY_FRAME: u8 = 0x80;
const FLAG_INVISIBLE: u8 = 0x08;
const FLAG_LACING: u8 = 0x06;
const FLAG_DISCARDABLE: u8 = 0x01;

/// Lacing mode of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lacing {
    #[default]
    None,
    Xiph,
    Fixed,
    Ebml,
}

impl Lacing {
    fn from_flags(flags: u8) -> Self {
        match (flags & FLAG_LACING) >> 1 {
            0 => Self::None,
            1 => Self::Xiph,
            2 => Self::Fixed,
            _ => Self::Ebml,
        }
    }
}

/// One frame of a track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Track the frame belongs to
    pub track_number: u64,

    /// Timecode relative to the enclosing cluster
    pub timecode: i16,

    #[serde(default)]
    pub key_frame: bool,

    #[serde(default)]
    pub invisible: bool,

    #[serde(default)]
    pub discardable: bool,

    #[serde(default)]
    pub lacing: Lacing,

    /// Frame payload (zero-copy slice of the block)
    #[serde(default)]
    pub data: Bytes,
}

impl Frame {
    /// Parse SimpleBlock contents
    ///
    /// Layout: track number (EBML vint), signed 16-bit big-endian timecode,
    /// flags byte, payload.
    ///
    /// # Errors
    /// Returns `ElementDecode` on a truncated block or invalid vint
    pub fn parse(raw: Bytes) -> Result<Self, ContractError> {
        let (track_number, vint_len) = read_vint(&raw)?;

        let header_len = vint_len + 3;
        if raw.len() < header_len {
            return Err(decode_error(format!(
                "block truncated: need {header_len} header bytes, got {}",
                raw.len()
            )));
        }

        let timecode = i16::from_be_bytes([raw[vint_len], raw[vint_len + 1]]);
        let flags = raw[vint_len + 2];

        Ok(Self {
            track_number,
            timecode,
            key_frame: flags & FLAG_KEY_FRAME != 0,
            invisible: flags & FLAG_INVISIBLE != 0,
            discardable: flags & FLAG_DISCARDABLE != 0,
            lacing: Lacing::from_flags(flags),
            data: raw.slice(header_len..),
        })
    }
}

fn read_vint(raw: &[u8]) -> Result<(u64, usize), ContractError> {
    let first = *raw
        .first()
        .ok_or_else(|| decode_error("empty block"))?;
    if first == 0 {
        return Err(decode_error("invalid vint marker"));
    }

    let len = first.leading_zeros() as usize + 1;
    if raw.len() < len {
        return Err(decode_error(format!(
            "vint truncated: need {len} bytes, got {}",
            raw.len()
        )));
    }

    let mut value = u64::from(first & 0xFFu8.checked_shr(len as u32).unwrap_or(0));
    for byte in &raw[1..len] {
        value = (value << 8) | u64::from(*byte);
    }
    Ok((value, len))
}

fn decode_error(message: impl Into<String>) -> ContractError {
    ContractError::element_decode(ElementKind::SimpleBlock, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_block() {
        let raw = Bytes::from_static(&[0x82, 0xFF, 0xFE, 0x89, 0x01, 0x02, 0x03]);
        let frame = Frame::parse(raw).unwrap();

        assert_eq!(frame.track_number, 2);
        assert_eq!(frame.timecode, -2);
        assert!(frame.key_frame);
        assert!(frame.invisible);
        assert!(frame.discardable);
        assert_eq!(frame.lacing, Lacing::None);
        assert_eq!(frame.data.as_ref(), &[0x01, 0x02, 0x03]);
    }

    #[test]
    fn test_parse_two_byte_track_number() {
        // 0x4101 => 2-byte vint, value 0x101
        let raw = Bytes::from_static(&[0x41, 0x01, 0x00, 0x00, 0x06]);
        let frame = Frame::parse(raw).unwrap();

        assert_eq!(frame.track_number, 0x101);
        assert_eq!(frame.lacing, Lacing::Ebml);
        assert!(!frame.key_frame);
        assert!(frame.data.is_empty());
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Frame::parse(Bytes::new()).is_err());
        assert!(Frame::parse(Bytes::from_static(&[0x00, 0x00, 0x00, 0x00])).is_err());
        assert!(Frame::parse(Bytes::from_static(&[0x81, 0x00, 0x00])).is_err());
    }
}
