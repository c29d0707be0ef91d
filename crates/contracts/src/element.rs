//! MkvElement - element stream input
//!
//! Depth-first stream of master start/end markers and data leaves, as
//! produced by an EBML reader.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::{ContractError, Frame};

/// Matroska element kinds recognized by this workspace
///
/// Every other EBML ID is carried as `Other` and passes through visitors
/// untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Ebml,
    Segment,
    Info,
    TimecodeScale,
    Tracks,
    TrackEntry,
    TrackNumber,
    TrackUid,
    TrackType,
    Name,
    CodecId,
    CodecName,
    CodecPrivate,
    Video,
    PixelWidth,
    PixelHeight,
    Audio,
    SamplingFrequency,
    Channels,
    BitDepth,
    Cluster,
    Timecode,
    SimpleBlock,
    Tags,
    Tag,
    SimpleTag,
    TagName,
    TagString,
    /// Unrecognized element, raw EBML ID
    Other(u32),
}

impl ElementKind {
    /// Map a raw EBML element ID to its kind
    pub fn from_id(id: u32) -> Self {
        match id {
            0x1A45_DFA3 => Self::Ebml,
            0x1853_8067 => Self::Segment,
            0x1549_A966 => Self::Info,
            0x2A_D7B1 => Self::TimecodeScale,
            0x1654_AE6B => Self::Tracks,
            0xAE => Self::TrackEntry,
            0xD7 => Self::TrackNumber,
            0x73C5 => Self::TrackUid,
            0x83 => Self::TrackType,
            0x536E => Self::Name,
            0x86 => Self::CodecId,
            0x25_8688 => Self::CodecName,
            0x63A2 => Self::CodecPrivate,
            0xE0 => Self::Video,
            0xB0 => Self::PixelWidth,
            0xBA => Self::PixelHeight,
            0xE1 => Self::Audio,
            0xB5 => Self::SamplingFrequency,
            0x9F => Self::Channels,
            0x6264 => Self::BitDepth,
            0x1F43_B675 => Self::Cluster,
            0xE7 => Self::Timecode,
            0xA3 => Self::SimpleBlock,
            0x1254_C367 => Self::Tags,
            0x7373 => Self::Tag,
            0x67C8 => Self::SimpleTag,
            0x45A3 => Self::TagName,
            0x4487 => Self::TagString,
            other => Self::Other(other),
        }
    }

    /// Raw EBML element ID
    pub fn id(&self) -> u32 {
        match self {
            Self::Ebml => 0x1A45_DFA3,
            Self::Segment => 0x1853_8067,
            Self::Info => 0x1549_A966,
            Self::TimecodeScale => 0x2A_D7B1,
            Self::Tracks => 0x1654_AE6B,
            Self::TrackEntry => 0xAE,
            Self::TrackNumber => 0xD7,
            Self::TrackUid => 0x73C5,
            Self::TrackType => 0x83,
            Self::Name => 0x536E,
            Self::CodecId => 0x86,
            Self::CodecName => 0x25_8688,
            Self::CodecPrivate => 0x63A2,
            Self::Video => 0xE0,
            Self::PixelWidth => 0xB0,
            Self::PixelHeight => 0xBA,
            Self::Audio => 0xE1,
            Self::SamplingFrequency => 0xB5,
            Self::Channels => 0x9F,
            Self::BitDepth => 0x6264,
            Self::Cluster => 0x1F43_B675,
            Self::Timecode => 0xE7,
            Self::SimpleBlock => 0xA3,
            Self::Tags => 0x1254_C367,
            Self::Tag => 0x7373,
            Self::SimpleTag => 0x67C8,
            Self::TagName => 0x45A3,
            Self::TagString => 0x4487,
            Self::Other(id) => *id,
        }
    }
}

/// Typed value of a data element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementValue {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Text(String),
    Binary(Bytes),
    Frame(Frame),
}

impl ElementValue {
    pub fn as_unsigned(&self) -> Option<u64> {
        match self {
            Self::Unsigned(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Unsigned(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_binary(&self) -> Option<&Bytes> {
        match self {
            Self::Binary(v) => Some(v),
            _ => None,
        }
    }
}

/// Leaf element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataElement {
    /// Element kind
    pub kind: ElementKind,

    /// Decoded value, `None` when the reader could not materialize one
    #[serde(default)]
    pub value: Option<ElementValue>,
}

impl DataElement {
    pub fn new(kind: ElementKind, value: ElementValue) -> Self {
        Self {
            kind,
            value: Some(value),
        }
    }

    /// Data element whose value is absent
    pub fn empty(kind: ElementKind) -> Self {
        Self { kind, value: None }
    }

    /// Materialize the frame carried by this element
    ///
    /// Returns `Ok(None)` when there is no value or the value is not a block.
    ///
    /// # Errors
    /// Returns `ElementDecode` if binary block contents are malformed
    pub fn frame_value(&self) -> Result<Option<Frame>, ContractError> {
        match &self.value {
            Some(ElementValue::Frame(frame)) => Ok(Some(frame.clone())),
            Some(ElementValue::Binary(raw)) => Frame::parse(raw.clone()).map(Some),
            _ => Ok(None),
        }
    }
}

/// One node of the element stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MkvElement {
    /// Master element opened
    StartMaster { kind: ElementKind },
    /// Master element closed
    EndMaster { kind: ElementKind },
    /// Leaf element
    Data(DataElement),
}

impl MkvElement {
    pub fn start(kind: ElementKind) -> Self {
        Self::StartMaster { kind }
    }

    pub fn end(kind: ElementKind) -> Self {
        Self::EndMaster { kind }
    }

    pub fn data(kind: ElementKind, value: ElementValue) -> Self {
        Self::Data(DataElement::new(kind, value))
    }

    /// Element kind regardless of node shape
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::StartMaster { kind } | Self::EndMaster { kind } => *kind,
            Self::Data(data) => data.kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_id_mapping() {
        for kind in [
            ElementKind::Segment,
            ElementKind::Cluster,
            ElementKind::SimpleBlock,
            ElementKind::TrackEntry,
            ElementKind::CodecName,
            ElementKind::TagString,
        ] {
            assert_eq!(ElementKind::from_id(kind.id()), kind);
        }
        assert_eq!(ElementKind::from_id(0xEC), ElementKind::Other(0xEC));
    }

    #[test]
    fn test_frame_value_absent() {
        let element = DataElement::empty(ElementKind::SimpleBlock);
        assert!(element.frame_value().unwrap().is_none());
    }

    #[test]
    fn test_frame_value_from_binary() {
        // track 1, timecode 0x0010, key frame, payload [0xAA]
        let raw = Bytes::from_static(&[0x81, 0x00, 0x10, 0x80, 0xAA]);
        let element = DataElement::new(ElementKind::SimpleBlock, ElementValue::Binary(raw));

        let frame = element.frame_value().unwrap().unwrap();
        assert_eq!(frame.track_number, 1);
        assert_eq!(frame.timecode, 16);
        assert!(frame.key_frame);
        assert_eq!(frame.data.as_ref(), &[0xAA]);
    }

    #[test]
    fn test_frame_value_malformed_binary() {
        let element = DataElement::new(
            ElementKind::SimpleBlock,
            ElementValue::Binary(Bytes::from_static(&[0x81, 0x00])),
        );
        let err = element.frame_value().unwrap_err();
        assert!(matches!(err, ContractError::ElementDecode { .. }));
    }

    #[test]
    fn test_element_json_shape() {
        let json = r#"{"type":"end_master","kind":"cluster"}"#;
        let element: MkvElement = serde_json::from_str(json).unwrap();
        assert_eq!(element, MkvElement::end(ElementKind::Cluster));

        let json = r#"{"type":"data","kind":"track_number","value":{"unsigned":2}}"#;
        let element: MkvElement = serde_json::from_str(json).unwrap();
        assert_eq!(
            element,
            MkvElement::data(ElementKind::TrackNumber, ElementValue::Unsigned(2))
        );
    }
}
