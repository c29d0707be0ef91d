//! Track and fragment metadata
//!
//! Context the metadata tracker attaches to every dispatched frame.

use std::collections::HashMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Prefix of tag names that describe the enclosing fragment
pub const FRAGMENT_TAG_PREFIX: &str = "AWS_KINESISVIDEO_";

pub const TAG_FRAGMENT_NUMBER: &str = "AWS_KINESISVIDEO_FRAGMENT_NUMBER";
pub const TAG_SERVER_TIMESTAMP: &str = "AWS_KINESISVIDEO_SERVER_TIMESTAMP";
pub const TAG_PRODUCER_TIMESTAMP: &str = "AWS_KINESISVIDEO_PRODUCER_TIMESTAMP";
pub const TAG_ERROR_ID: &str = "AWS_KINESISVIDEO_ERROR_ID";
pub const TAG_ERROR_CODE: &str = "AWS_KINESISVIDEO_ERROR_CODE";

/// Static description of one track
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackMetadata {
    pub track_number: u64,

    #[serde(default)]
    pub track_uid: Option<u64>,

    /// Matroska track type (1 = video, 2 = audio, ...)
    #[serde(default)]
    pub track_type: Option<u64>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub codec_id: Option<String>,

    #[serde(default)]
    pub codec_name: Option<String>,

    /// Codec initialization data (SPS/PPS, AudioSpecificConfig, ...)
    #[serde(default)]
    pub codec_private_data: Bytes,

    // ===== Video =====
    #[serde(default)]
    pub pixel_width: Option<u64>,

    #[serde(default)]
    pub pixel_height: Option<u64>,

    // ===== Audio =====
    #[serde(default)]
    pub sampling_frequency: Option<f64>,

    #[serde(default)]
    pub channels: Option<u64>,

    #[serde(default)]
    pub bit_depth: Option<u64>,
}

impl TrackMetadata {
    pub fn new(track_number: u64) -> Self {
        Self {
            track_number,
            ..Default::default()
        }
    }
}

/// Snapshot of the fragment currently open in the stream
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FragmentMetadata {
    /// Fragment number assigned by the server
    pub fragment_number: String,

    /// Server-side ingestion timestamp (ms since epoch)
    pub server_side_timestamp_ms: Option<u64>,

    /// Producer-side timestamp (ms since epoch)
    pub producer_side_timestamp_ms: Option<u64>,

    /// Whether the fragment was ingested without error
    pub success: bool,

    pub error_id: Option<u64>,

    pub error_code: Option<String>,
}

impl FragmentMetadata {
    /// Build from collected fragment tags
    ///
    /// Returns `None` when no fragment tag was present.
    pub fn from_tags(tags: &HashMap<String, String>) -> Option<Self> {
        if tags.is_empty() {
            return None;
        }

        let error_code = tags.get(TAG_ERROR_CODE).cloned();
        Some(Self {
            fragment_number: tags.get(TAG_FRAGMENT_NUMBER).cloned().unwrap_or_default(),
            server_side_timestamp_ms: tags
                .get(TAG_SERVER_TIMESTAMP)
                .and_then(|v| seconds_to_millis(v)),
            producer_side_timestamp_ms: tags
                .get(TAG_PRODUCER_TIMESTAMP)
                .and_then(|v| seconds_to_millis(v)),
            success: error_code.is_none(),
            error_id: tags.get(TAG_ERROR_ID).and_then(|v| v.trim().parse().ok()),
            error_code,
        })
    }
}

/// "1509999999.123" -> 1509999999123
fn seconds_to_millis(value: &str) -> Option<u64> {
    let seconds: f64 = value.trim().parse().ok()?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    Some((seconds * 1000.0).round() as u64)
}
