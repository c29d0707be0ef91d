//! Fragment metadata tracker implementation.

use std::collections::HashMap;
use std::sync::Arc;

use contracts::{
    ContractError, DataElement, ElementKind, ElementValue, ElementVisitor, FragmentMetadata,
    MetadataSource, MkvTag, SharedTagProcessor, TrackMetadata, FRAGMENT_TAG_PREFIX,
};
use tracing::{debug, info, instrument, trace, warn};

/// Track entry being assembled from its child elements
#[derive(Debug, Default)]
struct TrackBuilder {
    track_number: Option<u64>,
    metadata: TrackMetadata,
}

impl TrackBuilder {
    fn apply(&mut self, element: &DataElement) -> Result<(), ContractError> {
        let Some(value) = &element.value else {
            return Ok(());
        };

        match element.kind {
            ElementKind::TrackNumber => self.track_number = Some(unsigned(element.kind, value)?),
            ElementKind::TrackUid => self.metadata.track_uid = Some(unsigned(element.kind, value)?),
            ElementKind::TrackType => {
                self.metadata.track_type = Some(unsigned(element.kind, value)?)
            }
            ElementKind::Name => self.metadata.name = Some(text(element.kind, value)?),
            ElementKind::CodecId => self.metadata.codec_id = Some(text(element.kind, value)?),
            ElementKind::CodecName => self.metadata.codec_name = Some(text(element.kind, value)?),
            ElementKind::CodecPrivate => {
                self.metadata.codec_private_data = value
                    .as_binary()
                    .cloned()
                    .ok_or_else(|| type_mismatch(element.kind, "binary"))?
            }
            ElementKind::PixelWidth => {
                self.metadata.pixel_width = Some(unsigned(element.kind, value)?)
            }
            ElementKind::PixelHeight => {
                self.metadata.pixel_height = Some(unsigned(element.kind, value)?)
            }
            ElementKind::SamplingFrequency => {
                self.metadata.sampling_frequency = Some(
                    value
                        .as_float()
                        .ok_or_else(|| type_mismatch(element.kind, "float"))?,
                )
            }
            ElementKind::Channels => self.metadata.channels = Some(unsigned(element.kind, value)?),
            ElementKind::BitDepth => self.metadata.bit_depth = Some(unsigned(element.kind, value)?),
            _ => {}
        }
        Ok(())
    }

    fn build(self) -> Result<TrackMetadata, ContractError> {
        let track_number = self.track_number.ok_or_else(|| {
            ContractError::element_decode(ElementKind::TrackEntry, "track entry without TrackNumber")
        })?;
        Ok(TrackMetadata {
            track_number,
            ..self.metadata
        })
    }
}

/// SimpleTag being assembled from TagName / TagString
#[derive(Debug, Default)]
struct PendingTag {
    name: Option<String>,
    value: Option<String>,
}

/// Tracks per-track and per-fragment metadata over an element stream
///
/// Must see every element before the frame dispatcher does, so that a
/// frame's context is already current when it is dispatched.
pub struct FragmentMetadataTracker {
    /// Declared tracks by number
    tracks: HashMap<u64, Arc<TrackMetadata>>,
    /// Fragment currently open
    current_fragment: Option<Arc<FragmentMetadata>>,
    /// Fragment that preceded the current one
    previous_fragment: Option<Arc<FragmentMetadata>>,
    /// Track entry under construction
    pending_track: Option<TrackBuilder>,
    /// Fragment tags of the open `Tags` element
    pending_fragment_tags: Option<HashMap<String, String>>,
    /// Open `SimpleTag`s, innermost last
    pending_tags: Vec<PendingTag>,
    /// Receives non-fragment tags
    tag_processor: Option<SharedTagProcessor>,
    /// Clusters opened so far
    cluster_count: u64,
}

impl FragmentMetadataTracker {
    /// Create a tracker without tag collection
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Create a tracker that forwards non-fragment tags to `tag_processor`
    pub fn with_tag_processor(tag_processor: SharedTagProcessor) -> Self {
        Self::build(Some(tag_processor))
    }

    fn build(tag_processor: Option<SharedTagProcessor>) -> Self {
        Self {
            tracks: HashMap::new(),
            current_fragment: None,
            previous_fragment: None,
            pending_track: None,
            pending_fragment_tags: None,
            pending_tags: Vec::new(),
            tag_processor,
            cluster_count: 0,
        }
    }

    /// Fragment that preceded the current one
    pub fn previous_fragment_metadata(&self) -> Option<Arc<FragmentMetadata>> {
        self.previous_fragment.clone()
    }

    /// Number of declared tracks
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Number of clusters opened since creation
    pub fn cluster_count(&self) -> u64 {
        self.cluster_count
    }

    fn reset(&mut self) {
        self.tracks.clear();
        self.current_fragment = None;
        self.previous_fragment = None;
        self.pending_track = None;
        self.pending_fragment_tags = None;
        self.pending_tags.clear();
    }

    fn finish_track(&mut self) -> Result<(), ContractError> {
        let Some(builder) = self.pending_track.take() else {
            return Ok(());
        };
        let track = builder.build()?;
        debug!(
            track_number = track.track_number,
            codec_id = ?track.codec_id,
            "track declared"
        );
        self.tracks.insert(track.track_number, Arc::new(track));
        Ok(())
    }

    fn finish_simple_tag(&mut self) {
        let Some(pending) = self.pending_tags.pop() else {
            return;
        };
        let (Some(name), Some(value)) = (pending.name, pending.value) else {
            warn!("SimpleTag without TagName/TagString ignored");
            return;
        };

        if name.starts_with(FRAGMENT_TAG_PREFIX) {
            if let Some(fragment_tags) = self.pending_fragment_tags.as_mut() {
                fragment_tags.insert(name, value);
                return;
            }
        }

        if let Some(tag_processor) = &self.tag_processor {
            let tag = MkvTag::new(name, value);
            trace!(name = %tag.name, "tag collected");
            tag_processor
                .borrow_mut()
                .process(&tag, self.current_fragment.as_deref());
        }
    }

    fn finish_tags(&mut self) {
        let Some(fragment_tags) = self.pending_fragment_tags.take() else {
            return;
        };
        if let Some(fragment) = FragmentMetadata::from_tags(&fragment_tags) {
            info!(
                fragment_number = %fragment.fragment_number,
                server_ts_ms = ?fragment.server_side_timestamp_ms,
                success = fragment.success,
                "fragment started"
            );
            self.previous_fragment = self.current_fragment.take();
            self.current_fragment = Some(Arc::new(fragment));
        }
    }
}

impl Default for FragmentMetadataTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementVisitor for FragmentMetadataTracker {
    #[instrument(level = "trace", name = "tracker_start_master", skip(self))]
    fn visit_start_master(&mut self, kind: ElementKind) -> Result<(), ContractError> {
        match kind {
            ElementKind::Segment => self.reset(),
            ElementKind::TrackEntry => self.pending_track = Some(TrackBuilder::default()),
            ElementKind::Tags => self.pending_fragment_tags = Some(HashMap::new()),
            ElementKind::SimpleTag => self.pending_tags.push(PendingTag::default()),
            ElementKind::Cluster => self.cluster_count += 1,
            _ => {}
        }
        Ok(())
    }

    #[instrument(level = "trace", name = "tracker_end_master", skip(self))]
    fn visit_end_master(&mut self, kind: ElementKind) -> Result<(), ContractError> {
        match kind {
            ElementKind::TrackEntry => self.finish_track()?,
            ElementKind::SimpleTag => self.finish_simple_tag(),
            ElementKind::Tags => self.finish_tags(),
            _ => {}
        }
        Ok(())
    }

    fn visit_data(&mut self, element: &DataElement) -> Result<(), ContractError> {
        if let Some(builder) = self.pending_track.as_mut() {
            builder.apply(element)?;
        }

        if let Some(pending) = self.pending_tags.last_mut() {
            match (element.kind, &element.value) {
                (ElementKind::TagName, Some(value)) => {
                    pending.name = Some(text(element.kind, value)?)
                }
                (ElementKind::TagString, Some(value)) => {
                    pending.value = Some(text(element.kind, value)?)
                }
                _ => {}
            }
        }
        Ok(())
    }
}

impl MetadataSource for FragmentMetadataTracker {
    fn track_metadata(&self, track_number: u64) -> Result<Arc<TrackMetadata>, ContractError> {
        self.tracks
            .get(&track_number)
            .cloned()
            .ok_or(ContractError::UnknownTrack { track_number })
    }

    fn current_fragment_metadata(&self) -> Option<Arc<FragmentMetadata>> {
        self.current_fragment.clone()
    }
}

fn unsigned(kind: ElementKind, value: &ElementValue) -> Result<u64, ContractError> {
    value
        .as_unsigned()
        .ok_or_else(|| type_mismatch(kind, "unsigned"))
}

fn text(kind: ElementKind, value: &ElementValue) -> Result<String, ContractError> {
    value
        .as_text()
        .map(str::to_string)
        .ok_or_else(|| type_mismatch(kind, "text"))
}

fn type_mismatch(kind: ElementKind, expected: &str) -> ContractError {
    ContractError::element_decode(kind, format!("expected {expected} value"))
}
