//! FileProcessor - writes frames to disk with folder structure

use contracts::{
    ContractError, FragmentMetadata, Frame, FrameProcessor, TagProcessor, TrackMetadata,
};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::{debug, error, instrument};

/// Configuration for FileProcessor
#[derive(Debug, Clone)]
pub struct FileProcessorConfig {
    /// Base output directory
    pub base_path: PathBuf,
}

impl FileProcessorConfig {
    /// Create config from params map
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let base_path = params
            .get("base_path")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./output"));

        Self { base_path }
    }
}

/// One line of `frames.jsonl`
#[derive(Debug, Serialize)]
struct FrameRecord<'a> {
    sequence: u64,
    track_number: u64,
    timecode: i16,
    key_frame: bool,
    size: usize,
    codec_id: Option<&'a str>,
    fragment_number: Option<&'a str>,
    producer_timestamp_ms: Option<u64>,
    tag_count: Option<usize>,
}

/// Processor that writes frame payloads to disk files
///
/// Layout: `<base>/track_<n>/<sequence>.bin` per frame, plus a
/// `<base>/frames.jsonl` index with one record per frame.
pub struct FileProcessor {
    name: String,
    config: FileProcessorConfig,
    created_dirs: HashSet<PathBuf>,
    index: Option<BufWriter<File>>,
    sequence: u64,
}

impl FileProcessor {
    /// Create a new FileProcessor
    pub fn new(name: impl Into<String>, config: FileProcessorConfig) -> std::io::Result<Self> {
        // Create base directory if it doesn't exist
        fs::create_dir_all(&config.base_path)?;
        let index = File::create(config.base_path.join("frames.jsonl"))?;

        Ok(Self {
            name: name.into(),
            config,
            created_dirs: HashSet::new(),
            index: Some(BufWriter::new(index)),
            sequence: 0,
        })
    }

    /// Create from params map (for factory)
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> std::io::Result<Self> {
        let config = FileProcessorConfig::from_params(params);
        Self::new(name, config)
    }

    /// Frames written so far
    pub fn frames_written(&self) -> u64 {
        self.sequence
    }

    fn write_frame_to_disk(
        &mut self,
        frame: &Frame,
        track: &TrackMetadata,
        fragment: Option<&FragmentMetadata>,
        tag_count: Option<usize>,
    ) -> std::io::Result<()> {
        let sequence = self.sequence;
        let Some(index) = self.index.as_mut() else {
            return Err(std::io::Error::other("processor already closed"));
        };

        // 1. Write payload
        let track_dir = self
            .config
            .base_path
            .join(format!("track_{}", frame.track_number));
        if !self.created_dirs.contains(&track_dir) {
            fs::create_dir_all(&track_dir)?;
            self.created_dirs.insert(track_dir.clone());
        }
        fs::write(track_dir.join(format!("{}.bin", sequence)), &frame.data)?;

        // 2. Append index record
        let record = FrameRecord {
            sequence,
            track_number: frame.track_number,
            timecode: frame.timecode,
            key_frame: frame.key_frame,
            size: frame.data.len(),
            codec_id: track.codec_id.as_deref(),
            fragment_number: fragment.map(|f| f.fragment_number.as_str()),
            producer_timestamp_ms: fragment.and_then(|f| f.producer_side_timestamp_ms),
            tag_count,
        };
        serde_json::to_writer(&mut *index, &record)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        index.write_all(b"\n")?;

        self.sequence += 1;
        Ok(())
    }

    fn persist_frame(
        &mut self,
        frame: &Frame,
        track: &TrackMetadata,
        fragment: Option<&FragmentMetadata>,
        tag_count: Option<usize>,
    ) -> Result<(), ContractError> {
        self.write_frame_to_disk(frame, track, fragment, tag_count)
            .map_err(|e| {
                error!(
                    processor = %self.name,
                    track_number = frame.track_number,
                    error = %e,
                    "Write failed"
                );
                ContractError::processor_write(&self.name, e.to_string())
            })
    }
}

impl FrameProcessor for FileProcessor {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "file_processor_process",
        skip_all,
        fields(processor = %self.name, track_number = frame.track_number)
    )]
    fn process(
        &mut self,
        frame: &Frame,
        track: &TrackMetadata,
        fragment: Option<&FragmentMetadata>,
    ) -> Result<(), ContractError> {
        self.persist_frame(frame, track, fragment, None)
    }

    #[instrument(
        name = "file_processor_process_with_tags",
        skip_all,
        fields(processor = %self.name, track_number = frame.track_number)
    )]
    fn process_with_tags(
        &mut self,
        frame: &Frame,
        track: &TrackMetadata,
        fragment: Option<&FragmentMetadata>,
        tags: Option<&dyn TagProcessor>,
    ) -> Result<(), ContractError> {
        self.persist_frame(frame, track, fragment, tags.map(|t| t.len()))
    }

    #[instrument(name = "file_processor_close", skip(self))]
    fn close(&mut self) -> Result<(), ContractError> {
        if let Some(mut index) = self.index.take() {
            index.flush()?;
        }
        debug!(
            processor = %self.name,
            frames = self.sequence,
            "FileProcessor closed"
        );
        Ok(())
    }
}
