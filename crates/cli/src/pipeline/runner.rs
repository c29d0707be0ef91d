//! Runs one element stream through a `FrameVisitor`.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use contracts::{share_tag_processor, FrameProcessor, RunBlueprint};
use frame_visitor::{create_processor, FrameVisitor, TagCollector};
use observability::record_track_count;
use tracing::{info, instrument, warn};

use super::{ElementReader, RunStats, StatsProcessor};

/// Visit the blueprint's input stream and dispatch every frame
///
/// `max_elements` caps how many elements are read; the processor is closed
/// whether or not the pass succeeds.
#[instrument(
    name = "cli_run_blueprint",
    skip(blueprint),
    fields(input = %blueprint.input.path, processor = %blueprint.processor.name)
)]
pub fn run_blueprint(blueprint: &RunBlueprint, max_elements: Option<usize>) -> Result<RunStats> {
    let start = Instant::now();

    let processor = create_processor(&blueprint.processor)
        .with_context(|| format!("Failed to create processor '{}'", blueprint.processor.name))?;
    let processor = StatsProcessor::new(processor);

    let mut visitor = if blueprint.tags.enabled {
        FrameVisitor::create_with_tags(processor, share_tag_processor(TagCollector::new()))
    } else {
        FrameVisitor::create(processor)
    };

    let path = Path::new(&blueprint.input.path);
    let file = File::open(path)
        .with_context(|| format!("Failed to open element stream {}", path.display()))?;
    let mut reader = ElementReader::new(BufReader::new(file));

    let limit = max_elements.unwrap_or(usize::MAX);
    let visit_result = visitor.visit_all(reader.by_ref().take(limit));
    let close_result = visitor.close();

    let visited = visit_result.context("Element stream traversal failed")?;
    if let Some(e) = reader.take_error() {
        return Err(e).context("Element stream ended early");
    }
    close_result.with_context(|| format!("Failed to close processor '{}'", blueprint.processor.name))?;

    if max_elements.is_some_and(|max| visited as usize >= max) {
        warn!(max_elements = limit, "Element limit reached, stream truncated");
    }

    let snapshot = visitor.metrics().snapshot();
    let tracks = visitor.tracker().track_count();
    record_track_count(tracks);

    let stats = RunStats {
        elements_visited: snapshot.elements_visited,
        frames_dispatched: snapshot.frames_dispatched,
        clusters_closed: snapshot.clusters_closed,
        tracks,
        tags_enabled: blueprint.tags.enabled,
        duration: start.elapsed(),
        frame_metrics: visitor.processor().metrics().clone(),
    };

    info!(
        elements = stats.elements_visited,
        frames = stats.frames_dispatched,
        processor = %visitor.processor().name(),
        "Element stream dispatched"
    );

    Ok(stats)
}
