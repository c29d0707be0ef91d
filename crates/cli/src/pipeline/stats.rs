//! Run statistics.

use std::time::Duration;

use observability::FrameMetricsAggregator;

/// Statistics from one pass over an element stream
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Elements handed to the visitor
    pub elements_visited: u64,

    /// Frames accepted by the processor
    pub frames_dispatched: u64,

    /// Cluster exits seen
    pub clusters_closed: u64,

    /// Tracks declared in the stream
    pub tracks: usize,

    /// Whether tag collection was enabled
    pub tags_enabled: bool,

    /// Wall-clock duration of the pass
    pub duration: Duration,

    /// Per-frame aggregates
    pub frame_metrics: FrameMetricsAggregator,
}

impl RunStats {
    /// Frames processed per second
    pub fn frames_per_sec(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.frames_dispatched as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                      Run Statistics                          ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        println!("Overview");
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   ├─ Elements visited: {}", self.elements_visited);
        println!("   ├─ Frames dispatched: {}", self.frames_dispatched);
        println!("   ├─ Clusters: {}", self.clusters_closed);
        println!("   ├─ Tracks: {}", self.tracks);
        println!("   ├─ Tags: {}", if self.tags_enabled { "on" } else { "off" });
        println!("   └─ Frames/s: {:.2}", self.frames_per_sec());

        println!("\n{}", self.frame_metrics.summary());
    }
}
