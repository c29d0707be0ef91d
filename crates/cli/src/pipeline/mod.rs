//! Element stream pipeline: reader, processor wrapper, runner.

mod reader;
mod runner;
mod stats;
mod stats_processor;

pub use reader::ElementReader;
pub use runner::run_blueprint;
pub use stats::RunStats;
pub use stats_processor::StatsProcessor;
