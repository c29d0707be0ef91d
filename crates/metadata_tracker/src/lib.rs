//! # Metadata Tracker
//!
//! 元素流元数据跟踪模块。
//!
//! 负责：
//! - 从 `TrackEntry` 收集轨道元数据
//! - 从 `AWS_KINESISVIDEO_*` 标签构建分片元数据
//! - 将其他标签转交给共享的 `TagProcessor`
//!
//! ## 使用示例
//!
//! ```ignore
//! use metadata_tracker::{FragmentMetadataTracker, TagCollector};
//! use contracts::{share_tag_processor, ElementVisitor, MetadataSource};
//!
//! let tags = share_tag_processor(TagCollector::new());
//! let mut tracker = FragmentMetadataTracker::with_tag_processor(tags);
//!
//! for element in &elements {
//!     tracker.visit(element)?;
//! }
//! let track = tracker.track_metadata(1)?;
//! ```

mod tag_collector;
mod tracker;

pub use tag_collector::TagCollector;
pub use tracker::FragmentMetadataTracker;

// Re-export contracts types
pub use contracts::{FragmentMetadata, MetadataSource, MkvTag, TagProcessor, TrackMetadata};
