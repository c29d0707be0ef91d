//! # Frame Visitor
//!
//! 帧分发模块。
//!
//! 负责：
//! - 按固定顺序驱动元数据跟踪器与帧分发器
//! - 将 `SimpleBlock` 帧连同轨道/分片元数据交给 `FrameProcessor`
//! - 在 cluster 结束时清空标签处理器

pub mod composite;
pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod processors;
pub mod visitor;

pub use composite::CompositeVisitor;
pub use contracts::{FrameProcessor, MkvElement, SharedTagProcessor, TagProcessor};
pub use dispatcher::FrameDispatcher;
pub use error::FrameVisitorError;
pub use metadata_tracker::{FragmentMetadataTracker, TagCollector};
pub use metrics::{DispatchMetrics, MetricsSnapshot};
pub use processors::{create_processor, FileProcessor, FileProcessorConfig, LogProcessor};
pub use visitor::FrameVisitor;
