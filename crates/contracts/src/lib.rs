//! # Contracts
//!
//! Frozen interface contracts, defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Stream Model
//! - Elements arrive depth-first: `StartMaster`, children, `EndMaster`
//! - `SimpleBlock` leaves carry frames; `Cluster` exits bound tag scope

mod blueprint;
mod element;
mod error;
mod frame;
mod metadata;
mod processor;
mod tags;
mod visitor;

pub use blueprint::*;
pub use element::*;
pub use error::*;
pub use frame::*;
pub use metadata::*;
pub use processor::FrameProcessor;
pub use tags::*;
pub use visitor::{ElementVisitor, MetadataSource};
