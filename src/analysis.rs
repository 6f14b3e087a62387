//! Aggregated capture analysis
//!
//! Data model of the analysis result: per-packet records, conversation
//! aggregates and the capture summary, plus the accumulator that builds
//! them while the engine walks a capture.

mod accumulator;
mod conversation;
mod record;
mod summary;

pub(crate) use accumulator::*;
pub use conversation::*;
pub use record::*;
pub use summary::*;
