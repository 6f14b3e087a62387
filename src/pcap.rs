//! Classic PCAP format
//!
//! A classic capture is a 24-byte global header followed by a flat sequence
//! of records, each a 16-byte header (timestamp, captured length, original
//! length) and the captured bytes. The global header magic decides the byte
//! order of everything that follows.

mod header;
mod reader;
mod record;

pub use header::*;
pub use reader::*;
pub use record::*;
