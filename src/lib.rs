//! # Capture ingestion and analysis for PCAP and PCAP-NG data
//!
//! This crate reads the raw bytes of a capture file (classic PCAP or
//! PCAP-NG, little or big-endian), walks the record/block structure with
//! streaming zero-copy parsers, decodes each captured frame through the
//! link, network, transport and application layers, and aggregates the
//! result: per-packet records, protocol tallies, a conversation table,
//! size statistics and a time-series histogram.
//!
//! The input is treated as hostile. Malformed records are skipped or
//! downgraded, truncated files keep everything parsed before the cut, and
//! only an unusable container header is reported as an error; nothing
//! panics.
//!
//! # Example: analyzing a capture
//!
//! ```rust
//! use capsight::analyze;
//!
//! // classic little-endian capture with a single empty record
//! let mut capture = vec![
//!     0xd4, 0xc3, 0xb2, 0xa1, 0x02, 0x00, 0x04, 0x00,
//!     0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
//!     0xff, 0xff, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
//! ];
//! capture.extend_from_slice(&[0u8; 16]);
//!
//! let analysis = analyze(&capture).expect("analysis");
//! assert_eq!(analysis.summary.total_packets, 1);
//! assert_eq!(analysis.packets[0].sequence_number, 0);
//! ```
//!
//! Use [`CaptureAnalyzer`] for configuration (packet detail limit, histogram
//! buckets, default timestamp resolution), progress reporting and
//! cooperative cancellation.
//!
//! # Example: streaming access
//!
//! For block-level access, or to keep memory constant on large captures,
//! use the streaming readers behind [`create_reader`] (or directly
//! [`ClassicReader`] and [`NgReader`]). They wrap any input providing the
//! `Read` trait and expose one block at a time through the
//! [`traits::CaptureIterator`] trait; see [`ClassicReader`] for a complete
//! example.

mod blocks;
mod capture;
mod container;
mod endianness;
mod engine;
mod error;
mod linktype;
mod utils;

pub use blocks::*;
pub use capture::*;
pub use container::*;
pub use engine::*;
pub use error::*;
pub use linktype::*;

pub mod analysis;
pub mod decode;
pub mod pcap;
pub mod pcapng;
pub mod traits;

pub use analysis::*;
pub use decode::*;
pub use pcap::*;
pub use pcapng::*;
