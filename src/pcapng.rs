//! PCAP-NG block stream
//!
//! A PCAP-NG capture is a sequence of typed blocks. Every block starts with
//! a 4-byte type and a 4-byte total length, and ends with a copy of the
//! total length. The type and both length fields are stored little-endian
//! whatever the section byte order; only block bodies follow the byte-order
//! magic of the enclosing Section Header Block.
//!
//! A section starts with a Section Header Block (SHB) and usually contains
//! one or more Interface Description Blocks (IDB) followed by packet blocks
//! (EPB, SPB). Blocks of any other type are exposed as [`UnknownBlock`] so
//! the caller can skip them by their declared length.

mod block;
mod enhanced_packet;
mod interface_description;
mod option;
mod reader;
mod section_header;
mod simple_packet;
mod time;
mod unknown;

pub use block::*;
pub use enhanced_packet::*;
pub use interface_description::*;
pub use option::*;
pub use reader::*;
pub use section_header::*;
pub use simple_packet::*;
pub use time::*;
pub use unknown::*;

/// Section Header Block magic
pub const SHB_MAGIC: u32 = 0x0A0D_0D0A;
/// Interface Description Block magic
pub const IDB_MAGIC: u32 = 0x0000_0001;
/// Simple Packet Block magic
pub const SPB_MAGIC: u32 = 0x0000_0003;
/// Enhanced Packet Block magic
pub const EPB_MAGIC: u32 = 0x0000_0006;
/// Byte Order magic
pub const BOM_MAGIC: u32 = 0x1A2B_3C4D;
