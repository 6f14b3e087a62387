//! Capture blocks, independent of the container format

use crate::pcap::{ClassicHeader, ClassicRecord};
use crate::pcapng::NgBlock;

/// A block from a capture stream, classic or PCAP-NG
///
/// Note that this enum is only a thin wrapper of parsed blocks, data is not
/// copied out of the parse buffer.
#[derive(Debug)]
pub enum CaptureBlockOwned<'a> {
    /// Classic global header, emitted once at the start of a classic stream
    ClassicHeader(ClassicHeader),
    /// One classic record
    Classic(ClassicRecord<'a>),
    /// One PCAP-NG block
    Ng(NgBlock<'a>),
}

impl From<ClassicHeader> for CaptureBlockOwned<'static> {
    fn from(hdr: ClassicHeader) -> CaptureBlockOwned<'static> {
        CaptureBlockOwned::ClassicHeader(hdr)
    }
}

impl<'a> From<ClassicRecord<'a>> for CaptureBlockOwned<'a> {
    fn from(rec: ClassicRecord<'a>) -> CaptureBlockOwned<'a> {
        CaptureBlockOwned::Classic(rec)
    }
}

impl<'a> From<NgBlock<'a>> for CaptureBlockOwned<'a> {
    fn from(block: NgBlock<'a>) -> CaptureBlockOwned<'a> {
        CaptureBlockOwned::Ng(block)
    }
}
