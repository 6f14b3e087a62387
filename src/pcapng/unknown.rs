use nom::error::ParseError;
use nom::IResult;

use crate::endianness::{SectionEndianness, SectionLE};
use crate::error::CaptureError;

use super::*;

/// Unknown block (magic not recognized, or body not parsable)
///
/// The declared total length is still valid, so the block can be skipped.
#[derive(Debug)]
pub struct UnknownBlock<'a> {
    /// Block type (little endian)
    pub block_type: u32,
    pub block_len1: u32,
    pub data: &'a [u8],
    pub block_len2: u32,
}

impl<'a, En: SectionEndianness> NgBlockParser<'a, En, UnknownBlock<'a>> for UnknownBlock<'a> {
    const HDR_SZ: usize = 12;
    const MAGIC: u32 = 0;

    fn inner_parse<E: ParseError<&'a [u8]>>(
        block_type: u32,
        block_len1: u32,
        i: &'a [u8],
        block_len2: u32,
    ) -> IResult<&'a [u8], UnknownBlock<'a>, E> {
        let block = UnknownBlock {
            block_type,
            block_len1,
            data: i,
            block_len2,
        };
        Ok((i, block))
    }
}

/// Parse an unknown block
///
/// Only the framing is read; the body endianness does not matter since the
/// content is kept as raw bytes.
pub fn parse_unknown_block(i: &[u8]) -> IResult<&[u8], UnknownBlock, CaptureError<&[u8]>> {
    ng_block_parser::<UnknownBlock, SectionLE, _, _>()(i)
}
