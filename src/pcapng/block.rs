use nom::bytes::streaming::take;
use nom::combinator::map;
use nom::error::*;
use nom::number::streaming::le_u32;
use nom::{Err, IResult};

use crate::endianness::{SectionBE, SectionEndianness, SectionLE};
use crate::error::CaptureError;

use super::*;

/// A block from a PCAP-NG stream
#[derive(Debug)]
pub enum NgBlock<'a> {
    SectionHeader(SectionHeaderBlock<'a>),
    InterfaceDescription(InterfaceDescriptionBlock<'a>),
    EnhancedPacket(EnhancedPacketBlock<'a>),
    SimplePacket(SimplePacketBlock<'a>),
    Unknown(UnknownBlock<'a>),
}

impl<'a> NgBlock<'a> {
    /// Returns true if the block contains a captured frame
    pub fn is_data_block(&self) -> bool {
        matches!(self, &NgBlock::EnhancedPacket(_) | &NgBlock::SimplePacket(_))
    }

    /// Return the magic number of the block
    pub fn magic(&self) -> u32 {
        match self {
            NgBlock::SectionHeader(_) => SHB_MAGIC,
            NgBlock::InterfaceDescription(_) => IDB_MAGIC,
            NgBlock::EnhancedPacket(_) => EPB_MAGIC,
            NgBlock::SimplePacket(_) => SPB_MAGIC,
            NgBlock::Unknown(ub) => ub.block_type,
        }
    }
}

/// Parse any block from a little-endian section
///
/// To find which endianness to use, read the section header
/// using `parse_section_header_block`
pub fn parse_ng_block_le(i: &[u8]) -> IResult<&[u8], NgBlock, CaptureError<&[u8]>> {
    parse_ng_block::<SectionLE>(i)
}

/// Parse any block from a big-endian section
///
/// To find which endianness to use, read the section header
/// using `parse_section_header_block`
pub fn parse_ng_block_be(i: &[u8]) -> IResult<&[u8], NgBlock, CaptureError<&[u8]>> {
    parse_ng_block::<SectionBE>(i)
}

fn parse_ng_block<En: SectionEndianness>(
    i: &[u8],
) -> IResult<&[u8], NgBlock<'_>, CaptureError<&[u8]>> {
    match le_u32(i) {
        Ok((_, id)) => {
            let res = match id {
                SHB_MAGIC => map(parse_section_header_block, NgBlock::SectionHeader)(i),
                IDB_MAGIC => map(
                    ng_block_parser::<InterfaceDescriptionBlock, En, _, _>(),
                    NgBlock::InterfaceDescription,
                )(i),
                SPB_MAGIC => map(
                    ng_block_parser::<SimplePacketBlock, En, _, _>(),
                    NgBlock::SimplePacket,
                )(i),
                EPB_MAGIC => map(
                    ng_block_parser::<EnhancedPacketBlock, En, _, _>(),
                    NgBlock::EnhancedPacket,
                )(i),
                _ => return map(parse_unknown_block, NgBlock::Unknown)(i),
            };
            // a typed block with a broken body degrades to an unknown block,
            // so the caller can skip it by length and stay aligned
            match res {
                Err(Err::Error(_)) => map(parse_unknown_block, NgBlock::Unknown)(i),
                res => res,
            }
        }
        Err(e) => Err(e),
    }
}

pub(crate) trait NgBlockParser<'a, En: SectionEndianness, O: 'a> {
    /// Minimum total block size, in bytes
    const HDR_SZ: usize;
    /// Block type magic, 0 to accept any type
    const MAGIC: u32;

    // caller function must have tested header type(magic) and length
    fn inner_parse<E: ParseError<&'a [u8]>>(
        block_type: u32,
        block_len1: u32,
        i: &'a [u8],
        block_len2: u32,
    ) -> IResult<&'a [u8], O, E>;
}

/// Create a block parser function, given the parameters (block object and endianness)
pub(crate) fn ng_block_parser<'a, P, En, O, E>() -> impl FnMut(&'a [u8]) -> IResult<&'a [u8], O, E>
where
    P: NgBlockParser<'a, En, O>,
    En: SectionEndianness,
    O: 'a,
    E: ParseError<&'a [u8]>,
{
    move |i: &[u8]| {
        // read generic block framing. The type and both total length fields
        // are always little-endian, only block bodies follow the section
        // byte order.
        if i.len() < P::HDR_SZ {
            return Err(Err::Incomplete(nom::Needed::new(P::HDR_SZ - i.len())));
        }
        let (i, block_type) = le_u32(i)?;
        let (i, block_len1) = le_u32(i)?;
        if block_len1 < P::HDR_SZ as u32 {
            return Err(Err::Error(E::from_error_kind(i, ErrorKind::Verify)));
        }
        if P::MAGIC != 0 && block_type != P::MAGIC {
            return Err(Err::Error(E::from_error_kind(i, ErrorKind::Verify)));
        }
        // 12 is block_type (4) + block_len1 (4) + block_len2 (4)
        let (i, block_content) = take(block_len1 - 12)(i)?;
        let (i, block_len2) = le_u32(i)?;
        // call the block content parsing function. The content slice is fully
        // delimited by block_len1, so a body parser asking for more bytes can
        // never be satisfied and is a hard error.
        let (_, b) = match P::inner_parse(block_type, block_len1, block_content, block_len2) {
            Err(Err::Incomplete(_)) => Err(Err::Error(E::from_error_kind(
                block_content,
                ErrorKind::Complete,
            ))),
            res => res,
        }?;
        // return the remaining bytes from the container, not content
        Ok((i, b))
    }
}
