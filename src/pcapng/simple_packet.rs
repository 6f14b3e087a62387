use nom::bytes::streaming::take;
use nom::error::ParseError;
use nom::IResult;

use crate::endianness::{SectionBE, SectionEndianness, SectionLE};
use crate::error::CaptureError;
use crate::traits::NgPacketBlock;
use crate::SPB_MAGIC;

use super::*;

/// The Simple Packet Block (SPB) is a lightweight container for storing
/// the packets coming from the network.
///
/// It carries no timestamp and no interface ID: the packet implicitly
/// belongs to the first interface of the section.
///
/// This struct is a thin abstraction layer, and stores the raw block data.
/// For ex the `data` field is stored with the padding.
/// It implements the [`NgPacketBlock`] trait, which provides helper functions.
#[derive(Debug)]
pub struct SimplePacketBlock<'a> {
    pub block_type: u32,
    pub block_len1: u32,
    /// Original packet length
    pub origlen: u32,
    pub data: &'a [u8],
    pub block_len2: u32,
}

impl<'a> NgPacketBlock for SimplePacketBlock<'a> {
    fn truncated(&self) -> bool {
        self.origlen as usize > self.data.len()
    }
    fn orig_len(&self) -> u32 {
        self.origlen
    }
    fn raw_packet_data(&self) -> &[u8] {
        self.data
    }
    fn packet_data(&self) -> &[u8] {
        let caplen = self.origlen as usize;
        if caplen < self.data.len() {
            &self.data[..caplen]
        } else {
            self.data
        }
    }
}

impl<'a, En: SectionEndianness> NgBlockParser<'a, En, SimplePacketBlock<'a>>
    for SimplePacketBlock<'a>
{
    const HDR_SZ: usize = 16;
    const MAGIC: u32 = SPB_MAGIC;

    fn inner_parse<E: ParseError<&'a [u8]>>(
        block_type: u32,
        block_len1: u32,
        i: &'a [u8],
        block_len2: u32,
    ) -> IResult<&'a [u8], SimplePacketBlock<'a>, E> {
        // caller function already tested header type(magic) and length
        // read end of header
        let (i, origlen) = En::parse_u32(i)?;
        let (i, data) = take((block_len1 as usize) - 16)(i)?;
        let block = SimplePacketBlock {
            block_type,
            block_len1,
            origlen,
            data,
            block_len2,
        };
        Ok((i, block))
    }
}

/// Parse a Simple Packet Block (little-endian)
///
/// *Note: this function does not remove padding in the `data` field.
/// Use `packet_data` to get the field without padding.*
pub fn parse_simple_packet_block_le(
    i: &[u8],
) -> IResult<&[u8], SimplePacketBlock, CaptureError<&[u8]>> {
    ng_block_parser::<SimplePacketBlock, SectionLE, _, _>()(i)
}

/// Parse a Simple Packet Block (big-endian)
///
/// *Note: this function does not remove padding*
pub fn parse_simple_packet_block_be(
    i: &[u8],
) -> IResult<&[u8], SimplePacketBlock, CaptureError<&[u8]>> {
    ng_block_parser::<SimplePacketBlock, SectionBE, _, _>()(i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn parse_spb() {
        // origlen 6, data padded to 8 bytes
        let input = hex!(
            "0300 0000 1800 0000 0600 0000"
            "0102 0304 0506 0000 1800 0000"
        );
        let (rem, spb) = parse_simple_packet_block_le(&input).expect("spb");
        assert!(rem.is_empty());
        assert_eq!(spb.orig_len(), 6);
        assert_eq!(spb.packet_data(), &hex!("0102 0304 0506"));
        assert!(!spb.truncated());
    }
}
