use nom::number::streaming::{be_i32, be_u16, be_u32, le_i32, le_u16, le_u32};
use nom::{Err, IResult};

use crate::error::CaptureError;
use crate::linktype::Linktype;

/// Classic PCAP global header
///
/// The 24-byte header at the start of a classic capture. The magic number
/// carries the byte order of every header and record field that follows.
#[derive(Clone, Debug)]
pub struct ClassicHeader {
    /// File magic, as read in little-endian order. `0xa1b2c3d4` means the
    /// rest of the file is little-endian too; `0xd4c3b2a1` means every
    /// following field has to be byte-swapped.
    pub magic_number: u32,
    /// Major version (currently 2)
    pub version_major: u16,
    /// Minor version (currently 4)
    pub version_minor: u16,
    /// Correction time in seconds between GMT (UTC) and the local timezone
    pub thiszone: i32,
    /// Claimed accuracy of timestamps; in practice always 0
    pub sigfigs: u32,
    /// Max length of captured packets, in octets
    pub snaplen: u32,
    /// Data link type
    pub network: Linktype,
}

impl ClassicHeader {
    pub const fn size(&self) -> usize {
        24
    }

    /// True if record fields must be read big-endian
    pub fn is_bigendian(&self) -> bool {
        self.magic_number == 0xd4c3_b2a1
    }
}

/// Read the classic PCAP global header
///
/// Unknown magic values are rejected with
/// [`CaptureError::UnrecognizedContainer`], reporting the magic in the byte
/// order it appears on disk.
pub fn parse_classic_header(i: &[u8]) -> IResult<&[u8], ClassicHeader, CaptureError<&[u8]>> {
    let (i, magic_number) = le_u32(i)?;
    match magic_number {
        0xa1b2_c3d4 => {
            let (i, version_major) = le_u16(i)?;
            let (i, version_minor) = le_u16(i)?;
            let (i, thiszone) = le_i32(i)?;
            let (i, sigfigs) = le_u32(i)?;
            let (i, snaplen) = le_u32(i)?;
            let (i, network) = le_i32(i)?;
            let header = ClassicHeader {
                magic_number,
                version_major,
                version_minor,
                thiszone,
                sigfigs,
                snaplen,
                network: Linktype(network),
            };
            Ok((i, header))
        }
        0xd4c3_b2a1 => {
            let (i, version_major) = be_u16(i)?;
            let (i, version_minor) = be_u16(i)?;
            let (i, thiszone) = be_i32(i)?;
            let (i, sigfigs) = be_u32(i)?;
            let (i, snaplen) = be_u32(i)?;
            let (i, network) = be_i32(i)?;
            let header = ClassicHeader {
                magic_number,
                version_major,
                version_minor,
                thiszone,
                sigfigs,
                snaplen,
                network: Linktype(network),
            };
            Ok((i, header))
        }
        _ => Err(Err::Error(CaptureError::UnrecognizedContainer(
            magic_number.swap_bytes(),
        ))),
    }
}
