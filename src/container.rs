use crate::error::CaptureError;

/// Classic PCAP magic, as written by a little-endian producer and read
/// big-endian from the start of the file
pub const CLASSIC_LE_MAGIC: u32 = 0xD4C3_B2A1;
/// Classic PCAP magic, as written by a big-endian producer
pub const CLASSIC_BE_MAGIC: u32 = 0xA1B2_C3D4;
/// PCAP-NG section header magic (palindromic, endianness-neutral)
pub const NG_MAGIC: u32 = 0x0A0D_0D0A;

/// Outer container format of a capture input
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ContainerFormat {
    /// Classic PCAP, multi-byte fields little-endian
    ClassicLittleEndian,
    /// Classic PCAP, multi-byte fields big-endian
    ClassicBigEndian,
    /// PCAP-NG block stream
    NextGen,
}

/// Identify the container format from the first bytes of a capture input
///
/// The first 4 bytes are interpreted as a big-endian value and compared
/// against the three supported magic numbers. This check must run before any
/// further parsing.
pub fn detect_container(i: &[u8]) -> Result<ContainerFormat, CaptureError<&[u8]>> {
    if i.len() < 4 {
        return Err(CaptureError::TruncatedHeader);
    }
    let magic = u32::from_be_bytes([i[0], i[1], i[2], i[3]]);
    match magic {
        CLASSIC_LE_MAGIC => Ok(ContainerFormat::ClassicLittleEndian),
        CLASSIC_BE_MAGIC => Ok(ContainerFormat::ClassicBigEndian),
        NG_MAGIC => Ok(ContainerFormat::NextGen),
        _ => Err(CaptureError::UnrecognizedContainer(magic)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_classic_little_endian() {
        let buf = [0xd4, 0xc3, 0xb2, 0xa1, 0x02, 0x00];
        assert_eq!(
            detect_container(&buf),
            Ok(ContainerFormat::ClassicLittleEndian)
        );
    }

    #[test]
    fn detect_classic_big_endian() {
        let buf = [0xa1, 0xb2, 0xc3, 0xd4];
        assert_eq!(detect_container(&buf), Ok(ContainerFormat::ClassicBigEndian));
    }

    #[test]
    fn detect_pcapng() {
        let buf = [0x0a, 0x0d, 0x0d, 0x0a];
        assert_eq!(detect_container(&buf), Ok(ContainerFormat::NextGen));
    }

    #[test]
    fn reject_unknown_magic() {
        let buf = [0u8; 8];
        assert_eq!(
            detect_container(&buf),
            Err(CaptureError::UnrecognizedContainer(0))
        );
    }

    #[test]
    fn reject_short_input() {
        let buf = [0xd4, 0xc3];
        assert_eq!(detect_container(&buf), Err(CaptureError::TruncatedHeader));
    }
}
