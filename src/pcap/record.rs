use nom::bytes::streaming::take;
use nom::{Err, IResult, Needed};

use crate::error::CaptureError;
use crate::utils::array_ref4;

/// Captured lengths above this are treated as a corrupt record header
pub const MAX_RECORD_LENGTH: u32 = 0x0400_0000;

/// A classic PCAP record: 16-byte header followed by the captured bytes
#[derive(Clone, Debug)]
pub struct ClassicRecord<'a> {
    /// Timestamp, seconds part
    pub ts_sec: u32,
    /// Timestamp, microseconds part
    pub ts_usec: u32,
    /// Number of octets present in the capture
    pub caplen: u32,
    /// Length of the packet as seen on the wire
    pub origlen: u32,
    /// Captured data, `caplen` bytes
    pub data: &'a [u8],
}

impl<'a> ClassicRecord<'a> {
    /// Record timestamp as fractional seconds
    pub fn timestamp(&self) -> f64 {
        self.ts_sec as f64 + self.ts_usec as f64 / 1_000_000.0
    }
}

/// Read a classic record (little-endian)
pub fn parse_classic_record(i: &[u8]) -> IResult<&[u8], ClassicRecord, CaptureError<&[u8]>> {
    if i.len() < 16 {
        return Err(Err::Incomplete(Needed::new(16 - i.len())));
    }
    let ts_sec = u32::from_le_bytes(*array_ref4(i, 0));
    let ts_usec = u32::from_le_bytes(*array_ref4(i, 4));
    let caplen = u32::from_le_bytes(*array_ref4(i, 8));
    let origlen = u32::from_le_bytes(*array_ref4(i, 12));
    if caplen > MAX_RECORD_LENGTH {
        return Err(Err::Error(CaptureError::InvalidRecordLength));
    }
    let (i, data) = take(caplen as usize)(&i[16..])?;
    let record = ClassicRecord {
        ts_sec,
        ts_usec,
        caplen,
        origlen,
        data,
    };
    Ok((i, record))
}

/// Read a classic record (big-endian)
pub fn parse_classic_record_be(i: &[u8]) -> IResult<&[u8], ClassicRecord, CaptureError<&[u8]>> {
    if i.len() < 16 {
        return Err(Err::Incomplete(Needed::new(16 - i.len())));
    }
    let ts_sec = u32::from_be_bytes(*array_ref4(i, 0));
    let ts_usec = u32::from_be_bytes(*array_ref4(i, 4));
    let caplen = u32::from_be_bytes(*array_ref4(i, 8));
    let origlen = u32::from_be_bytes(*array_ref4(i, 12));
    if caplen > MAX_RECORD_LENGTH {
        return Err(Err::Error(CaptureError::InvalidRecordLength));
    }
    let (i, data) = take(caplen as usize)(&i[16..])?;
    let record = ClassicRecord {
        ts_sec,
        ts_usec,
        caplen,
        origlen,
        data,
    };
    Ok((i, record))
}
