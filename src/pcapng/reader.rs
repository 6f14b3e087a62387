use crate::blocks::CaptureBlockOwned;
use crate::container::ContainerFormat;
use crate::error::CaptureError;
use crate::pcapng::*;
use crate::traits::CaptureIterator;
use circular::Buffer;
use nom::{Needed, Offset};
use std::io::Read;

/// Byte order of the section currently being read
#[derive(Clone, Copy, Debug, Default)]
struct CurrentSectionInfo {
    big_endian: bool,
}

/// Streaming iterator over PCAP-NG data
///
/// This reader is a streaming parser based on a circular buffer: memory usage
/// is constant, so it can walk huge files or endless streams. It wraps any
/// input providing the `Read` trait and manages the buffer to expose an
/// iterator-like interface.
///
/// The first call to `next` returns the Section Header Block (SHB) that
/// marks the start of the section. Following calls return the blocks of the
/// section, some of them containing data (SPB, EPB), and others containing
/// information (IDB). Reaching a new SHB switches the body byte order for
/// the blocks that follow it.
///
/// Some information must be stored (for ex. the data link type from the IDB)
/// to decode following block contents. Usually a list of interfaces is kept
/// for each section: Enhanced Packet Blocks name an interface by its index,
/// and Simple Packet Blocks assume interface 0.
///
/// The circular buffer has to be big enough for at least one complete block.
/// A larger value (at least 65k) is advised to avoid frequent reads and
/// buffer shifts.
///
/// **There are precautions to take when reading several blocks before
/// consuming data. See [`CaptureIterator`] for details.**
pub struct NgReader<R>
where
    R: Read,
{
    info: CurrentSectionInfo,
    reader: R,
    buffer: Buffer,
    consumed: usize,
    reader_exhausted: bool,
}

impl<R> NgReader<R>
where
    R: Read,
{
    /// Creates a new `NgReader<R>` with the provided buffer capacity.
    pub fn new(capacity: usize, reader: R) -> Result<NgReader<R>, CaptureError<&'static [u8]>> {
        let buffer = Buffer::with_capacity(capacity);
        Self::from_buffer(buffer, reader)
    }
    /// Creates a new `NgReader<R>` using the provided `Buffer`.
    pub fn from_buffer(
        mut buffer: Buffer,
        mut reader: R,
    ) -> Result<NgReader<R>, CaptureError<&'static [u8]>> {
        let sz = reader.read(buffer.space()).or(Err(CaptureError::ReadError))?;
        buffer.fill(sz);
        // just check that the first block is a valid section header
        let (_rem, _shb) = match parse_section_header_block(buffer.data()) {
            Ok((r, h)) => Ok((r, h)),
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(e.to_owned_vec()),
            Err(nom::Err::Incomplete(Needed::Size(n))) => Err(CaptureError::Incomplete(n.into())),
            Err(nom::Err::Incomplete(Needed::Unknown)) => Err(CaptureError::Incomplete(0)),
        }?;
        let info = CurrentSectionInfo::default();
        // do not consume
        Ok(NgReader {
            info,
            reader,
            buffer,
            consumed: 0,
            reader_exhausted: false,
        })
    }
}

impl<R> CaptureIterator for NgReader<R>
where
    R: Read,
{
    fn next(&mut self) -> Result<(usize, CaptureBlockOwned), CaptureError<&[u8]>> {
        // Return EOF if
        // 1) all bytes have been read
        // 2) no more data is available
        if self.buffer.available_data() == 0
            && (self.buffer.position() == 0 && self.reader_exhausted)
        {
            return Err(CaptureError::Eof);
        }
        let data = self.buffer.data();
        let parse = if self.info.big_endian {
            parse_ng_block_be
        } else {
            parse_ng_block_le
        };
        match parse(data) {
            Ok((rem, b)) => {
                let offset = data.offset(rem);
                if let NgBlock::SectionHeader(ref shb) = b {
                    self.info.big_endian = shb.big_endian();
                }
                Ok((offset, CaptureBlockOwned::from(b)))
            }
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(e),
            Err(nom::Err::Incomplete(n)) => {
                if self.reader_exhausted {
                    // expected more bytes but the reader is at EOF, truncated capture?
                    Err(CaptureError::UnexpectedEof)
                } else {
                    match n {
                        Needed::Size(n) => {
                            if self.buffer.available_data() + usize::from(n)
                                >= self.buffer.capacity()
                            {
                                Err(CaptureError::BufferTooSmall)
                            } else {
                                Err(CaptureError::Incomplete(n.into()))
                            }
                        }
                        Needed::Unknown => Err(CaptureError::Incomplete(0)),
                    }
                }
            }
        }
    }
    fn consume(&mut self, offset: usize) {
        self.consumed += offset;
        self.buffer.consume(offset);
    }
    fn consumed(&self) -> usize {
        self.consumed
    }
    fn refill(&mut self) -> Result<(), CaptureError<&[u8]>> {
        self.buffer.shift();
        let space = self.buffer.space();
        // check if available space is empty, so we can distinguish
        // a read() returning 0 because of EOF or because we requested 0
        if space.is_empty() {
            return Ok(());
        }
        let sz = self.reader.read(space).or(Err(CaptureError::ReadError))?;
        self.reader_exhausted = sz == 0;
        self.buffer.fill(sz);
        Ok(())
    }
    fn position(&self) -> usize {
        self.buffer.position()
    }
    fn grow(&mut self, new_size: usize) -> bool {
        self.buffer.grow(new_size)
    }
    fn data(&self) -> &[u8] {
        self.buffer.data()
    }
    fn reader_exhausted(&self) -> bool {
        self.reader_exhausted
    }
    fn format(&self) -> ContainerFormat {
        ContainerFormat::NextGen
    }
}
