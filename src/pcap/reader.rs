use crate::blocks::CaptureBlockOwned;
use crate::container::ContainerFormat;
use crate::error::CaptureError;
use crate::pcap::{
    parse_classic_header, parse_classic_record, parse_classic_record_be, ClassicHeader,
    ClassicRecord,
};
use crate::traits::CaptureIterator;
use circular::Buffer;
use nom::{IResult, Needed, Offset};
use std::io::Read;

/// Streaming iterator over classic PCAP data
///
/// This reader is a streaming parser based on a circular buffer: memory usage
/// is constant, so it can walk huge files or endless streams. It wraps any
/// input providing the `Read` trait and manages the buffer to expose an
/// iterator-like interface.
///
/// The first call to `next` returns the global header. Some of its fields
/// (the data link type, for example) must be stored to decode the records
/// that follow. Every later call returns one record.
///
/// The circular buffer has to be big enough for at least one complete
/// record. A larger value (at least 65k) is advised to avoid frequent reads
/// and buffer shifts.
///
/// **There are precautions to take when reading several records before
/// consuming data. See [`CaptureIterator`] for details.**
///
/// ## Example
///
/// ```rust
/// use capsight::*;
/// use capsight::traits::CaptureIterator;
///
/// // global header (little-endian, ethernet) followed by one empty record
/// let mut capture = vec![
///     0xd4, 0xc3, 0xb2, 0xa1, 0x02, 0x00, 0x04, 0x00,
///     0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
///     0xff, 0xff, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
/// ];
/// capture.extend_from_slice(&[0u8; 16]);
///
/// let mut num_blocks = 0;
/// let mut reader = ClassicReader::new(65536, &capture[..]).expect("ClassicReader");
/// loop {
///     match reader.next() {
///         Ok((offset, block)) => {
///             num_blocks += 1;
///             match block {
///                 CaptureBlockOwned::ClassicHeader(_hdr) => {
///                     // save hdr.network (linktype)
///                 }
///                 CaptureBlockOwned::Classic(_rec) => {
///                     // use the linktype to decode rec.data
///                 }
///                 CaptureBlockOwned::Ng(_) => unreachable!(),
///             }
///             reader.consume(offset);
///         }
///         Err(CaptureError::Eof) => break,
///         Err(CaptureError::Incomplete(_)) => {
///             reader.refill().unwrap();
///         }
///         Err(e) => panic!("error while reading: {:?}", e),
///     }
/// }
/// assert_eq!(num_blocks, 2);
/// ```
pub struct ClassicReader<R>
where
    R: Read,
{
    header: ClassicHeader,
    reader: R,
    buffer: Buffer,
    consumed: usize,
    header_sent: bool,
    reader_exhausted: bool,
    parse: ClassicParseFn,
}

type ClassicParseFn = fn(&[u8]) -> IResult<&[u8], ClassicRecord, CaptureError<&[u8]>>;

impl<R> ClassicReader<R>
where
    R: Read,
{
    /// Creates a new `ClassicReader<R>` with the provided buffer capacity.
    pub fn new(capacity: usize, reader: R) -> Result<ClassicReader<R>, CaptureError<&'static [u8]>> {
        let buffer = Buffer::with_capacity(capacity);
        Self::from_buffer(buffer, reader)
    }
    /// Creates a new `ClassicReader<R>` using the provided `Buffer`.
    pub fn from_buffer(
        mut buffer: Buffer,
        mut reader: R,
    ) -> Result<ClassicReader<R>, CaptureError<&'static [u8]>> {
        let sz = reader.read(buffer.space()).or(Err(CaptureError::ReadError))?;
        buffer.fill(sz);
        let (_rem, header) = match parse_classic_header(buffer.data()) {
            Ok((r, h)) => Ok((r, h)),
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(e.to_owned_vec()),
            Err(nom::Err::Incomplete(Needed::Size(n))) => Err(CaptureError::Incomplete(n.into())),
            Err(nom::Err::Incomplete(Needed::Unknown)) => Err(CaptureError::Incomplete(0)),
        }?;
        let parse = if header.is_bigendian() {
            parse_classic_record_be
        } else {
            parse_classic_record
        };
        // do not consume
        Ok(ClassicReader {
            header,
            reader,
            buffer,
            consumed: 0,
            header_sent: false,
            reader_exhausted: false,
            parse,
        })
    }
}

impl<R> CaptureIterator for ClassicReader<R>
where
    R: Read,
{
    fn next(&mut self) -> Result<(usize, CaptureBlockOwned), CaptureError<&'_ [u8]>> {
        if !self.header_sent {
            self.header_sent = true;
            return Ok((
                self.header.size(),
                CaptureBlockOwned::from(self.header.clone()),
            ));
        }
        // Return EOF if
        // 1) all bytes have been read
        // 2) no more data is available
        if self.buffer.available_data() == 0
            && (self.buffer.position() == 0 && self.reader_exhausted)
        {
            return Err(CaptureError::Eof);
        }
        let data = self.buffer.data();
        match (self.parse)(data) {
            Ok((rem, b)) => {
                let offset = data.offset(rem);
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
        if self.header.is_bigendian() {
            ContainerFormat::ClassicBigEndian
        } else {
            ContainerFormat::ClassicLittleEndian
        }
    }
}
