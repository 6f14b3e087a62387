use circular::Buffer;
use std::io::Read;

use crate::container::{detect_container, ContainerFormat};
use crate::error::CaptureError;
use crate::pcap::ClassicReader;
use crate::pcapng::NgReader;
use crate::traits::CaptureIterator;

/// Build a streaming reader for the given capture source
///
/// Sniffs the container magic from the first bytes and returns the matching
/// [`ClassicReader`] or [`NgReader`] behind the [`CaptureIterator`] trait.
///
/// ## Example
///
/// ```rust
/// use capsight::{create_reader, CaptureError};
/// use capsight::traits::CaptureIterator;
///
/// let capture = &[
///     0xd4, 0xc3, 0xb2, 0xa1, 0x02, 0x00, 0x04, 0x00,
///     0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
///     0xff, 0xff, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
/// ];
/// let mut reader = create_reader(65536, &capture[..]).expect("reader");
/// let mut num_blocks = 0;
/// loop {
///     match reader.next() {
///         Ok((offset, _block)) => {
///             num_blocks += 1;
///             reader.consume(offset);
///         }
///         Err(CaptureError::Eof) => break,
///         Err(CaptureError::Incomplete(_)) => reader.refill().unwrap(),
///         Err(e) => panic!("error while reading: {:?}", e),
///     }
/// }
/// assert_eq!(num_blocks, 1);
/// ```
pub fn create_reader<'b, R>(
    capacity: usize,
    mut reader: R,
) -> Result<Box<dyn CaptureIterator + 'b>, CaptureError<&'static [u8]>>
where
    R: Read + 'b,
{
    let mut buffer = Buffer::with_capacity(capacity);
    let sz = reader.read(buffer.space()).or(Err(CaptureError::ReadError))?;
    buffer.fill(sz);
    let format = match detect_container(buffer.data()) {
        Ok(format) => format,
        Err(e) => return Err(e.to_owned_vec()),
    };
    match format {
        ContainerFormat::ClassicLittleEndian | ContainerFormat::ClassicBigEndian => {
            ClassicReader::from_buffer(buffer, reader)
                .map(|reader| Box::new(reader) as Box<dyn CaptureIterator + 'b>)
        }
        ContainerFormat::NextGen => NgReader::from_buffer(buffer, reader)
            .map(|reader| Box::new(reader) as Box<dyn CaptureIterator + 'b>),
    }
}
