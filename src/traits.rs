//! Iterator and accessor traits shared by the streaming readers

use crate::blocks::CaptureBlockOwned;
use crate::container::ContainerFormat;
use crate::error::CaptureError;

/// Streaming access to a capture, one block at a time
///
/// Implementors wrap a `Read` source and a circular buffer. `next` parses
/// the block at the current position without consuming it; the caller
/// inspects the block, then calls `consume` with the returned offset to
/// advance.
///
/// ## Reading multiple blocks before consuming
///
/// The blocks returned by `next` borrow the parse buffer. Consuming or
/// refilling invalidates those borrows, so every block must be handled (or
/// copied out) before the buffer is touched again.
///
/// ## Errors
///
/// `next` signals the end of input with [`CaptureError::Eof`]. An
/// [`CaptureError::Incomplete`] means more data is needed: call `refill`
/// and retry. [`CaptureError::BufferTooSmall`] means the block cannot fit
/// in the buffer at its current capacity: call `grow` first.
pub trait CaptureIterator {
    /// Parse the block at the current position
    ///
    /// Returns the offset to consume after handling the block, and the block.
    fn next(&mut self) -> Result<(usize, CaptureBlockOwned), CaptureError<&[u8]>>;
    /// Advance the stream position by `offset` bytes
    fn consume(&mut self, offset: usize);
    /// Total number of bytes consumed since the start of the stream
    fn consumed(&self) -> usize;
    /// Refill the parse buffer from the underlying reader
    fn refill(&mut self) -> Result<(), CaptureError<&[u8]>>;
    /// Position inside the circular buffer
    fn position(&self) -> usize;
    /// Grow the parse buffer to `new_size` bytes, keeping available data
    fn grow(&mut self, new_size: usize) -> bool;
    /// The unparsed data currently buffered
    fn data(&self) -> &[u8];
    /// True once the underlying reader has returned end of input
    fn reader_exhausted(&self) -> bool;
    /// Container format served by this reader
    fn format(&self) -> ContainerFormat;
}

/// Common methods of the PCAP-NG blocks carrying a captured frame
pub trait NgPacketBlock {
    /// Return true if the packet was not fully captured
    fn truncated(&self) -> bool;
    /// Return the original length of the packet as seen on the wire
    fn orig_len(&self) -> u32;
    /// Return the raw captured data, with padding
    fn raw_packet_data(&self) -> &[u8];
    /// Return the captured data, without padding
    fn packet_data(&self) -> &[u8];
}
