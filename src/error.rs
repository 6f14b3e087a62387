use std::fmt;

use nom::error::{ErrorKind, ParseError};
use thiserror::Error;

/// The error type returned by the record and block parsers
///
/// Most variants are only seen by code driving a streaming reader
/// (`Incomplete`, `BufferTooSmall`, ...). The engine absorbs them and maps
/// the few terminal cases to [`AnalysisError`].
#[derive(Debug, PartialEq)]
pub enum CaptureError<I: Sized> {
    /// No more data available
    Eof,
    /// Buffer capacity is too small, and some full record cannot be stored
    BufferTooSmall,
    /// Expected more data but got EOF
    UnexpectedEof,
    /// An error happened during a `read` operation
    ReadError,
    /// Last record is incomplete, more data is required
    Incomplete(usize),
    /// The leading magic number does not match any supported container
    UnrecognizedContainer(u32),
    /// Input ends before the minimum container header
    TruncatedHeader,
    /// A section header block is present but its byte-order magic is invalid
    BadSectionHeader,
    /// A record or block declared an impossible length
    InvalidRecordLength,
    /// An error encountered during parsing
    NomError(I, ErrorKind),
    /// An error encountered during parsing (owned version)
    OwnedDataNomError(Vec<u8>, ErrorKind),
}

impl<I> CaptureError<I> {
    /// Creates a `CaptureError` from input and error kind
    pub fn from_data(input: I, errorkind: ErrorKind) -> Self {
        Self::NomError(input, errorkind)
    }
}

impl<I> CaptureError<I>
where
    I: AsRef<[u8]>,
{
    /// Creates an owned `CaptureError`, copying data out of the input buffer
    pub fn to_owned_vec(&self) -> CaptureError<&'static [u8]> {
        match self {
            CaptureError::Eof => CaptureError::Eof,
            CaptureError::BufferTooSmall => CaptureError::BufferTooSmall,
            CaptureError::UnexpectedEof => CaptureError::UnexpectedEof,
            CaptureError::ReadError => CaptureError::ReadError,
            CaptureError::Incomplete(n) => CaptureError::Incomplete(*n),
            CaptureError::UnrecognizedContainer(m) => CaptureError::UnrecognizedContainer(*m),
            CaptureError::TruncatedHeader => CaptureError::TruncatedHeader,
            CaptureError::BadSectionHeader => CaptureError::BadSectionHeader,
            CaptureError::InvalidRecordLength => CaptureError::InvalidRecordLength,
            CaptureError::NomError(i, k) => {
                CaptureError::OwnedDataNomError(i.as_ref().to_vec(), *k)
            }
            CaptureError::OwnedDataNomError(v, k) => {
                CaptureError::OwnedDataNomError(v.clone(), *k)
            }
        }
    }
}

impl<I> ParseError<I> for CaptureError<I> {
    fn from_error_kind(input: I, kind: ErrorKind) -> Self {
        CaptureError::NomError(input, kind)
    }
    fn append(input: I, kind: ErrorKind, _other: Self) -> Self {
        CaptureError::NomError(input, kind)
    }
}

impl<I> fmt::Display for CaptureError<I> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CaptureError::Eof => write!(f, "end of input"),
            CaptureError::BufferTooSmall => write!(f, "buffer is too small"),
            CaptureError::UnexpectedEof => write!(f, "unexpected end of input"),
            CaptureError::ReadError => write!(f, "read error"),
            CaptureError::Incomplete(n) => write!(f, "incomplete input (needs {})", n),
            CaptureError::UnrecognizedContainer(m) => {
                write!(f, "unrecognized capture container (magic 0x{:08x})", m)
            }
            CaptureError::TruncatedHeader => write!(f, "input too short for a capture header"),
            CaptureError::BadSectionHeader => write!(f, "invalid section byte-order magic"),
            CaptureError::InvalidRecordLength => write!(f, "invalid record length"),
            CaptureError::NomError(_, k) => write!(f, "parse error: {:?}", k),
            CaptureError::OwnedDataNomError(_, k) => write!(f, "parse error: {:?}", k),
        }
    }
}

impl<I> std::error::Error for CaptureError<I> where I: fmt::Debug {}

/// Terminal analysis failure, surfaced to the caller
///
/// Only an unusable container makes the whole analysis fail; any anomaly
/// past the container header degrades or truncates the result instead
/// (see [`crate::CaptureAnalysis`]).
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum AnalysisError {
    /// The input does not start with a known capture magic number
    #[error("unrecognized capture container (magic 0x{0:08x})")]
    UnrecognizedContainer(u32),
    /// The input ends before the minimum container header
    #[error("input too short for a capture header")]
    TruncatedHeader,
    /// The byte source failed during a read
    #[error("error reading from the capture source")]
    Read,
}

impl<I> From<CaptureError<I>> for AnalysisError {
    fn from(e: CaptureError<I>) -> Self {
        match e {
            CaptureError::UnrecognizedContainer(m) => AnalysisError::UnrecognizedContainer(m),
            CaptureError::ReadError => AnalysisError::Read,
            _ => AnalysisError::TruncatedHeader,
        }
    }
}
