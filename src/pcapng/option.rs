use std::borrow::Cow;

use nom::combinator::{complete, map_parser};
use nom::multi::many0;
use nom::IResult;
use nom::{bytes::streaming::take, error::ParseError};
use rusticata_macros::{align32, newtype_enum};

use crate::endianness::SectionEndianness;

#[derive(Clone, Copy, Eq, PartialEq)]
pub struct OptionCode(pub u16);

newtype_enum! {
impl debug OptionCode {
    EndOfOpt = 0,
    Comment = 1,
    ShbHardware = 2,
    ShbOs = 3,
    ShbUserAppl = 4,
    IfTsresol = 9,
    IfTsoffset = 14,
}
}

/// A block option: a 16-bit code, a declared value length and the raw value
#[derive(Debug)]
pub struct NgOption<'a> {
    pub code: OptionCode,
    pub len: u16,
    pub value: Cow<'a, [u8]>,
}

impl<'a> NgOption<'a> {
    /// Return a reference to the option value, as raw bytes (including padding)
    #[inline]
    pub fn value(&self) -> &[u8] {
        self.value.as_ref()
    }

    /// Return a reference to the option value, using the `len` field to
    /// limit it, or None if the declared length is invalid
    pub fn as_bytes(&self) -> Option<&[u8]> {
        let len = usize::from(self.len);
        if len <= self.value.len() {
            Some(&self.value[..len])
        } else {
            None
        }
    }
}

pub(crate) fn parse_ng_option<'i, En: SectionEndianness, E: ParseError<&'i [u8]>>(
    i: &'i [u8],
) -> IResult<&'i [u8], NgOption<'i>, E> {
    let (i, code) = En::parse_u16(i)?;
    let (i, len) = En::parse_u16(i)?;
    let (i, value) = take(align32!(len as u32))(i)?;
    let option = NgOption {
        code: OptionCode(code),
        len,
        value: Cow::Borrowed(value),
    };
    Ok((i, option))
}

pub(crate) fn opt_parse_options<'i, En: SectionEndianness, E: ParseError<&'i [u8]>>(
    i: &'i [u8],
    len: usize,
    opt_offset: usize,
) -> IResult<&'i [u8], Vec<NgOption<'i>>, E> {
    if len > opt_offset {
        map_parser(
            take(len - opt_offset),
            many0(complete(parse_ng_option::<En, E>)),
        )(i)
    } else {
        Ok((i, Vec::new()))
    }
}
