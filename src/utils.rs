use std::convert::TryInto;

/// Borrow 4 bytes at `offset` as a fixed-size array.
///
/// The caller must have checked that the slice is long enough.
#[inline]
pub(crate) fn array_ref4(s: &[u8], offset: usize) -> &[u8; 4] {
    s[offset..offset + 4]
        .try_into()
        .expect("array_ref4: slice too short")
}
