use std::convert::TryFrom;

use super::{NgOption, OptionCode};

/// Compute the timestamp resolution, in units per second
///
/// Return the resolution, or `None` if the resolution is invalid (for ex.
/// greater than `2^64`)
pub fn build_ts_resolution(ts_resol: u8) -> Option<u64> {
    let ts_mode = ts_resol & 0x80;
    let unit = if ts_mode == 0 {
        // 10^if_tsresol
        // check that if_tsresol <= 19 (10^19 is the largest power of 10 to fit in a u64)
        if ts_resol > 19 {
            return None;
        }
        10u64.pow(ts_resol as u32)
    } else {
        // 2^if_tsresol
        // check that the masked value <= 63
        let n = ts_resol & 0x7f;
        if n > 63 {
            return None;
        }
        1 << (n as u64)
    };
    Some(unit)
}

/// Given the timestamp parameters, return the timestamp as a `f64` value,
/// in seconds.
///
/// The resolution is given in units per second; zero is read as one unit
/// per second. The integral seconds saturate at `u64::MAX` instead of
/// wrapping. In PCAP-NG streams the resolution is stored in the Interface
/// Description Block, and can be obtained using
/// [`crate::InterfaceDescriptionBlock::ts_resolution`].
pub fn build_ts_f64(ts_high: u32, ts_low: u32, ts_offset: u64, resolution: u64) -> f64 {
    let ts: u64 = ((ts_high as u64) << 32) | (ts_low as u64);
    let resolution = resolution.max(1);
    let ts_sec = ts_offset.saturating_add(ts / resolution);
    let ts_fractional = ts % resolution;
    ts_sec as f64 + ((ts_fractional as f64) / (resolution as f64))
}

pub(crate) fn if_extract_tsoffset_and_tsresol(options: &[NgOption]) -> (u8, i64) {
    let mut if_tsresol: u8 = 6;
    let mut if_tsoffset: i64 = 0;
    for opt in options {
        match opt.code {
            OptionCode::IfTsresol => {
                if !opt.value.is_empty() {
                    if_tsresol = opt.value[0];
                }
            }
            OptionCode::IfTsoffset => {
                if let Ok(int_bytes) = <[u8; 8]>::try_from(&opt.value[..8.min(opt.value.len())]) {
                    if_tsoffset = i64::from_le_bytes(int_bytes);
                }
            }
            _ => (),
        }
    }
    (if_tsresol, if_tsoffset)
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    #[test]
    fn decode_ts() {
        // '97 c3 04 00 aa 47 ca 64', in little endian, decodes to
        // 2012-06-29 07:28:25.298858 UTC
        const INPUT_HIGH: [u8; 4] = hex!("97 c3 04 00");
        const INPUT_LOW: [u8; 4] = hex!("aa 47 ca 64");
        let ts_high = u32::from_le_bytes(INPUT_HIGH);
        let ts_low = u32::from_le_bytes(INPUT_LOW);
        let resolution = build_ts_resolution(6).unwrap();

        let ts = build_ts_f64(ts_high, ts_low, 0, resolution);
        assert!((ts - 1_340_954_905.298858).abs() < 1e-6);
    }

    #[test]
    fn resolution_modes() {
        assert_eq!(build_ts_resolution(0), Some(1));
        assert_eq!(build_ts_resolution(3), Some(1000));
        assert_eq!(build_ts_resolution(6), Some(1_000_000));
        assert_eq!(build_ts_resolution(9), Some(1_000_000_000));
        assert_eq!(build_ts_resolution(20), None);
        // high bit set: power of two
        assert_eq!(build_ts_resolution(0x80 | 10), Some(1024));
        assert_eq!(build_ts_resolution(0xff), None);
    }

    #[test]
    fn extreme_values_do_not_wrap() {
        let ts = build_ts_f64(u32::MAX, u32::MAX, u64::MAX, 1);
        assert!(ts.is_finite());
        assert_eq!(ts, u64::MAX as f64);
    }

    #[test]
    fn zero_resolution_counts_whole_seconds() {
        assert_eq!(build_ts_f64(0, 42, 1, 0), 43.0);
    }
}
