//! Sentinel/`Option` conversions for the external flat-array boundary.
//!
//! Internally every missing value is a typed `Option<i32>`/`Option<f32>`.
//! The `-9999` sentinel exists only where this crate's API touches flat
//! arrays described by the data model: `real_delays`, `best_node`, and
//! `residual`.

/// Sentinel value marking absence in integer result channels.
pub const NULL_I32: i32 = -9999;

/// Sentinel value marking absence in real result channels.
pub const NULL_F32: f32 = -9999.0;

/// Minimum number of corroborating stations for the Delay Estimator's
/// per-time-index validity flag: the flag is set only when *more* than
/// this many stations produced a non-`NULL` delay (spec strictly `> 3`,
/// i.e. at least four).
pub const MIN_STATIONS_COUNT: usize = 3;

/// Minimum number of stations the Residual-cube kernel requires before a
/// node's residual is considered meaningful (spec `< 3` is rejected,
/// i.e. at least three).
pub const MIN_RESIDUAL_STATIONS: usize = 3;

#[inline]
pub fn encode_i32(value: Option<i32>) -> i32 {
    value.unwrap_or(NULL_I32)
}

#[inline]
pub fn decode_i32(value: i32) -> Option<i32> {
    if value == NULL_I32 {
        None
    } else {
        Some(value)
    }
}

#[inline]
pub fn encode_f32(value: Option<f32>) -> f32 {
    value.unwrap_or(NULL_F32)
}

#[inline]
pub fn decode_f32(value: f32) -> Option<f32> {
    if value == NULL_F32 {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_i32() {
        assert_eq!(decode_i32(encode_i32(Some(7))), Some(7));
        assert_eq!(decode_i32(encode_i32(None)), None);
        assert_eq!(encode_i32(None), NULL_I32);
    }

    #[test]
    fn roundtrip_f32() {
        assert_eq!(decode_f32(encode_f32(Some(1.5))), Some(1.5));
        assert_eq!(decode_f32(encode_f32(None)), None);
        assert_eq!(encode_f32(None), NULL_F32);
    }
}
