//! This module contains the pure kernel that splits a wall-clock timestamp into
//! the (Julian day number, nanoseconds of day) pair stored by INT96 columns.
//!
//! The Julian day number counts days from noon on 1 January 4713 BC
//! (proleptic Julian calendar); 1970-01-01 is day 2_440_588.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};

use crate::error::{ColIndexError, Result};
use crate::types::NanoTime;

/// Julian day number of 1970-01-01.
pub const JULIAN_DAY_OF_EPOCH: i32 = 2_440_588;

/// Offset between chrono's day count (0001-01-01 is day 1) and the Julian day number.
const JULIAN_DAY_OF_CE_DAY_ZERO: i32 = 1_721_425;

const NANOS_PER_SECOND: i64 = 1_000_000_000;
const NANOS_PER_DAY: i64 = 86_400 * NANOS_PER_SECOND;

/// Decomposes `ts` into its calendar date's Julian day and the nanoseconds
/// elapsed since midnight of that date.
pub fn encode(ts: &NaiveDateTime) -> NanoTime {
    let julian_day = ts.date().num_days_from_ce() + JULIAN_DAY_OF_CE_DAY_ZERO;
    let time = ts.time();
    // Leap-second representations (nanosecond >= 1e9) are folded into the
    // preceding second, as INT96 has no way to express them.
    let subsec = i64::from(time.nanosecond()).min(NANOS_PER_SECOND - 1);
    let nanos_of_day = i64::from(time.num_seconds_from_midnight()) * NANOS_PER_SECOND + subsec;
    NanoTime {
        julian_day,
        nanos_of_day,
    }
}

/// Rebuilds the wall-clock timestamp from its INT96 decomposition.
pub fn decode(value: &NanoTime) -> Result<NaiveDateTime> {
    if !(0..NANOS_PER_DAY).contains(&value.nanos_of_day) {
        return Err(ColIndexError::InternalError(format!(
            "nanos_of_day {} is outside a single day",
            value.nanos_of_day
        )));
    }
    let date = NaiveDate::from_num_days_from_ce_opt(value.julian_day - JULIAN_DAY_OF_CE_DAY_ZERO)
        .ok_or_else(|| {
            ColIndexError::InternalError(format!(
                "Julian day {} is outside the supported calendar range",
                value.julian_day
            ))
        })?;
    let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(|| {
        ColIndexError::InternalError(format!("cannot build midnight for {}", date))
    })?;
    Ok(midnight + Duration::nanoseconds(value.nanos_of_day))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_epoch_day_number() {
        let t = encode(&ts(1970, 1, 1, 0, 0));
        assert_eq!(t.julian_day, JULIAN_DAY_OF_EPOCH);
        assert_eq!(t.nanos_of_day, 0);
    }

    #[test]
    fn test_known_julian_days() {
        // 2000-01-01 is JDN 2_451_545.
        assert_eq!(encode(&ts(2000, 1, 1, 12, 0)).julian_day, 2_451_545);
        // 1885-01-01 predates the epoch; the day number is still positive.
        assert_eq!(encode(&ts(1885, 1, 1, 0, 0)).julian_day, 2_409_543);
    }

    #[test]
    fn test_nanos_of_day_and_roundtrip() {
        let original = ts(2015, 10, 21, 16, 29);
        let encoded = encode(&original);
        assert_eq!(encoded.nanos_of_day, (16 * 3600 + 29 * 60) * NANOS_PER_SECOND);
        assert_eq!(decode(&encoded).unwrap(), original);
    }

    #[test]
    fn test_decode_rejects_overlong_day() {
        let bad = NanoTime {
            julian_day: JULIAN_DAY_OF_EPOCH,
            nanos_of_day: NANOS_PER_DAY,
        };
        assert!(decode(&bad).is_err());
    }
}
