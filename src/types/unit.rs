//! The physical temporal unit: signed 64-bit nanoseconds since the Unix epoch,
//! with `i64::MIN` reserved as the missing-value sentinel (NaT).

use crate::error::{ChronocolError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The reserved "Not a Time" sentinel inside every physical buffer.
pub const NAT: i64 = i64::MIN;

pub const NANOS_PER_MICRO: i64 = 1_000;
pub const NANOS_PER_MILLI: i64 = 1_000_000;
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;
pub const NANOS_PER_MINUTE: i64 = 60 * NANOS_PER_SECOND;
pub const NANOS_PER_HOUR: i64 = 60 * NANOS_PER_MINUTE;
pub const NANOS_PER_DAY: i64 = 24 * NANOS_PER_HOUR;

/// Returns `true` if the physical value is the NaT sentinel.
#[inline(always)]
pub fn is_nat(value: i64) -> bool {
    value == NAT
}

/// Resolution of an integer epoch value.
///
/// Stored columns are always [`TimeUnit::Nanosecond`]; the coarser units only
/// describe how raw integers handed to the constructors should be interpreted.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Second,
    Millisecond,
    Microsecond,
    #[default]
    Nanosecond,
}

impl TimeUnit {
    /// How many nanoseconds one tick of this unit spans.
    pub fn nanos_per_tick(&self) -> i64 {
        match self {
            Self::Second => NANOS_PER_SECOND,
            Self::Millisecond => NANOS_PER_MILLI,
            Self::Microsecond => NANOS_PER_MICRO,
            Self::Nanosecond => 1,
        }
    }

    /// Converts a raw epoch value in this unit to nanoseconds.
    /// NaT passes through untouched.
    pub fn to_nanos(&self, value: i64) -> Result<i64> {
        if is_nat(value) {
            return Ok(NAT);
        }
        match value.checked_mul(self.nanos_per_tick()) {
            Some(v) if !is_nat(v) => Ok(v),
            _ => Err(ChronocolError::overflow(format!(
                "{} {} does not fit in int64 nanoseconds",
                value, self
            ))),
        }
    }

    /// The short numpy-style abbreviation (`s`, `ms`, `us`, `ns`).
    pub fn abbrev(&self) -> &'static str {
        match self {
            Self::Second => "s",
            Self::Millisecond => "ms",
            Self::Microsecond => "us",
            Self::Nanosecond => "ns",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbrev())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_nanos_scales_and_passes_nat() {
        assert_eq!(TimeUnit::Second.to_nanos(2).unwrap(), 2 * NANOS_PER_SECOND);
        assert_eq!(TimeUnit::Microsecond.to_nanos(-3).unwrap(), -3_000);
        assert_eq!(TimeUnit::Millisecond.to_nanos(NAT).unwrap(), NAT);
    }

    #[test]
    fn test_to_nanos_overflow() {
        let result = TimeUnit::Second.to_nanos(i64::MAX / 10);
        assert!(matches!(result, Err(ChronocolError::Overflow(_))));
    }
}
