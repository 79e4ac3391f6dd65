//! Boxed scalars: what a single element of a column looks like once the dtype
//! has been applied to its physical integer.
//!
//! Both scalars follow missing-value semantics: a NaT compares unequal to
//! everything, itself included, and has no ordering.

use crate::error::{ChronocolError, Result};
use crate::types::timezone::{AmbiguousPolicy, NonexistentPolicy, TimeZoneId};
use crate::types::unit::{is_nat, TimeUnit, NANOS_PER_DAY, NANOS_PER_SECOND, NAT};
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta, Utc};
use std::cmp::Ordering;
use std::fmt;

//==================================================================================
// 1. Timestamp
//==================================================================================

/// A single instant, optionally tagged with a timezone.
///
/// `value` is always the UTC-normalized nanosecond count (or [`NAT`]); the
/// timezone only matters for display and for wall-clock accessors.
#[derive(Debug, Clone, Copy)]
pub struct Timestamp {
    value: i64,
    tz: Option<TimeZoneId>,
}

impl Timestamp {
    /// The missing-value marker.
    pub const fn nat() -> Self {
        Self { value: NAT, tz: None }
    }

    pub const fn from_utc_nanos(value: i64, tz: Option<TimeZoneId>) -> Self {
        Self { value, tz }
    }

    /// Builds a timestamp from local wall-clock nanoseconds in `tz`.
    /// A naive timestamp (`tz == None`) stores the wall time directly.
    pub fn from_wall_nanos(
        wall_ns: i64,
        tz: Option<TimeZoneId>,
        ambiguous: AmbiguousPolicy,
        nonexistent: NonexistentPolicy,
    ) -> Result<Self> {
        let value = match &tz {
            Some(zone) => zone.wall_to_utc(wall_ns, ambiguous, nonexistent)?,
            None => wall_ns,
        };
        Ok(Self { value, tz })
    }

    /// Physical UTC nanoseconds (or [`NAT`]).
    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn tz(&self) -> Option<&TimeZoneId> {
        self.tz.as_ref()
    }

    pub fn is_nat(&self) -> bool {
        is_nat(self.value)
    }

    pub fn is_aware(&self) -> bool {
        self.tz.is_some()
    }

    /// Local wall-clock nanoseconds.
    pub fn wall_nanos(&self) -> Result<i64> {
        match &self.tz {
            Some(zone) => zone.utc_to_wall(self.value),
            None => Ok(self.value),
        }
    }

    /// The same instant viewed in another zone. Naive timestamps cannot be
    /// converted; localize them instead.
    pub fn tz_convert(&self, tz: TimeZoneId) -> Result<Self> {
        if self.tz.is_none() && !self.is_nat() {
            return Err(ChronocolError::TypeMismatch(
                "Cannot convert tz-naive Timestamp, use tz_localize to localize".into(),
            ));
        }
        Ok(Self {
            value: self.value,
            tz: Some(tz),
        })
    }

    /// A `chrono` view with the offset in effect at this instant.
    /// Naive timestamps are rendered with a zero offset.
    pub fn to_datetime(&self) -> Option<DateTime<FixedOffset>> {
        match &self.tz {
            Some(zone) => zone.to_fixed_datetime(self.value),
            None => TimeZoneId::Utc.to_fixed_datetime(self.value),
        }
    }

    /// Formats the local wall time with a chrono strftime pattern.
    pub fn format(&self, pattern: &str) -> String {
        match self.to_datetime() {
            Some(dt) => dt.format(pattern).to_string(),
            None => "NaT".to_string(),
        }
    }

    /// Instant + duration; NaT on either side yields NaT.
    pub fn checked_add(&self, rhs: Duration) -> Result<Self> {
        if self.is_nat() || rhs.is_nat() {
            return Ok(Self { value: NAT, tz: self.tz });
        }
        match self.value.checked_add(rhs.nanos()) {
            Some(v) if !is_nat(v) => Ok(Self { value: v, tz: self.tz }),
            _ => Err(ChronocolError::overflow("Timestamp + Duration")),
        }
    }

    /// Returns `true` if both timestamps can be compared: same awareness.
    /// Aware timestamps in different zones are comparable by instant.
    pub fn is_comparable_with(&self, other: &Timestamp) -> bool {
        self.tz.is_some() == other.tz.is_some()
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        !self.is_nat()
            && !other.is_nat()
            && self.is_comparable_with(other)
            && self.value == other.value
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.is_nat() || other.is_nat() || !self.is_comparable_with(other) {
            return None;
        }
        Some(self.value.cmp(&other.value))
    }
}

impl TryFrom<DateTime<Utc>> for Timestamp {
    type Error = ChronocolError;

    fn try_from(dt: DateTime<Utc>) -> Result<Self> {
        let value = dt
            .timestamp_nanos_opt()
            .ok_or_else(|| ChronocolError::overflow(dt.to_rfc3339()))?;
        Ok(Self::from_utc_nanos(value, Some(TimeZoneId::Utc)))
    }
}

impl TryFrom<DateTime<FixedOffset>> for Timestamp {
    type Error = ChronocolError;

    fn try_from(dt: DateTime<FixedOffset>) -> Result<Self> {
        let value = dt
            .timestamp_nanos_opt()
            .ok_or_else(|| ChronocolError::overflow(dt.to_rfc3339()))?;
        let tz = TimeZoneId::from_offset_seconds(dt.offset().local_minus_utc())?;
        Ok(Self::from_utc_nanos(value, Some(tz)))
    }
}

impl TryFrom<DateTime<chrono_tz::Tz>> for Timestamp {
    type Error = ChronocolError;

    fn try_from(dt: DateTime<chrono_tz::Tz>) -> Result<Self> {
        let value = dt
            .timestamp_nanos_opt()
            .ok_or_else(|| ChronocolError::overflow(dt.to_rfc3339()))?;
        Ok(Self::from_utc_nanos(value, Some(dt.timezone().into())))
    }
}

/// A naive datetime becomes a naive timestamp.
impl TryFrom<NaiveDateTime> for Timestamp {
    type Error = ChronocolError;

    fn try_from(ndt: NaiveDateTime) -> Result<Self> {
        let value = ndt
            .and_utc()
            .timestamp_nanos_opt()
            .ok_or_else(|| ChronocolError::overflow(ndt.to_string()))?;
        Ok(Self::from_utc_nanos(value, None))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nat() {
            return f.write_str("NaT");
        }
        let pattern = if self.is_aware() {
            "%Y-%m-%d %H:%M:%S%.f%:z"
        } else {
            "%Y-%m-%d %H:%M:%S%.f"
        };
        f.write_str(&self.format(pattern))
    }
}

//==================================================================================
// 2. Duration
//==================================================================================

/// A signed span of nanoseconds, or NaT.
#[derive(Debug, Clone, Copy)]
pub struct Duration {
    nanos: i64,
}

impl Duration {
    pub const fn nat() -> Self {
        Self { nanos: NAT }
    }

    pub const fn from_nanos(nanos: i64) -> Self {
        Self { nanos }
    }

    /// Converts a raw count in `unit` to a nanosecond duration.
    pub fn from_unit(value: i64, unit: TimeUnit) -> Result<Self> {
        Ok(Self::from_nanos(unit.to_nanos(value)?))
    }

    pub fn nanos(&self) -> i64 {
        self.nanos
    }

    pub fn is_nat(&self) -> bool {
        is_nat(self.nanos)
    }

    /// `-self`; NaT stays NaT.
    pub fn checked_neg(&self) -> Result<Self> {
        if self.is_nat() {
            return Ok(*self);
        }
        // i64::MIN is NaT, so every valid value negates safely.
        Ok(Self::from_nanos(-self.nanos))
    }

    /// `self * factor`; NaT stays NaT.
    pub fn checked_mul(&self, factor: i64) -> Result<Self> {
        if self.is_nat() {
            return Ok(*self);
        }
        match self.nanos.checked_mul(factor) {
            Some(v) if !is_nat(v) => Ok(Self::from_nanos(v)),
            _ => Err(ChronocolError::overflow("Duration * int")),
        }
    }
}

impl TryFrom<TimeDelta> for Duration {
    type Error = ChronocolError;

    fn try_from(delta: TimeDelta) -> Result<Self> {
        delta
            .num_nanoseconds()
            .filter(|n| !is_nat(*n))
            .map(Self::from_nanos)
            .ok_or_else(|| ChronocolError::overflow(delta.to_string()))
    }
}

impl PartialEq for Duration {
    fn eq(&self, other: &Self) -> bool {
        !self.is_nat() && !other.is_nat() && self.nanos == other.nanos
    }
}

impl PartialOrd for Duration {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.is_nat() || other.is_nat() {
            return None;
        }
        Some(self.nanos.cmp(&other.nanos))
    }
}

/// `1 days 02:00:00.000000005`; negative spans print with a leading minus.
impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nat() {
            return f.write_str("NaT");
        }
        let sign = if self.nanos < 0 { "-" } else { "" };
        let abs = self.nanos.unsigned_abs();
        let day = NANOS_PER_DAY as u64;
        let sec = NANOS_PER_SECOND as u64;
        let days = abs / day;
        let rem = abs % day;
        let (h, m, s) = (rem / (3600 * sec), (rem / (60 * sec)) % 60, (rem / sec) % 60);
        let frac = rem % sec;
        write!(f, "{}{} days {:02}:{:02}:{:02}", sign, days, h, m, s)?;
        if frac != 0 {
            write!(f, ".{:09}", frac)?;
        }
        Ok(())
    }
}
