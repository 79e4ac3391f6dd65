//! The timezone resolution service.
//!
//! `TimeZoneId` is the comparable, hashable identity attached to a dtype. It
//! wraps the IANA database bundled with `chrono-tz` plus fixed UTC offsets and
//! knows how to move a physical UTC instant to local wall time and back.
//!
//! Wall times and instants are both carried as `i64` nanoseconds; the only
//! difference is whether the zone offset has been applied.

use crate::error::{ChronocolError, Result};
use crate::types::unit::{is_nat, NAT, NANOS_PER_DAY, NANOS_PER_SECOND};
use chrono::{DateTime, FixedOffset, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Aliases that all resolve to [`TimeZoneId::Utc`].
const UTC_ALIASES: &[&str] = &[
    "UTC",
    "Z",
    "Etc/UTC",
    "Etc/UCT",
    "UCT",
    "Etc/Zulu",
    "Zulu",
    "Universal",
    "Etc/Universal",
];

/// What to do with a wall time that occurs twice (DST fall-back).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguousPolicy {
    #[default]
    Raise,
    /// Pick the first occurrence (the pre-transition offset).
    Earliest,
    /// Pick the second occurrence (the post-transition offset).
    Latest,
    #[serde(rename = "nat")]
    NaT,
}

/// What to do with a wall time skipped by a DST spring-forward gap.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NonexistentPolicy {
    #[default]
    Raise,
    #[serde(rename = "nat")]
    NaT,
    /// Move to the first instant after the gap.
    ShiftForward,
    /// Move to the last instant before the gap.
    ShiftBackward,
}

/// A resolved timezone identity.
///
/// Equality is by value: every spelling of UTC collapses to `Utc`, so
/// `"UTC"`, `"Etc/UTC"` and `"+00:00"` produce equal dtypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TimeZoneId {
    Utc,
    /// Fixed offset east of UTC, in seconds. Never zero (that is `Utc`).
    Fixed(i32),
    Named(Tz),
}

impl TimeZoneId {
    /// Resolves a textual identity: UTC aliases, `±HH[:MM[:SS]]` offsets, or an
    /// IANA name such as `"US/Central"`.
    pub fn parse(name: &str) -> Result<Self> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ChronocolError::InvalidTimezone("empty timezone name".into()));
        }
        if UTC_ALIASES.iter().any(|a| a.eq_ignore_ascii_case(trimmed)) {
            return Ok(Self::Utc);
        }
        if trimmed.starts_with('+') || trimmed.starts_with('-') {
            return Self::from_offset_seconds(parse_offset(trimmed)?);
        }
        trimmed
            .parse::<Tz>()
            .map(Self::Named)
            .map_err(|_| ChronocolError::InvalidTimezone(trimmed.to_string()))
    }

    /// Builds a fixed-offset zone, collapsing a zero offset to `Utc`.
    pub fn from_offset_seconds(seconds: i32) -> Result<Self> {
        if seconds == 0 {
            return Ok(Self::Utc);
        }
        if FixedOffset::east_opt(seconds).is_none() {
            return Err(ChronocolError::InvalidTimezone(format!(
                "offset of {} seconds is out of range",
                seconds
            )));
        }
        Ok(Self::Fixed(seconds))
    }

    /// The UTC offset (seconds east) in effect at the given instant.
    pub fn offset_seconds_at(&self, utc_ns: i64) -> i32 {
        match self {
            Self::Utc => 0,
            Self::Fixed(secs) => *secs,
            Self::Named(tz) => {
                let naive = DateTime::from_timestamp_nanos(utc_ns).naive_utc();
                tz.offset_from_utc_datetime(&naive).fix().local_minus_utc()
            }
        }
    }

    /// Converts a physical instant to local wall-clock nanoseconds.
    pub fn utc_to_wall(&self, utc_ns: i64) -> Result<i64> {
        if is_nat(utc_ns) {
            return Ok(NAT);
        }
        let offset = i64::from(self.offset_seconds_at(utc_ns)) * NANOS_PER_SECOND;
        checked_non_nat(utc_ns.checked_add(offset), "utc_to_wall")
    }

    /// Resolves a local wall time to a physical instant.
    pub fn wall_to_utc(
        &self,
        wall_ns: i64,
        ambiguous: AmbiguousPolicy,
        nonexistent: NonexistentPolicy,
    ) -> Result<i64> {
        if is_nat(wall_ns) {
            return Ok(NAT);
        }
        match self {
            Self::Utc => Ok(wall_ns),
            Self::Fixed(secs) => checked_non_nat(
                wall_ns.checked_sub(i64::from(*secs) * NANOS_PER_SECOND),
                "wall_to_utc",
            ),
            Self::Named(tz) => localize_named(tz, wall_ns, ambiguous, nonexistent),
        }
    }

    /// The instant as a `chrono` datetime carrying the offset in effect.
    pub fn to_fixed_datetime(&self, utc_ns: i64) -> Option<DateTime<FixedOffset>> {
        if is_nat(utc_ns) {
            return None;
        }
        let offset = FixedOffset::east_opt(self.offset_seconds_at(utc_ns))?;
        Some(DateTime::from_timestamp_nanos(utc_ns).with_timezone(&offset))
    }

    pub fn is_utc(&self) -> bool {
        matches!(self, Self::Utc)
    }
}

fn checked_non_nat(value: Option<i64>, context: &str) -> Result<i64> {
    match value {
        Some(v) if !is_nat(v) => Ok(v),
        _ => Err(ChronocolError::overflow(context)),
    }
}

/// Parses `±HH`, `±HHMM` or `±HH:MM` into seconds east of UTC.
fn parse_offset(text: &str) -> Result<i32> {
    let invalid = || ChronocolError::InvalidTimezone(text.to_string());
    let (sign, body) = match text.split_at(1) {
        ("+", rest) => (1, rest),
        ("-", rest) => (-1, rest),
        _ => return Err(invalid()),
    };
    let digits: String = body.chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    if !matches!(digits.len(), 2 | 4 | 6) {
        return Err(invalid());
    }
    // HH, HHMM or HHMMSS.
    let field = |i: usize| -> Result<i32> {
        match digits.get(i..i + 2) {
            Some(pair) => pair.parse::<i32>().map_err(|_| invalid()),
            None => Ok(0),
        }
    };
    let (hours, minutes, seconds) = (field(0)?, field(2)?, field(4)?);
    if hours > 23 || minutes > 59 || seconds > 59 {
        return Err(invalid());
    }
    Ok(sign * (hours * 3600 + minutes * 60 + seconds))
}

fn wall_to_naive(wall_ns: i64) -> NaiveDateTime {
    DateTime::from_timestamp_nanos(wall_ns).naive_utc()
}

fn localize_named(
    tz: &Tz,
    wall_ns: i64,
    ambiguous: AmbiguousPolicy,
    nonexistent: NonexistentPolicy,
) -> Result<i64> {
    let naive = wall_to_naive(wall_ns);
    let to_ns = |dt: DateTime<Tz>| {
        dt.timestamp_nanos_opt()
            .ok_or_else(|| ChronocolError::overflow("wall_to_utc"))
    };
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => to_ns(dt),
        LocalResult::Ambiguous(earliest, latest) => match ambiguous {
            AmbiguousPolicy::Raise => Err(ChronocolError::AmbiguousTime(format!(
                "{} in {}",
                naive,
                tz.name()
            ))),
            AmbiguousPolicy::Earliest => to_ns(earliest),
            AmbiguousPolicy::Latest => to_ns(latest),
            AmbiguousPolicy::NaT => Ok(NAT),
        },
        LocalResult::None => match nonexistent {
            NonexistentPolicy::Raise => Err(ChronocolError::NonexistentTime(format!(
                "{} in {}",
                naive,
                tz.name()
            ))),
            NonexistentPolicy::NaT => Ok(NAT),
            NonexistentPolicy::ShiftForward => gap_transition(tz, wall_ns),
            NonexistentPolicy::ShiftBackward => Ok(gap_transition(tz, wall_ns)? - 1),
        },
    }
}

/// Finds the transition instant of the DST gap that swallowed `wall_ns`.
///
/// The two candidate instants (wall minus the offset before / after the gap)
/// straddle the transition; a binary search over the offset change finds it.
fn gap_transition(tz: &Tz, wall_ns: i64) -> Result<i64> {
    let zone = TimeZoneId::Named(*tz);
    let before = i64::from(zone.offset_seconds_at(wall_ns.saturating_sub(NANOS_PER_DAY)));
    let after = i64::from(zone.offset_seconds_at(wall_ns.saturating_add(NANOS_PER_DAY)));
    let a = checked_non_nat(wall_ns.checked_sub(before * NANOS_PER_SECOND), "gap")?;
    let b = checked_non_nat(wall_ns.checked_sub(after * NANOS_PER_SECOND), "gap")?;
    let (mut lo, mut hi) = (a.min(b), a.max(b));
    let lo_offset = zone.offset_seconds_at(lo);
    if zone.offset_seconds_at(hi) == lo_offset {
        return Err(ChronocolError::InternalError(format!(
            "no transition found around nonexistent wall time {}",
            wall_to_naive(wall_ns)
        )));
    }
    // Invariant: offset(lo) == lo_offset, offset(hi) != lo_offset.
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if zone.offset_seconds_at(mid) == lo_offset {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Ok(hi)
}

impl FromStr for TimeZoneId {
    type Err = ChronocolError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TimeZoneId {
    type Error = ChronocolError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<TimeZoneId> for String {
    fn from(value: TimeZoneId) -> Self {
        value.to_string()
    }
}

impl From<Tz> for TimeZoneId {
    fn from(tz: Tz) -> Self {
        // Route through the parser so IANA spellings of UTC collapse.
        TimeZoneId::parse(tz.name()).unwrap_or(TimeZoneId::Named(tz))
    }
}

impl From<Utc> for TimeZoneId {
    fn from(_: Utc) -> Self {
        TimeZoneId::Utc
    }
}

impl fmt::Display for TimeZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utc => f.write_str("UTC"),
            Self::Fixed(secs) => {
                let sign = if *secs < 0 { '-' } else { '+' };
                let abs = secs.unsigned_abs();
                write!(f, "{}{:02}:{:02}", sign, abs / 3600, (abs % 3600) / 60)?;
                if abs % 60 != 0 {
                    write!(f, ":{:02}", abs % 60)?;
                }
                Ok(())
            }
            Self::Named(tz) => f.write_str(tz.name()),
        }
    }
}
