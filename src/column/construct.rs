//! Construction from heterogeneous instant-like inputs and dtype resolution.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::column::DatetimeTzArray;
use crate::config::ChronocolConfig;
use crate::error::{ChronocolError, Result};
use crate::types::{DatetimeTzDtype, TimeUnit, TimeZoneId, Timestamp, NAT};

const NAT_STRINGS: &[&str] = &["", "NaT", "nat", "NAT", "NaN", "nan"];

const AWARE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// One input element accepted by [`DatetimeTzArray::from_sequence`].
#[derive(Debug, Clone)]
pub enum InstantLike {
    /// An already-boxed scalar, aware or naive.
    Timestamp(Timestamp),
    /// An ISO-8601-like string. With an offset (or `Z`) it is an instant;
    /// without one it is a wall time in the target zone.
    Str(String),
    /// A raw UTC epoch count in `unit`.
    Epoch { value: i64, unit: TimeUnit },
    Missing,
}

impl From<Timestamp> for InstantLike {
    fn from(ts: Timestamp) -> Self {
        InstantLike::Timestamp(ts)
    }
}

impl From<&str> for InstantLike {
    fn from(s: &str) -> Self {
        InstantLike::Str(s.to_string())
    }
}

impl From<String> for InstantLike {
    fn from(s: String) -> Self {
        InstantLike::Str(s)
    }
}

/// Raw integers are UTC nanoseconds.
impl From<i64> for InstantLike {
    fn from(value: i64) -> Self {
        InstantLike::Epoch {
            value,
            unit: TimeUnit::Nanosecond,
        }
    }
}

impl<T: Into<InstantLike>> From<Option<T>> for InstantLike {
    fn from(value: Option<T>) -> Self {
        value.map_or(InstantLike::Missing, Into::into)
    }
}

//==================================================================================
// 1. Parsing
//==================================================================================

/// An input element after parsing, before the target zone is known.
#[derive(Debug, Clone, Copy)]
enum Parsed {
    Missing,
    /// A physical instant carrying its own zone.
    Aware { utc: i64, tz: TimeZoneId, boxed: bool },
    /// A wall-clock time awaiting localization.
    Naive { wall: i64, boxed: bool },
    Epoch { utc: i64, unit: TimeUnit },
}

fn parse_str(text: &str) -> Result<Parsed> {
    let trimmed = text.trim();
    if NAT_STRINGS.contains(&trimmed) {
        return Ok(Parsed::Missing);
    }

    // `%:z` does not accept `Z`, so spell it out.
    let normalized = match trimmed.strip_suffix(|c: char| c == 'Z' || c == 'z') {
        Some(head) => format!("{}+00:00", head),
        None => trimmed.to_string(),
    };
    for fmt in AWARE_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&normalized, fmt) {
            let utc = dt
                .timestamp_nanos_opt()
                .ok_or_else(|| ChronocolError::overflow(trimmed.to_string()))?;
            let tz = TimeZoneId::from_offset_seconds(dt.offset().local_minus_utc())?;
            return Ok(Parsed::Aware { utc, tz, boxed: false });
        }
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| ChronocolError::Parse(trimmed.to_string()))?;
    let wall = naive
        .and_utc()
        .timestamp_nanos_opt()
        .ok_or_else(|| ChronocolError::overflow(trimmed.to_string()))?;
    Ok(Parsed::Naive { wall, boxed: false })
}

fn parse_item(item: &InstantLike) -> Result<Parsed> {
    match item {
        InstantLike::Missing => Ok(Parsed::Missing),
        InstantLike::Timestamp(ts) if ts.is_nat() => Ok(Parsed::Missing),
        InstantLike::Timestamp(ts) => Ok(match ts.tz() {
            Some(tz) => Parsed::Aware {
                utc: ts.value(),
                tz: *tz,
                boxed: true,
            },
            None => Parsed::Naive {
                wall: ts.value(),
                boxed: true,
            },
        }),
        InstantLike::Str(s) => parse_str(s),
        InstantLike::Epoch { value, unit } => Ok(Parsed::Epoch {
            utc: unit.to_nanos(*value)?,
            unit: *unit,
        }),
    }
}

//==================================================================================
// 2. Dtype Resolution
//==================================================================================

/// Works out the target zone and rejects inconsistent inputs.
fn resolve_tz(
    parsed: &[Parsed],
    explicit: Option<TimeZoneId>,
    config: &ChronocolConfig,
) -> Result<Option<TimeZoneId>> {
    let mut epoch_unit: Option<TimeUnit> = None;
    let mut inferred: Option<TimeZoneId> = None;
    let mut saw_naive = false;
    let mut saw_boxed_naive = false;
    let mut saw_boxed_aware = false;

    for p in parsed {
        match *p {
            Parsed::Missing => {}
            Parsed::Epoch { unit, .. } => match epoch_unit {
                None => epoch_unit = Some(unit),
                Some(u) if u != unit => {
                    return Err(ChronocolError::InvalidValue(format!(
                        "mixed units in integer input: '{}' and '{}'",
                        u, unit
                    )))
                }
                Some(_) => {}
            },
            Parsed::Naive { boxed, .. } => {
                saw_naive = true;
                saw_boxed_naive |= boxed;
            }
            Parsed::Aware { tz, boxed, .. } => {
                saw_boxed_aware |= boxed;
                match (&explicit, boxed) {
                    // Aware scalars must agree with a requested zone.
                    (Some(target), true) if *target != tz => {
                        return Err(ChronocolError::TypeMismatch(format!(
                            "data is already tz-aware {}, unable to set specified tz: {}",
                            tz, target
                        )))
                    }
                    // Strings with an offset are plain instants once a zone is requested.
                    (Some(_), _) => {}
                    (None, _) => match inferred {
                        None => inferred = Some(tz),
                        Some(first) if first != tz => {
                            return Err(ChronocolError::TypeMismatch(format!(
                                "Tz-aware inputs with different timezones: {} and {}",
                                first, tz
                            )))
                        }
                        Some(_) => {}
                    },
                }
            }
        }
    }

    if saw_boxed_naive && saw_boxed_aware {
        return Err(ChronocolError::TypeMismatch(
            "Cannot mix tz-aware with tz-naive values".into(),
        ));
    }
    if explicit.is_some() {
        return Ok(explicit);
    }
    if inferred.is_some() {
        if saw_naive {
            return Err(ChronocolError::TypeMismatch(
                "Cannot mix tz-aware with tz-naive values".into(),
            ));
        }
        return Ok(inferred);
    }
    config.default_timezone()
}

//==================================================================================
// 3. Public Constructors
//==================================================================================

impl DatetimeTzArray {
    /// Builds a column from instant-like inputs with the default config.
    ///
    /// If `tz` is `None` the dtype is inferred from the first aware input;
    /// heterogeneous zones fail with `TypeMismatch`.
    pub fn from_sequence(values: &[InstantLike], tz: Option<TimeZoneId>) -> Result<Self> {
        Self::from_sequence_with(values, tz, &ChronocolConfig::default())
    }

    /// As [`Self::from_sequence`], with explicit localization policies and
    /// default zone.
    pub fn from_sequence_with(
        values: &[InstantLike],
        tz: Option<TimeZoneId>,
        config: &ChronocolConfig,
    ) -> Result<Self> {
        let parsed = values.iter().map(parse_item).collect::<Result<Vec<_>>>()?;
        let target = resolve_tz(&parsed, tz, config)?;

        let buffer = parsed
            .iter()
            .map(|p| match *p {
                Parsed::Missing => Ok(NAT),
                Parsed::Aware { utc, .. } | Parsed::Epoch { utc, .. } => Ok(utc),
                Parsed::Naive { wall, .. } => match &target {
                    Some(zone) => zone.wall_to_utc(wall, config.ambiguous, config.nonexistent),
                    None => Ok(wall),
                },
            })
            .collect::<Result<Vec<i64>>>()?;

        log::debug!(
            "from_sequence: {} values -> {}",
            buffer.len(),
            DatetimeTzDtype::ns(target)
        );
        Ok(Self::from_i64(buffer, target))
    }

    /// Builds a column from boxed scalars.
    ///
    /// Without a dtype, the zone of the first non-NaT scalar is used. Every
    /// non-NaT scalar must match it.
    pub fn from_timestamps(scalars: &[Timestamp], dtype: Option<DatetimeTzDtype>) -> Result<Self> {
        let dtype = match dtype {
            Some(d) => d,
            None => DatetimeTzDtype::ns(
                scalars
                    .iter()
                    .find(|ts| !ts.is_nat())
                    .and_then(|ts| ts.tz().copied()),
            ),
        };
        for ts in scalars.iter().filter(|ts| !ts.is_nat()) {
            if ts.tz() != dtype.tz() {
                return Err(ChronocolError::TypeMismatch(format!(
                    "scalar with tz {:?} does not match dtype {}",
                    ts.tz().map(|t| t.to_string()),
                    dtype
                )));
            }
        }
        let values = scalars
            .iter()
            .map(|ts| if ts.is_nat() { NAT } else { ts.value() })
            .collect::<Vec<i64>>();
        Ok(Self::simple_new(values, dtype))
    }
}
