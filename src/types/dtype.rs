//! The immutable `(unit, tz)` value object shared by every element of a column.

use crate::error::{ChronocolError, Result};
use crate::types::timezone::TimeZoneId;
use crate::types::unit::TimeUnit;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The logical type of a datetime column.
///
/// Two dtypes are interchangeable only if both the unit and the timezone
/// compare equal. `tz == None` describes naive (wall-clock, zone-less) data.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(try_from = "DtypeRepr")]
pub struct DatetimeTzDtype {
    unit: TimeUnit,
    tz: Option<TimeZoneId>,
}

/// Unvalidated wire shape; deserialization goes through [`DatetimeTzDtype::new`].
#[derive(Deserialize)]
struct DtypeRepr {
    unit: TimeUnit,
    tz: Option<TimeZoneId>,
}

impl TryFrom<DtypeRepr> for DatetimeTzDtype {
    type Error = ChronocolError;

    fn try_from(repr: DtypeRepr) -> Result<Self> {
        Self::new(repr.unit, repr.tz)
    }
}

impl DatetimeTzDtype {
    /// Only nanosecond resolution is supported for stored columns.
    pub fn new(unit: TimeUnit, tz: Option<TimeZoneId>) -> Result<Self> {
        if unit != TimeUnit::Nanosecond {
            return Err(ChronocolError::InvalidValue(format!(
                "datetime columns are stored at ns resolution, got unit '{}'",
                unit
            )));
        }
        Ok(Self { unit, tz })
    }

    pub fn ns(tz: Option<TimeZoneId>) -> Self {
        Self {
            unit: TimeUnit::Nanosecond,
            tz,
        }
    }

    /// Parses a timezone name and builds the ns dtype for it.
    pub fn with_tz_name(name: &str) -> Result<Self> {
        Ok(Self::ns(Some(TimeZoneId::parse(name)?)))
    }

    pub fn naive() -> Self {
        Self::ns(None)
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    pub fn tz(&self) -> Option<&TimeZoneId> {
        self.tz.as_ref()
    }

    pub fn is_aware(&self) -> bool {
        self.tz.is_some()
    }

    /// Returns a copy of this dtype carrying a different timezone.
    pub fn with_tz(&self, tz: Option<TimeZoneId>) -> Self {
        Self { unit: self.unit, tz }
    }
}

impl Default for DatetimeTzDtype {
    fn default() -> Self {
        Self::naive()
    }
}

/// `datetime64[ns, US/Central]`, or `datetime64[ns]` when naive.
impl fmt::Display for DatetimeTzDtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tz {
            Some(tz) => write!(f, "datetime64[{}, {}]", self.unit, tz),
            None => write!(f, "datetime64[{}]", self.unit),
        }
    }
}

/// The dtype of duration results (`timedelta64[ns]`). It has no timezone.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TimedeltaDtype;

impl fmt::Display for TimedeltaDtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("timedelta64[ns]")
    }
}
