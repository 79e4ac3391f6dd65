//! Timezone transitions, wall-clock field accessors and rounding.
//!
//! Wall-clock work happens on local time: aware values are shifted to their
//! local wall nanoseconds, processed, then re-localized with the caller's
//! DST policies.

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike};

use crate::column::DatetimeTzArray;
use crate::config::ChronocolConfig;
use crate::error::{ChronocolError, Result};
use crate::types::{
    is_nat, AmbiguousPolicy, DatetimeTzDtype, Freq, NonexistentPolicy, TimeZoneId, NAT,
};
use crate::types::unit::NANOS_PER_DAY;

/// DST policies used whenever wall times are turned back into instants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalizeOptions {
    pub ambiguous: AmbiguousPolicy,
    pub nonexistent: NonexistentPolicy,
}

impl From<&ChronocolConfig> for LocalizeOptions {
    fn from(config: &ChronocolConfig) -> Self {
        Self {
            ambiguous: config.ambiguous,
            nonexistent: config.nonexistent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoundMode {
    Floor,
    Ceil,
    /// Ties go to the even multiple.
    HalfEven,
}

fn round_nanos(value: i64, unit: i64, mode: RoundMode) -> Result<i64> {
    let rem = value.rem_euclid(unit);
    if rem == 0 {
        return Ok(value);
    }
    let floor = value
        .checked_sub(rem)
        .filter(|v| !is_nat(*v))
        .ok_or_else(|| ChronocolError::overflow("rounding"))?;
    let up = || {
        floor
            .checked_add(unit)
            .filter(|v| !is_nat(*v))
            .ok_or_else(|| ChronocolError::overflow("rounding"))
    };
    match mode {
        RoundMode::Floor => Ok(floor),
        RoundMode::Ceil => up(),
        RoundMode::HalfEven => {
            let upper_gap = unit - rem;
            if rem > upper_gap || (rem == upper_gap && (floor / unit) % 2 != 0) {
                up()
            } else {
                Ok(floor)
            }
        }
    }
}

impl DatetimeTzArray {
    //==============================================================================
    // Zone transitions
    //==============================================================================

    /// Same instants, different zone. The buffer is shared.
    pub fn tz_convert(&self, tz: TimeZoneId) -> Result<Self> {
        if !self.dtype.is_aware() {
            return Err(ChronocolError::TypeMismatch(
                "Cannot convert tz-naive timestamps, use tz_localize to localize".into(),
            ));
        }
        log::debug!("tz_convert: {} -> {}", self.dtype, tz);
        Ok(Self::simple_new(self.buffer(), self.dtype.with_tz(Some(tz))))
    }

    /// `Some(tz)` treats naive values as wall times in `tz`; `None` turns
    /// aware values into naive local wall times.
    pub fn tz_localize(&self, tz: Option<TimeZoneId>, options: LocalizeOptions) -> Result<Self> {
        match (self.tz().copied(), tz) {
            (Some(_), Some(_)) => Err(ChronocolError::TypeMismatch(
                "Already tz-aware, use tz_convert to convert".into(),
            )),
            (None, Some(target)) => {
                let values = self
                    .data
                    .iter()
                    .map(|&v| target.wall_to_utc(v, options.ambiguous, options.nonexistent))
                    .collect::<Result<Vec<i64>>>()?;
                Ok(Self::simple_new(values, DatetimeTzDtype::ns(Some(target))))
            }
            (Some(_), None) => Ok(Self::simple_new(self.wall_values()?, DatetimeTzDtype::naive())),
            (None, None) => Ok(self.clone()),
        }
    }

    /// Local wall-clock nanoseconds; naive values are already wall times.
    pub fn wall_values(&self) -> Result<Vec<i64>> {
        match self.tz() {
            Some(zone) => self.data.iter().map(|&v| zone.utc_to_wall(v)).collect(),
            None => Ok(self.data.to_vec()),
        }
    }

    fn localize_wall(&self, wall: i64, options: LocalizeOptions) -> Result<i64> {
        match self.tz() {
            Some(zone) => zone.wall_to_utc(wall, options.ambiguous, options.nonexistent),
            None => Ok(wall),
        }
    }

    //==============================================================================
    // Field accessors
    //==============================================================================

    fn local_datetime(&self, value: i64) -> Option<NaiveDateTime> {
        if is_nat(value) {
            return None;
        }
        match self.tz() {
            Some(zone) => zone.to_fixed_datetime(value).map(|dt| dt.naive_local()),
            None => Some(DateTime::from_timestamp_nanos(value).naive_utc()),
        }
    }

    fn field<F>(&self, extract: F) -> Vec<Option<i64>>
    where
        F: Fn(&NaiveDateTime) -> i64,
    {
        self.data
            .iter()
            .map(|&v| self.local_datetime(v).map(|dt| extract(&dt)))
            .collect()
    }

    pub fn year(&self) -> Vec<Option<i64>> {
        self.field(|dt| i64::from(dt.year()))
    }

    pub fn month(&self) -> Vec<Option<i64>> {
        self.field(|dt| i64::from(dt.month()))
    }

    pub fn day(&self) -> Vec<Option<i64>> {
        self.field(|dt| i64::from(dt.day()))
    }

    pub fn hour(&self) -> Vec<Option<i64>> {
        self.field(|dt| i64::from(dt.hour()))
    }

    pub fn minute(&self) -> Vec<Option<i64>> {
        self.field(|dt| i64::from(dt.minute()))
    }

    pub fn second(&self) -> Vec<Option<i64>> {
        self.field(|dt| i64::from(dt.second()))
    }

    /// Microseconds within the second (0..=999_999).
    pub fn microsecond(&self) -> Vec<Option<i64>> {
        self.field(|dt| i64::from(dt.nanosecond() / 1_000))
    }

    /// Nanoseconds within the microsecond (0..=999).
    pub fn nanosecond(&self) -> Vec<Option<i64>> {
        self.field(|dt| i64::from(dt.nanosecond() % 1_000))
    }

    /// Monday is 0.
    pub fn dayofweek(&self) -> Vec<Option<i64>> {
        self.field(|dt| i64::from(dt.weekday().num_days_from_monday()))
    }

    /// 1-based ordinal day.
    pub fn dayofyear(&self) -> Vec<Option<i64>> {
        self.field(|dt| i64::from(dt.ordinal()))
    }

    //==============================================================================
    // Rounding
    //==============================================================================

    fn round_wall(&self, unit: i64, mode: RoundMode, options: LocalizeOptions) -> Result<Self> {
        if unit <= 0 {
            return Err(ChronocolError::InvalidValue(format!(
                "rounding frequency must be positive, got {} ns",
                unit
            )));
        }
        let values = self
            .wall_values()?
            .into_iter()
            .map(|wall| {
                if is_nat(wall) {
                    return Ok(NAT);
                }
                let rounded = round_nanos(wall, unit, mode)?;
                self.localize_wall(rounded, options)
            })
            .collect::<Result<Vec<i64>>>()?;
        Ok(self.with_values(values))
    }

    /// Local midnight of each value.
    pub fn normalize(&self, options: LocalizeOptions) -> Result<Self> {
        self.round_wall(NANOS_PER_DAY, RoundMode::Floor, options)
    }

    pub fn floor(&self, freq: Freq, options: LocalizeOptions) -> Result<Self> {
        self.round_wall(freq.step(), RoundMode::Floor, options)
    }

    pub fn ceil(&self, freq: Freq, options: LocalizeOptions) -> Result<Self> {
        self.round_wall(freq.step(), RoundMode::Ceil, options)
    }

    /// Half-to-even on local wall time.
    pub fn round(&self, freq: Freq, options: LocalizeOptions) -> Result<Self> {
        self.round_wall(freq.step(), RoundMode::HalfEven, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::unit::{NANOS_PER_HOUR, NANOS_PER_MINUTE};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn central() -> TimeZoneId {
        TimeZoneId::parse("US/Central").unwrap()
    }

    fn utc_ns(y: i32, m: u32, d: u32, h: u32, min: u32) -> i64 {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
            .timestamp_nanos_opt()
            .unwrap()
    }

    #[test]
    fn test_round_nanos_modes() {
        assert_eq!(round_nanos(15, 10, RoundMode::Floor).unwrap(), 10);
        assert_eq!(round_nanos(-15, 10, RoundMode::Floor).unwrap(), -20);
        assert_eq!(round_nanos(11, 10, RoundMode::Ceil).unwrap(), 20);
        assert_eq!(round_nanos(15, 10, RoundMode::HalfEven).unwrap(), 20);
        assert_eq!(round_nanos(25, 10, RoundMode::HalfEven).unwrap(), 20);
        assert_eq!(round_nanos(26, 10, RoundMode::HalfEven).unwrap(), 30);
        assert!(round_nanos(i64::MAX, 10, RoundMode::Ceil).is_err());
    }

    #[test]
    fn test_tz_convert_shares_buffer_and_rejects_naive() {
        let arr = DatetimeTzArray::from_i64(vec![0, NAT], Some(TimeZoneId::Utc));
        let converted = arr.tz_convert(central()).unwrap();
        assert_eq!(converted.asi8(), arr.asi8());
        assert_eq!(converted.tz(), Some(&central()));

        let naive = DatetimeTzArray::from_i64(vec![0], None);
        assert!(matches!(naive.tz_convert(central()), Err(ChronocolError::TypeMismatch(_))));
    }

    #[test]
    fn test_tz_localize_roundtrip() {
        let wall = utc_ns(2000, 1, 1, 0, 0);
        let naive = DatetimeTzArray::from_i64(vec![wall, NAT], None);
        let aware = naive.tz_localize(Some(central()), LocalizeOptions::default()).unwrap();
        assert_eq!(aware.asi8(), &[wall + 6 * NANOS_PER_HOUR, NAT]);
        assert!(aware.tz_localize(Some(central()), LocalizeOptions::default()).is_err());

        let back = aware.tz_localize(None, LocalizeOptions::default()).unwrap();
        assert_eq!(back, naive);
    }

    #[test]
    fn test_tz_localize_honours_policies() {
        let ambiguous = NaiveDate::from_ymd_opt(2018, 11, 4)
            .unwrap()
            .and_hms_opt(1, 30, 0)
            .unwrap()
            .and_utc()
            .timestamp_nanos_opt()
            .unwrap();
        let naive = DatetimeTzArray::from_i64(vec![ambiguous], None);
        assert!(matches!(
            naive.tz_localize(Some(central()), LocalizeOptions::default()),
            Err(ChronocolError::AmbiguousTime(_))
        ));
        let options = LocalizeOptions {
            ambiguous: AmbiguousPolicy::NaT,
            ..LocalizeOptions::default()
        };
        assert_eq!(naive.tz_localize(Some(central()), options).unwrap().asi8(), &[NAT]);
    }

    #[test]
    fn test_field_accessors_use_local_time() {
        // 2000-01-01 03:30 UTC is 1999-12-31 21:30 in Chicago, a Friday.
        let arr = DatetimeTzArray::from_i64(vec![utc_ns(2000, 1, 1, 3, 30), NAT], Some(central()));
        assert_eq!(arr.year(), vec![Some(1999), None]);
        assert_eq!(arr.month(), vec![Some(12), None]);
        assert_eq!(arr.day(), vec![Some(31), None]);
        assert_eq!(arr.hour(), vec![Some(21), None]);
        assert_eq!(arr.minute(), vec![Some(30), None]);
        assert_eq!(arr.dayofweek(), vec![Some(4), None]);
        assert_eq!(arr.dayofyear(), vec![Some(365), None]);

        let fine = DatetimeTzArray::from_i64(vec![1_234_567], None);
        assert_eq!(fine.microsecond(), vec![Some(1_234)]);
        assert_eq!(fine.nanosecond(), vec![Some(567)]);
        assert_eq!(fine.second(), vec![Some(0)]);
    }

    #[test]
    fn test_normalize_and_floor_in_local_time() {
        let arr = DatetimeTzArray::from_i64(vec![utc_ns(2000, 1, 1, 3, 30)], Some(central()));
        let midnight = arr.normalize(LocalizeOptions::default()).unwrap();
        // Local midnight of 1999-12-31 is 06:00 UTC that day.
        assert_eq!(midnight.asi8(), &[utc_ns(1999, 12, 31, 6, 0)]);
        assert_eq!(midnight.tz(), Some(&central()));

        let hourly = Freq::new(NANOS_PER_HOUR).unwrap();
        assert_eq!(
            arr.floor(hourly, LocalizeOptions::default()).unwrap().asi8(),
            &[utc_ns(2000, 1, 1, 3, 0)]
        );
        assert_eq!(
            arr.ceil(hourly, LocalizeOptions::default()).unwrap().asi8(),
            &[utc_ns(2000, 1, 1, 4, 0)]
        );
        // 21:30 is a tie and the 21:00 multiple is odd, so it rounds up to 22:00.
        assert_eq!(
            arr.round(hourly, LocalizeOptions::default()).unwrap().asi8(),
            &[utc_ns(2000, 1, 1, 4, 0)]
        );
        let quarter = Freq::new(15 * NANOS_PER_MINUTE).unwrap();
        assert_eq!(arr.round(quarter, LocalizeOptions::default()).unwrap(), arr);
        assert!(arr.floor(hourly.negate(), LocalizeOptions::default()).is_err());
    }
}
