//! The `freq` descriptor: an advisory hint that a column is regularly spaced
//! by a fixed nanosecond step.

use crate::error::{ChronocolError, Result};
use crate::types::scalar::Duration;
use crate::types::unit::{
    is_nat, NANOS_PER_DAY, NANOS_PER_HOUR, NANOS_PER_MICRO, NANOS_PER_MILLI, NANOS_PER_MINUTE,
    NANOS_PER_SECOND,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tick aliases, largest first. `freqstr` picks the first one that divides the step.
const TICKS: &[(&str, i64)] = &[
    ("D", NANOS_PER_DAY),
    ("H", NANOS_PER_HOUR),
    ("T", NANOS_PER_MINUTE),
    ("S", NANOS_PER_SECOND),
    ("L", NANOS_PER_MILLI),
    ("U", NANOS_PER_MICRO),
    ("N", 1),
];

/// Extra spellings accepted by [`Freq::parse`].
const ALIASES: &[(&str, i64)] = &[
    ("min", NANOS_PER_MINUTE),
    ("ms", NANOS_PER_MILLI),
    ("us", NANOS_PER_MICRO),
    ("ns", 1),
];

/// A fixed step between consecutive elements. The step may be negative
/// (a strictly decreasing regular column) but never zero.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Freq {
    step_ns: i64,
}

impl Freq {
    pub fn new(step_ns: i64) -> Result<Self> {
        if step_ns == 0 || is_nat(step_ns) {
            return Err(ChronocolError::InvalidValue(format!(
                "invalid freq step of {} ns",
                step_ns
            )));
        }
        Ok(Self { step_ns })
    }

    pub fn from_duration(duration: Duration) -> Result<Self> {
        Self::new(duration.nanos())
    }

    /// Parses `"D"`, `"2H"`, `"-15min"`, `"30S"` and friends.
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = || ChronocolError::InvalidValue(format!("invalid frequency: {}", text));
        let trimmed = text.trim();
        let split = trimmed
            .find(|c: char| c.is_ascii_alphabetic())
            .ok_or_else(invalid)?;
        let (count, alias) = trimmed.split_at(split);
        let count = match count {
            "" => 1,
            "-" => -1,
            "+" => 1,
            digits => digits.parse::<i64>().map_err(|_| invalid())?,
        };
        let tick = TICKS
            .iter()
            .chain(ALIASES.iter())
            .find(|(name, _)| *name == alias)
            .map(|(_, nanos)| *nanos)
            .ok_or_else(invalid)?;
        let step = count.checked_mul(tick).ok_or_else(invalid)?;
        Self::new(step)
    }

    pub fn step(&self) -> i64 {
        self.step_ns
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_nanos(self.step_ns)
    }

    /// The same spacing in the opposite direction.
    pub fn negate(&self) -> Self {
        Self {
            step_ns: -self.step_ns,
        }
    }

    /// The spacing after taking every `factor`-th element.
    pub fn scaled(&self, factor: i64) -> Result<Self> {
        let step = self
            .step_ns
            .checked_mul(factor)
            .ok_or_else(|| ChronocolError::overflow("freq * step"))?;
        Self::new(step)
    }

    /// Forces the sign of the step to match the requested direction.
    pub fn oriented(&self, ascending: bool) -> Self {
        if (self.step_ns > 0) == ascending {
            *self
        } else {
            self.negate()
        }
    }

    /// Canonical alias string such as `"D"` or `"-2H"`.
    pub fn freqstr(&self) -> String {
        let (name, tick) = TICKS
            .iter()
            .find(|(_, tick)| self.step_ns % tick == 0)
            .copied()
            .unwrap_or(("N", 1));
        match self.step_ns / tick {
            1 => name.to_string(),
            n => format!("{}{}", n, name),
        }
    }

    /// Returns `true` if every consecutive pair of `values` is exactly one
    /// step apart. Columns with fewer than two elements always conform;
    /// NaT never does.
    pub fn conforms(&self, values: &[i64]) -> bool {
        if values.iter().any(|v| is_nat(*v)) {
            return false;
        }
        values
            .windows(2)
            .all(|w| w[1].checked_sub(w[0]) == Some(self.step_ns))
    }

    /// Infers a freq from evenly spaced, NaT-free values.
    pub fn infer(values: &[i64], min_periods: usize) -> Option<Self> {
        if values.len() < min_periods.max(2) || values.iter().any(|v| is_nat(*v)) {
            return None;
        }
        let step = values[1].checked_sub(values[0])?;
        let freq = Self::new(step).ok()?;
        freq.conforms(values).then_some(freq)
    }
}

impl fmt::Display for Freq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.freqstr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::unit::NAT;

    #[test]
    fn test_parse_and_freqstr() {
        assert_eq!(Freq::parse("D").unwrap().step(), NANOS_PER_DAY);
        assert_eq!(Freq::parse("2H").unwrap().freqstr(), "2H");
        assert_eq!(Freq::parse("90min").unwrap().freqstr(), "90T");
        assert_eq!(Freq::parse("-1D").unwrap().freqstr(), "-1D");
        assert_eq!(Freq::parse("60S").unwrap().freqstr(), "T");
        assert!(Freq::parse("0D").is_err());
        assert!(Freq::parse("3Q").is_err());
    }

    #[test]
    fn test_infer_requires_even_spacing_without_nat() {
        assert_eq!(Freq::infer(&[0, 10, 20, 30], 3).unwrap().step(), 10);
        assert!(Freq::infer(&[0, 10, 25], 3).is_none());
        assert!(Freq::infer(&[0, 10, NAT], 3).is_none());
        assert!(Freq::infer(&[0, 10], 3).is_none());
        assert_eq!(Freq::infer(&[30, 20, 10], 3).unwrap().step(), -10);
    }

    #[test]
    fn test_oriented_and_scaled() {
        let day = Freq::parse("D").unwrap();
        assert_eq!(day.oriented(false).step(), -NANOS_PER_DAY);
        assert_eq!(day.negate().oriented(true), day);
        assert_eq!(day.scaled(-2).unwrap().freqstr(), "-2D");
    }
}
