//! The right-hand side of a binary operation.

use crate::column::{DatetimeTzArray, DurationArray};
use crate::index::{DatetimeTzIndex, DurationIndex};
use crate::types::{Duration, Timestamp};

/// Every operand kind the dispatch layer knows how to name. Kinds a given
/// operation cannot handle produce `Dispatch::NotImplemented`.
#[derive(Debug, Clone, Copy)]
pub enum Operand<'a> {
    Timestamp(Timestamp),
    Duration(Duration),
    Datetime(&'a DatetimeTzArray),
    Durations(&'a DurationArray),
    DatetimeIndex(&'a DatetimeTzIndex),
    DurationIndex(&'a DurationIndex),
    Int(i64),
    Ints(&'a [i64]),
}

impl Operand<'_> {
    /// The operand's type name, as used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Operand::Timestamp(_) => "Timestamp",
            Operand::Duration(_) => "Duration",
            Operand::Datetime(_) => "DatetimeTzArray",
            Operand::Durations(_) => "DurationArray",
            Operand::DatetimeIndex(_) => "DatetimeTzIndex",
            Operand::DurationIndex(_) => "DurationIndex",
            Operand::Int(_) => "int",
            Operand::Ints(_) => "int array",
        }
    }
}

impl From<Timestamp> for Operand<'_> {
    fn from(ts: Timestamp) -> Self {
        Operand::Timestamp(ts)
    }
}

impl From<Duration> for Operand<'_> {
    fn from(d: Duration) -> Self {
        Operand::Duration(d)
    }
}

impl<'a> From<&'a DatetimeTzArray> for Operand<'a> {
    fn from(arr: &'a DatetimeTzArray) -> Self {
        Operand::Datetime(arr)
    }
}

impl<'a> From<&'a DurationArray> for Operand<'a> {
    fn from(arr: &'a DurationArray) -> Self {
        Operand::Durations(arr)
    }
}

impl<'a> From<&'a DatetimeTzIndex> for Operand<'a> {
    fn from(idx: &'a DatetimeTzIndex) -> Self {
        Operand::DatetimeIndex(idx)
    }
}

impl<'a> From<&'a DurationIndex> for Operand<'a> {
    fn from(idx: &'a DurationIndex) -> Self {
        Operand::DurationIndex(idx)
    }
}
