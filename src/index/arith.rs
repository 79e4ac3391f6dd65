//! Arithmetic at the index level: the array kernels plus name propagation,
//! freq bookkeeping and boxing into index types.

use crate::arith::{ArithOutput, ArithmeticDispatch, Dispatch, Operand, RawResult};
use crate::error::Result;
use crate::index::{DatetimeTzIndex, DurationIndex};
use crate::types::Freq;

/// A boxed arithmetic result at the index level.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexArithOutput {
    Datetime(DatetimeTzIndex),
    Duration(DurationIndex),
}

impl IndexArithOutput {
    pub fn into_datetime(self) -> Option<DatetimeTzIndex> {
        match self {
            IndexArithOutput::Datetime(idx) => Some(idx),
            IndexArithOutput::Duration(_) => None,
        }
    }

    pub fn into_duration(self) -> Option<DurationIndex> {
        match self {
            IndexArithOutput::Duration(idx) => Some(idx),
            IndexArithOutput::Datetime(_) => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            IndexArithOutput::Datetime(idx) => idx.name(),
            IndexArithOutput::Duration(idx) => idx.name(),
        }
    }
}

fn operand_name(other: &Operand<'_>) -> Option<String> {
    match other {
        Operand::DatetimeIndex(idx) => idx.name().map(str::to_string),
        Operand::DurationIndex(idx) => idx.name().map(str::to_string),
        _ => None,
    }
}

impl DatetimeTzIndex {
    /// Only a non-NaT `Duration` scalar shifts every element by the same
    /// amount, so only it keeps freq.
    fn freq_after(&self, other: &Operand<'_>) -> Option<Freq> {
        match other {
            Operand::Duration(d) if !d.is_nat() => self.freq(),
            _ => None,
        }
    }

    fn box_arith(&self, raw: RawResult, name: Option<String>, freq: Option<Freq>) -> IndexArithOutput {
        match raw.box_result() {
            ArithOutput::Datetime(arr) => IndexArithOutput::Datetime(self.rebuild(arr, name, freq)),
            ArithOutput::Duration(arr) => IndexArithOutput::Duration(DurationIndex::with_name(arr, name)),
        }
    }

    /// The left operand's name wins; otherwise the right one's.
    fn result_name(&self, other: &Operand<'_>, self_is_left: bool) -> Option<String> {
        let own = self.name().map(str::to_string);
        if self_is_left {
            own.or_else(|| operand_name(other))
        } else {
            operand_name(other).or(own)
        }
    }
}

impl ArithmeticDispatch for DatetimeTzIndex {
    type Output = IndexArithOutput;

    fn add(&self, other: Operand<'_>) -> Result<Dispatch<IndexArithOutput>> {
        let name = self.result_name(&other, true);
        let freq = self.freq_after(&other);
        Ok(self.array().raw_add(&other)?.map(|raw| self.box_arith(raw, name, freq)))
    }

    fn sub(&self, other: Operand<'_>) -> Result<Dispatch<IndexArithOutput>> {
        let name = self.result_name(&other, true);
        let freq = self.freq_after(&other);
        Ok(self.array().raw_sub(&other)?.map(|raw| self.box_arith(raw, name, freq)))
    }

    fn radd(&self, other: Operand<'_>) -> Result<Dispatch<IndexArithOutput>> {
        let name = self.result_name(&other, false);
        let freq = self.freq_after(&other);
        Ok(self.array().raw_add(&other)?.map(|raw| self.box_arith(raw, name, freq)))
    }

    fn rsub(&self, other: Operand<'_>) -> Result<Dispatch<IndexArithOutput>> {
        let name = self.result_name(&other, false);
        Ok(self.array().raw_rsub(&other)?.map(|raw| self.box_arith(raw, name, None)))
    }
}
