//! Binary-operator dispatch for temporal columns.
//!
//! Each operand family answers `add`/`sub`/`radd`/`rsub` with either a result
//! or [`Dispatch::NotImplemented`], which tells the caller to try the reflected
//! operation on the other operand. `NotImplemented` is never an error.
//!
//! Kernels produce raw physical integers tagged with a [`PhysicalKind`]; the
//! boxing step turns them into the most specific logical column type.

pub mod operand;

pub use operand::Operand;

use crate::column::{DatetimeTzArray, DurationArray};
use crate::error::{ChronocolError, Result};
use crate::kernels;
use crate::types::{DatetimeTzDtype, NAT};

//==================================================================================
// 1. Dispatch Outcome
//==================================================================================

/// The outcome of one side of a binary operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch<T> {
    Done(T),
    /// This operand cannot handle the other one; try the reflected operation.
    NotImplemented,
}

impl<T> Dispatch<T> {
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Dispatch::NotImplemented)
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Dispatch::Done(v) => Some(v),
            Dispatch::NotImplemented => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Dispatch<U> {
        match self {
            Dispatch::Done(v) => Dispatch::Done(f(v)),
            Dispatch::NotImplemented => Dispatch::NotImplemented,
        }
    }

    /// Falls back to `reflected` when this side declined.
    pub fn or_else<F>(self, reflected: F) -> Result<Dispatch<T>>
    where
        F: FnOnce() -> Result<Dispatch<T>>,
    {
        match self {
            Dispatch::Done(v) => Ok(Dispatch::Done(v)),
            Dispatch::NotImplemented => reflected(),
        }
    }
}

//==================================================================================
// 2. Raw Results & Boxing
//==================================================================================

/// What a raw integer buffer means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicalKind {
    Datetime(DatetimeTzDtype),
    Timedelta,
}

/// Physical output of an arithmetic kernel, before boxing.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResult {
    pub values: Vec<i64>,
    pub kind: PhysicalKind,
}

impl RawResult {
    fn datetime(values: Vec<i64>, dtype: DatetimeTzDtype) -> Self {
        Self {
            values,
            kind: PhysicalKind::Datetime(dtype),
        }
    }

    fn timedelta(values: Vec<i64>) -> Self {
        Self {
            values,
            kind: PhysicalKind::Timedelta,
        }
    }

    /// Wraps the buffer in the column type its kind calls for.
    pub fn box_result(self) -> ArithOutput {
        match self.kind {
            PhysicalKind::Datetime(dtype) => {
                ArithOutput::Datetime(DatetimeTzArray::simple_new(self.values, dtype))
            }
            PhysicalKind::Timedelta => ArithOutput::Duration(DurationArray::simple_new(self.values)),
        }
    }
}

/// A boxed arithmetic result at the array level.
#[derive(Debug, Clone, PartialEq)]
pub enum ArithOutput {
    Datetime(DatetimeTzArray),
    Duration(DurationArray),
}

impl ArithOutput {
    pub fn into_datetime(self) -> Option<DatetimeTzArray> {
        match self {
            ArithOutput::Datetime(arr) => Some(arr),
            ArithOutput::Duration(_) => None,
        }
    }

    pub fn into_duration(self) -> Option<DurationArray> {
        match self {
            ArithOutput::Duration(arr) => Some(arr),
            ArithOutput::Datetime(_) => None,
        }
    }
}

//==================================================================================
// 3. The Dispatch Contract
//==================================================================================

/// `self <op> other` for `add`/`sub`, `other <op> self` for `radd`/`rsub`.
pub trait ArithmeticDispatch {
    type Output;

    fn add(&self, other: Operand<'_>) -> Result<Dispatch<Self::Output>>;
    fn sub(&self, other: Operand<'_>) -> Result<Dispatch<Self::Output>>;
    fn radd(&self, other: Operand<'_>) -> Result<Dispatch<Self::Output>>;
    fn rsub(&self, other: Operand<'_>) -> Result<Dispatch<Self::Output>>;
}

//==================================================================================
// 4. DatetimeTzArray Kernels
//==================================================================================

impl DatetimeTzArray {
    fn check_same_tz(&self, other: &DatetimeTzDtype, op: &str) -> Result<()> {
        if self.tz() != other.tz() {
            return Err(ChronocolError::TypeMismatch(format!(
                "cannot {} DatetimeTzArray with dtype {} and datetime with dtype {}: timezones must match",
                op, self.dtype(), other
            )));
        }
        Ok(())
    }

    /// `self + other` on physical values. Addition commutes, so this also
    /// serves `radd`.
    pub(crate) fn raw_add(&self, other: &Operand<'_>) -> Result<Dispatch<RawResult>> {
        let values = match other {
            Operand::Duration(d) => kernels::arith::add_scalar(self.asi8(), d.nanos())?,
            Operand::Durations(arr) => kernels::arith::add_arrays(self.asi8(), arr.asi8())?,
            Operand::DurationIndex(idx) => kernels::arith::add_arrays(self.asi8(), idx.array().asi8())?,
            Operand::Timestamp(_) | Operand::Datetime(_) | Operand::DatetimeIndex(_) => {
                return Err(ChronocolError::TypeMismatch(format!(
                    "cannot add DatetimeTzArray and {}",
                    other.name()
                )))
            }
            Operand::Int(_) | Operand::Ints(_) => {
                log::debug!("add: {} operand is not handled", other.name());
                return Ok(Dispatch::NotImplemented);
            }
        };
        Ok(Dispatch::Done(RawResult::datetime(values, *self.dtype())))
    }

    /// `self - other` on physical values.
    pub(crate) fn raw_sub(&self, other: &Operand<'_>) -> Result<Dispatch<RawResult>> {
        let result = match other {
            Operand::Duration(d) => {
                RawResult::datetime(kernels::arith::sub_scalar(self.asi8(), d.nanos())?, *self.dtype())
            }
            Operand::Durations(arr) => {
                RawResult::datetime(kernels::arith::sub_arrays(self.asi8(), arr.asi8())?, *self.dtype())
            }
            Operand::DurationIndex(idx) => RawResult::datetime(
                kernels::arith::sub_arrays(self.asi8(), idx.array().asi8())?,
                *self.dtype(),
            ),
            Operand::Timestamp(ts) if ts.is_nat() => RawResult::timedelta(vec![NAT; self.len()]),
            Operand::Timestamp(ts) => {
                self.check_same_tz(&DatetimeTzDtype::ns(ts.tz().copied()), "subtract")?;
                RawResult::timedelta(kernels::arith::sub_scalar(self.asi8(), ts.value())?)
            }
            Operand::Datetime(arr) => {
                self.check_same_tz(arr.dtype(), "subtract")?;
                RawResult::timedelta(kernels::arith::sub_arrays(self.asi8(), arr.asi8())?)
            }
            Operand::DatetimeIndex(idx) => {
                self.check_same_tz(idx.dtype(), "subtract")?;
                RawResult::timedelta(kernels::arith::sub_arrays(self.asi8(), idx.asi8())?)
            }
            Operand::Int(_) | Operand::Ints(_) => {
                log::debug!("sub: {} operand is not handled", other.name());
                return Ok(Dispatch::NotImplemented);
            }
        };
        Ok(Dispatch::Done(result))
    }

    /// `other - self` on physical values.
    pub(crate) fn raw_rsub(&self, other: &Operand<'_>) -> Result<Dispatch<RawResult>> {
        let values = match other {
            Operand::Duration(_) | Operand::Durations(_) | Operand::DurationIndex(_) => {
                return Err(ChronocolError::TypeMismatch(format!(
                    "cannot subtract DatetimeTzArray from {}",
                    other.name()
                )))
            }
            Operand::Timestamp(ts) if ts.is_nat() => vec![NAT; self.len()],
            Operand::Timestamp(ts) => {
                self.check_same_tz(&DatetimeTzDtype::ns(ts.tz().copied()), "subtract")?;
                kernels::arith::rsub_scalar(ts.value(), self.asi8())?
            }
            Operand::Datetime(arr) => {
                self.check_same_tz(arr.dtype(), "subtract")?;
                kernels::arith::sub_arrays(arr.asi8(), self.asi8())?
            }
            Operand::DatetimeIndex(idx) => {
                self.check_same_tz(idx.dtype(), "subtract")?;
                kernels::arith::sub_arrays(idx.asi8(), self.asi8())?
            }
            Operand::Int(_) | Operand::Ints(_) => {
                log::debug!("rsub: {} operand is not handled", other.name());
                return Ok(Dispatch::NotImplemented);
            }
        };
        Ok(Dispatch::Done(RawResult::timedelta(values)))
    }
}

impl ArithmeticDispatch for DatetimeTzArray {
    type Output = ArithOutput;

    fn add(&self, other: Operand<'_>) -> Result<Dispatch<ArithOutput>> {
        Ok(self.raw_add(&other)?.map(RawResult::box_result))
    }

    fn sub(&self, other: Operand<'_>) -> Result<Dispatch<ArithOutput>> {
        Ok(self.raw_sub(&other)?.map(RawResult::box_result))
    }

    fn radd(&self, other: Operand<'_>) -> Result<Dispatch<ArithOutput>> {
        Ok(self.raw_add(&other)?.map(RawResult::box_result))
    }

    fn rsub(&self, other: Operand<'_>) -> Result<Dispatch<ArithOutput>> {
        Ok(self.raw_rsub(&other)?.map(RawResult::box_result))
    }
}
