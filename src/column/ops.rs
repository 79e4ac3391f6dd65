//! Comparison, reductions, ordering, membership and missing-value fills.

use hashbrown::HashSet;

use crate::arith::{Dispatch, Operand};
use crate::column::DatetimeTzArray;
use crate::error::{ChronocolError, Result};
use crate::kernels;
use crate::null_handling::Mask;
use crate::types::{is_nat, TimeZoneId, Timestamp};

/// Elementwise comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    /// NaT on either side is `false`, except for `Ne`.
    #[inline]
    pub fn apply(self, left: i64, right: i64) -> bool {
        if is_nat(left) || is_nat(right) {
            return self == CmpOp::Ne;
        }
        match self {
            CmpOp::Eq => left == right,
            CmpOp::Ne => left != right,
            CmpOp::Lt => left < right,
            CmpOp::Le => left <= right,
            CmpOp::Gt => left > right,
            CmpOp::Ge => left >= right,
        }
    }
}

impl DatetimeTzArray {
    //==============================================================================
    // Comparison
    //==============================================================================

    fn check_awareness(&self, other_tz: Option<&TimeZoneId>, verb: &str) -> Result<()> {
        if self.dtype.is_aware() != other_tz.is_some() {
            return Err(ChronocolError::TypeMismatch(format!(
                "Cannot {} tz-naive and tz-aware datetime-like objects",
                verb
            )));
        }
        Ok(())
    }

    /// Elementwise comparison against a scalar, a column or an index.
    ///
    /// Aware operands in different zones compare by instant. Any other
    /// operand kind is `NotImplemented`.
    pub fn compare(&self, other: Operand<'_>, op: CmpOp) -> Result<Dispatch<Mask>> {
        let rhs = match other {
            Operand::Timestamp(ts) => {
                if !ts.is_nat() {
                    self.check_awareness(ts.tz(), "compare")?;
                }
                let r = ts.value();
                return Ok(Dispatch::Done(self.data.iter().map(|&l| op.apply(l, r)).collect()));
            }
            Operand::Datetime(arr) => arr,
            Operand::DatetimeIndex(idx) => idx.array(),
            other => {
                log::debug!("compare: {} operand is not handled", other.name());
                return Ok(Dispatch::NotImplemented);
            }
        };
        self.check_awareness(rhs.tz(), "compare")?;
        if rhs.len() != self.len() {
            return Err(ChronocolError::InvalidValue(format!(
                "Lengths must match to compare: {} vs {}",
                self.len(),
                rhs.len()
            )));
        }
        let mask = self
            .data
            .iter()
            .zip(rhs.data.iter())
            .map(|(&l, &r)| op.apply(l, r))
            .collect();
        Ok(Dispatch::Done(mask))
    }

    /// Same dtype and the same physical values, NaT positions included.
    pub fn equals(&self, other: &Self) -> bool {
        self == other
    }

    //==============================================================================
    // Reductions
    //==============================================================================

    /// Skips NaT; all-missing is NaT.
    pub fn min(&self) -> Timestamp {
        if self.is_monotonic_increasing() && !self.is_empty() {
            return self.box_value(self.data[0]);
        }
        self.box_value(kernels::reduce::min(&self.data))
    }

    pub fn max(&self) -> Timestamp {
        if self.is_monotonic_increasing() && !self.is_empty() {
            return self.box_value(self.data[self.len() - 1]);
        }
        self.box_value(kernels::reduce::max(&self.data))
    }

    /// Position of the first minimum, or `-1` if every value is NaT.
    pub fn argmin(&self) -> i64 {
        if self.is_monotonic_increasing() && !self.is_empty() {
            return 0;
        }
        kernels::reduce::argmin(&self.data)
    }

    pub fn argmax(&self) -> i64 {
        if self.is_monotonic_increasing() && !self.is_empty() {
            let last = self.data[self.len() - 1];
            return self.data.partition_point(|&v| v < last) as i64;
        }
        kernels::reduce::argmax(&self.data)
    }

    //==============================================================================
    // Ordering
    //==============================================================================

    pub fn argsort(&self, ascending: bool) -> Vec<usize> {
        kernels::sort::argsort(&self.data, ascending)
    }

    /// Stable sort with NaT last; also returns the permutation applied.
    pub fn sort(&self, ascending: bool) -> (Self, Vec<usize>) {
        let order = self.argsort(ascending);
        let values: Vec<i64> = order.iter().map(|&i| self.data[i]).collect();
        (self.with_values(values), order)
    }

    //==============================================================================
    // Membership & masking
    //==============================================================================

    /// Elementwise membership by instant. NaT matches NaT.
    pub fn isin(&self, values: &[Timestamp]) -> Result<Mask> {
        let mut lookup: HashSet<i64> = HashSet::with_capacity(values.len());
        for ts in values {
            if !ts.is_nat() {
                self.check_awareness(ts.tz(), "compare")?;
            }
            lookup.insert(ts.value());
        }
        Ok(self.data.iter().map(|v| lookup.contains(v)).collect())
    }

    /// Keeps values where `cond` is set and uses `other` (NaT by default)
    /// elsewhere.
    pub fn where_(&self, cond: &Mask, other: Option<Timestamp>) -> Result<Self> {
        if cond.len() != self.len() {
            return Err(ChronocolError::InvalidValue(format!(
                "cond has length {} but the column has length {}",
                cond.len(),
                self.len()
            )));
        }
        let fill = match other {
            Some(ts) => self.unbox_fill(&ts)?,
            None => crate::types::NAT,
        };
        let values: Vec<i64> = self
            .data
            .iter()
            .zip(cond.iter().by_vals())
            .map(|(&v, keep)| if keep { v } else { fill })
            .collect();
        Ok(self.with_values(values))
    }

    pub fn fillna(&self, value: Timestamp) -> Result<Self> {
        if !self.has_any_missing() {
            return Ok(self.clone());
        }
        let fill = self.unbox_fill(&value)?;
        let values: Vec<i64> = self
            .data
            .iter()
            .map(|&v| if is_nat(v) { fill } else { v })
            .collect();
        Ok(self.with_values(values))
    }

    pub fn dropna(&self) -> Self {
        if !self.has_any_missing() {
            return self.clone();
        }
        let values: Vec<i64> = self.data.iter().copied().filter(|v| !is_nat(*v)).collect();
        self.with_values(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NAT;
    use bitvec::prelude::*;

    fn central() -> TimeZoneId {
        TimeZoneId::parse("US/Central").unwrap()
    }

    fn done<T>(d: Dispatch<T>) -> T {
        match d {
            Dispatch::Done(v) => v,
            Dispatch::NotImplemented => panic!("expected a result"),
        }
    }

    #[test]
    fn test_compare_nat_semantics() {
        let a = DatetimeTzArray::from_i64(vec![1, NAT, 3], Some(TimeZoneId::Utc));
        let b = DatetimeTzArray::from_i64(vec![1, NAT, 4], Some(central()));
        let eq = done(a.compare(Operand::Datetime(&b), CmpOp::Eq).unwrap());
        assert_eq!(eq, bitvec![1, 0, 0]);
        let ne = done(a.compare(Operand::Datetime(&b), CmpOp::Ne).unwrap());
        assert_eq!(ne, bitvec![0, 1, 1]);
        let lt = done(a.compare(Operand::Datetime(&b), CmpOp::Lt).unwrap());
        assert_eq!(lt, bitvec![0, 0, 1]);
    }

    #[test]
    fn test_compare_scalar_and_rejections() {
        let a = DatetimeTzArray::from_i64(vec![1, 2], Some(TimeZoneId::Utc));
        let ts = Timestamp::from_utc_nanos(2, Some(central()));
        assert_eq!(done(a.compare(Operand::Timestamp(ts), CmpOp::Ge).unwrap()), bitvec![0, 1]);
        assert_eq!(
            done(a.compare(Operand::Timestamp(Timestamp::nat()), CmpOp::Ne).unwrap()),
            bitvec![1, 1]
        );

        let naive = Timestamp::from_utc_nanos(2, None);
        assert!(matches!(
            a.compare(Operand::Timestamp(naive), CmpOp::Eq),
            Err(ChronocolError::TypeMismatch(_))
        ));
        let short = DatetimeTzArray::from_i64(vec![1], Some(TimeZoneId::Utc));
        assert!(matches!(
            a.compare(Operand::Datetime(&short), CmpOp::Eq),
            Err(ChronocolError::InvalidValue(_))
        ));
        assert!(a.compare(Operand::Int(1), CmpOp::Eq).unwrap().is_not_implemented());
    }

    #[test]
    fn test_reductions_skip_nat() {
        let arr = DatetimeTzArray::from_i64(vec![5, NAT, 2, 9], None);
        assert_eq!(arr.min().value(), 2);
        assert_eq!(arr.max().value(), 9);
        assert_eq!(arr.argmin(), 2);
        assert_eq!(arr.argmax(), 3);

        let empty = DatetimeTzArray::from_i64(vec![NAT, NAT], None);
        assert!(empty.min().is_nat());
        assert!(empty.max().is_nat());
        assert_eq!(empty.argmin(), -1);
        assert_eq!(empty.argmax(), -1);
    }

    #[test]
    fn test_monotonic_fast_path_agrees() {
        let arr = DatetimeTzArray::from_i64(vec![1, 2, 2, 7, 7], None);
        assert!(arr.is_monotonic_increasing());
        assert_eq!(arr.argmax(), kernels::reduce::argmax(arr.asi8()));
        assert_eq!(arr.argmin(), kernels::reduce::argmin(arr.asi8()));
        assert_eq!(arr.max().value(), 7);
    }

    #[test]
    fn test_sort_puts_nat_last() {
        let arr = DatetimeTzArray::from_i64(vec![20, NAT, 10], None);
        let (asc, order) = arr.sort(true);
        assert_eq!(asc.asi8(), &[10, 20, NAT]);
        assert_eq!(order, vec![2, 0, 1]);
        let (desc, _) = arr.sort(false);
        assert_eq!(desc.asi8(), &[20, 10, NAT]);
    }

    #[test]
    fn test_isin_where_fill_drop() {
        let arr = DatetimeTzArray::from_i64(vec![1, NAT, 3], Some(TimeZoneId::Utc));
        let probe = [Timestamp::from_utc_nanos(3, Some(central())), Timestamp::nat()];
        assert_eq!(arr.isin(&probe).unwrap(), bitvec![0, 1, 1]);
        assert!(arr.isin(&[Timestamp::from_utc_nanos(3, None)]).is_err());

        let kept = arr.where_(&bitvec![1, 1, 0], None).unwrap();
        assert_eq!(kept.asi8(), &[1, NAT, NAT]);

        let filled = arr.fillna(Timestamp::from_utc_nanos(0, Some(TimeZoneId::Utc))).unwrap();
        assert_eq!(filled.asi8(), &[1, 0, 3]);
        assert!(arr.fillna(Timestamp::from_utc_nanos(0, None)).is_err());
        assert_eq!(arr.dropna().asi8(), &[1, 3]);
    }
}
