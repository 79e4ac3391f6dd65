//! Checked, NaT-propagating elementwise arithmetic on physical buffers.
//!
//! Any NaT operand yields NaT at that position. A result that overflows, or
//! that lands exactly on the sentinel, is an error rather than a silent NaT.

use crate::error::{ChronocolError, Result};
use crate::types::unit::{is_nat, NAT};

#[inline]
fn checked(a: i64, b: i64, op: fn(i64, i64) -> Option<i64>, name: &str) -> Result<i64> {
    if is_nat(a) || is_nat(b) {
        return Ok(NAT);
    }
    match op(a, b) {
        Some(v) if !is_nat(v) => Ok(v),
        _ => Err(ChronocolError::overflow(format!("{} {} {}", a, name, b))),
    }
}

fn check_lengths(left: &[i64], right: &[i64]) -> Result<()> {
    if left.len() != right.len() {
        return Err(ChronocolError::InvalidValue(format!(
            "Lengths must match: {} != {}",
            left.len(),
            right.len()
        )));
    }
    Ok(())
}

/// `values[i] + rhs`
pub fn add_scalar(values: &[i64], rhs: i64) -> Result<Vec<i64>> {
    values.iter().map(|&v| checked(v, rhs, i64::checked_add, "+")).collect()
}

/// `values[i] - rhs`
pub fn sub_scalar(values: &[i64], rhs: i64) -> Result<Vec<i64>> {
    values.iter().map(|&v| checked(v, rhs, i64::checked_sub, "-")).collect()
}

/// `lhs - values[i]`
pub fn rsub_scalar(lhs: i64, values: &[i64]) -> Result<Vec<i64>> {
    values.iter().map(|&v| checked(lhs, v, i64::checked_sub, "-")).collect()
}

/// `left[i] + right[i]`
pub fn add_arrays(left: &[i64], right: &[i64]) -> Result<Vec<i64>> {
    check_lengths(left, right)?;
    left.iter()
        .zip(right)
        .map(|(&a, &b)| checked(a, b, i64::checked_add, "+"))
        .collect()
}

/// `left[i] - right[i]`
pub fn sub_arrays(left: &[i64], right: &[i64]) -> Result<Vec<i64>> {
    check_lengths(left, right)?;
    left.iter()
        .zip(right)
        .map(|(&a, &b)| checked(a, b, i64::checked_sub, "-"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_ops_propagate_nat() {
        assert_eq!(add_scalar(&[1, NAT, 3], 10).unwrap(), vec![11, NAT, 13]);
        assert_eq!(add_scalar(&[1, 2], NAT).unwrap(), vec![NAT, NAT]);
        assert_eq!(sub_scalar(&[10, NAT], 3).unwrap(), vec![7, NAT]);
        assert_eq!(rsub_scalar(10, &[3, NAT]).unwrap(), vec![7, NAT]);
    }

    #[test]
    fn test_array_ops() {
        assert_eq!(sub_arrays(&[10, 20, NAT], &[1, NAT, 3]).unwrap(), vec![9, NAT, NAT]);
        assert_eq!(add_arrays(&[1, 2], &[3, 4]).unwrap(), vec![4, 6]);
        assert!(matches!(
            add_arrays(&[1], &[1, 2]),
            Err(ChronocolError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_overflow_is_an_error() {
        assert!(matches!(
            add_scalar(&[i64::MAX], 1),
            Err(ChronocolError::Overflow(_))
        ));
        // Landing exactly on the sentinel is also an overflow.
        assert!(sub_scalar(&[i64::MIN + 1], 1).is_err());
    }
}
