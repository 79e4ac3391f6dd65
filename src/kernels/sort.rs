//! Ordering kernels. NaT is defined to sort last in both directions.

use crate::types::unit::is_nat;

/// Stable argsort over physical values.
///
/// Ties keep their original relative order regardless of direction, and
/// NaT positions are appended last in their original order.
pub fn argsort(values: &[i64], ascending: bool) -> Vec<usize> {
    let (mut valid, missing): (Vec<usize>, Vec<usize>) =
        (0..values.len()).partition(|&i| !is_nat(values[i]));
    if ascending {
        valid.sort_by_key(|&i| values[i]);
    } else {
        valid.sort_by(|&a, &b| values[b].cmp(&values[a]));
    }
    valid.extend(missing);
    valid
}

/// Non-strict increasing, with no NaT. Empty and singleton inputs qualify.
pub fn is_monotonic_increasing(values: &[i64]) -> bool {
    !values.iter().any(|v| is_nat(*v)) && values.windows(2).all(|w| w[0] <= w[1])
}

/// Non-strict decreasing, with no NaT.
pub fn is_monotonic_decreasing(values: &[i64]) -> bool {
    !values.iter().any(|v| is_nat(*v)) && values.windows(2).all(|w| w[0] >= w[1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::unit::NAT;

    #[test]
    fn test_argsort_puts_nat_last_both_directions() {
        let values = [20, NAT, 10];
        assert_eq!(argsort(&values, true), vec![2, 0, 1]);
        assert_eq!(argsort(&values, false), vec![0, 2, 1]);
    }

    #[test]
    fn test_argsort_is_stable() {
        let values = [5, 1, 5, NAT, 1, NAT];
        assert_eq!(argsort(&values, true), vec![1, 4, 0, 2, 3, 5]);
        assert_eq!(argsort(&values, false), vec![0, 2, 1, 4, 3, 5]);
    }

    #[test]
    fn test_monotonic_checks() {
        assert!(is_monotonic_increasing(&[1, 1, 2]));
        assert!(!is_monotonic_increasing(&[1, NAT]));
        assert!(is_monotonic_increasing(&[]));
        assert!(is_monotonic_decreasing(&[3, 2, 2]));
        assert!(!is_monotonic_decreasing(&[1, 2]));
    }
}
