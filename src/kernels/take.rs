//! Gather kernels: positional take (with and without fill), slice resolution,
//! arithmetic-progression detection, and repeat.

use crate::error::{ChronocolError, Result};

//==================================================================================
// 1. Slices
//==================================================================================

/// A Python-style slice: `start:stop:step`, every bound optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SliceSpec {
    pub start: Option<i64>,
    pub stop: Option<i64>,
    pub step: Option<i64>,
}

impl SliceSpec {
    pub fn new(start: Option<i64>, stop: Option<i64>, step: Option<i64>) -> Self {
        Self { start, stop, step }
    }

    /// `start..stop` with step 1.
    pub fn range(start: i64, stop: i64) -> Self {
        Self::new(Some(start), Some(stop), None)
    }

    /// `::-1`
    pub fn reversed() -> Self {
        Self::new(None, None, Some(-1))
    }
}

/// A resolved slice: `count` positions starting at `start`, `step` apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StridedRange {
    pub start: usize,
    pub step: i64,
    pub count: usize,
}

impl StridedRange {
    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.count).map(move |k| (self.start as i64 + k as i64 * self.step) as usize)
    }
}

/// Resolves a slice against a length using Python's clamping rules.
pub fn resolve_slice(spec: &SliceSpec, len: usize) -> Result<StridedRange> {
    let step = spec.step.unwrap_or(1);
    if step == 0 {
        return Err(ChronocolError::InvalidValue("slice step cannot be zero".into()));
    }
    let n = len as i64;
    let clamp = |bound: Option<i64>, default: i64, lo: i64, hi: i64| -> i64 {
        match bound {
            None => default,
            Some(b) if b < 0 => (b + n).clamp(lo, hi),
            Some(b) => b.clamp(lo, hi),
        }
    };
    let (start, stop) = if step > 0 {
        (clamp(spec.start, 0, 0, n), clamp(spec.stop, n, 0, n))
    } else {
        (clamp(spec.start, n - 1, -1, n - 1), clamp(spec.stop, -1, -1, n - 1))
    };
    // Both spans lie within [-1, n], so only the step needs widening.
    let count = if step > 0 && stop > start {
        (stop - start - 1) as u64 / step.unsigned_abs() + 1
    } else if step < 0 && start > stop {
        (start - stop - 1) as u64 / step.unsigned_abs() + 1
    } else {
        0
    };
    Ok(StridedRange {
        start: if count == 0 { 0 } else { start as usize },
        step,
        count: count as usize,
    })
}

/// Copies the positions of a resolved slice.
pub fn gather_strided(values: &[i64], range: &StridedRange) -> Vec<i64> {
    range.positions().map(|i| values[i]).collect()
}

/// Detects indices that form an in-bounds arithmetic progression, so a take
/// can be served as a slice. Returns `None` for anything else.
pub fn maybe_indices_to_slice(indices: &[i64], len: usize) -> Option<StridedRange> {
    let first = *indices.first()?;
    let in_bounds = |i: i64| i >= 0 && (i as u64) < len as u64;
    if !in_bounds(first) {
        return None;
    }
    if indices.len() == 1 {
        return Some(StridedRange {
            start: first as usize,
            step: 1,
            count: 1,
        });
    }
    let step = indices[1].checked_sub(first)?;
    if step == 0 {
        return None;
    }
    let progression = indices
        .windows(2)
        .all(|w| w[1].checked_sub(w[0]) == Some(step));
    let last = *indices.last()?;
    if !progression || !in_bounds(last) {
        return None;
    }
    Some(StridedRange {
        start: first as usize,
        step,
        count: indices.len(),
    })
}

//==================================================================================
// 2. Take
//==================================================================================

/// Wraps a possibly-negative position into `[0, len)`.
pub fn normalize_position(index: i64, len: usize) -> Result<usize> {
    let n = len as i64;
    let resolved = if index < 0 { index + n } else { index };
    if resolved < 0 || resolved >= n {
        return Err(ChronocolError::IndexOutOfBounds { index, len });
    }
    Ok(resolved as usize)
}

/// `take` without fill: negative indices count from the end.
pub fn take_wrapping(values: &[i64], indices: &[i64]) -> Result<Vec<i64>> {
    indices
        .iter()
        .map(|&i| normalize_position(i, values.len()).map(|p| values[p]))
        .collect()
}

/// `take` with fill: `-1` produces `fill`; anything else out of range fails.
pub fn take_with_fill(values: &[i64], indices: &[i64], fill: i64) -> Result<Vec<i64>> {
    let len = values.len();
    indices
        .iter()
        .map(|&i| match i {
            -1 => Ok(fill),
            i if i >= 0 && (i as u64) < len as u64 => Ok(values[i as usize]),
            i => Err(ChronocolError::IndexOutOfBounds { index: i, len }),
        })
        .collect()
}

//==================================================================================
// 3. Repeat
//==================================================================================

/// How many times each element is repeated.
#[derive(Debug, Clone, Copy)]
pub enum Repeats<'a> {
    Uniform(usize),
    PerElement(&'a [usize]),
}

pub fn repeat(values: &[i64], repeats: Repeats<'_>) -> Result<Vec<i64>> {
    match repeats {
        Repeats::Uniform(n) => {
            let total = values
                .len()
                .checked_mul(n)
                .ok_or_else(|| ChronocolError::overflow("repeat length"))?;
            let mut out = Vec::with_capacity(total);
            for v in values {
                out.extend(std::iter::repeat(*v).take(n));
            }
            Ok(out)
        }
        Repeats::PerElement(counts) => {
            if counts.len() != values.len() {
                return Err(ChronocolError::InvalidValue(format!(
                    "repeats has length {} but the column has length {}",
                    counts.len(),
                    values.len()
                )));
            }
            let total = counts
                .iter()
                .try_fold(0usize, |acc, &n| acc.checked_add(n))
                .ok_or_else(|| ChronocolError::overflow("repeat length"))?;
            let mut out = Vec::with_capacity(total);
            for (v, n) in values.iter().zip(counts) {
                out.extend(std::iter::repeat(*v).take(*n));
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::unit::NAT;

    #[test]
    fn test_resolve_slice_python_semantics() {
        let r = resolve_slice(&SliceSpec::range(1, 4), 5).unwrap();
        assert_eq!(r.positions().collect::<Vec<_>>(), vec![1, 2, 3]);

        let r = resolve_slice(&SliceSpec::reversed(), 4).unwrap();
        assert_eq!(r.positions().collect::<Vec<_>>(), vec![3, 2, 1, 0]);

        let r = resolve_slice(&SliceSpec::new(Some(-2), None, None), 5).unwrap();
        assert_eq!(r.positions().collect::<Vec<_>>(), vec![3, 4]);

        let r = resolve_slice(&SliceSpec::new(None, None, Some(2)), 5).unwrap();
        assert_eq!(r.positions().collect::<Vec<_>>(), vec![0, 2, 4]);

        let r = resolve_slice(&SliceSpec::range(10, 20), 5).unwrap();
        assert_eq!(r.count, 0);

        assert!(resolve_slice(&SliceSpec::new(None, None, Some(0)), 5).is_err());
    }

    #[test]
    fn test_resolve_slice_extreme_steps() {
        let r = resolve_slice(&SliceSpec::new(None, None, Some(i64::MAX)), 3).unwrap();
        assert_eq!(r.positions().collect::<Vec<_>>(), vec![0]);

        let r = resolve_slice(&SliceSpec::new(None, None, Some(i64::MIN)), 3).unwrap();
        assert_eq!(r.positions().collect::<Vec<_>>(), vec![2]);

        let r = resolve_slice(&SliceSpec::new(Some(1), None, Some(i64::MIN + 1)), 3).unwrap();
        assert_eq!(r.positions().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_maybe_indices_to_slice() {
        assert_eq!(
            maybe_indices_to_slice(&[2, 3, 4], 5),
            Some(StridedRange { start: 2, step: 1, count: 3 })
        );
        assert_eq!(
            maybe_indices_to_slice(&[4, 2, 0], 5),
            Some(StridedRange { start: 4, step: -2, count: 3 })
        );
        assert_eq!(maybe_indices_to_slice(&[0, 1, 3], 5), None);
        assert_eq!(maybe_indices_to_slice(&[3, 4, 5], 5), None);
        assert_eq!(maybe_indices_to_slice(&[-1, 0], 5), None);
        assert_eq!(maybe_indices_to_slice(&[1, 1], 5), None);
        assert_eq!(maybe_indices_to_slice(&[], 5), None);
    }

    #[test]
    fn test_take_wrapping_and_fill() {
        let values = [10, 20, 30];
        assert_eq!(take_wrapping(&values, &[0, -1, -3]).unwrap(), vec![10, 30, 10]);
        assert!(take_wrapping(&values, &[3]).is_err());
        assert!(take_wrapping(&values, &[-4]).is_err());

        assert_eq!(take_with_fill(&values, &[2, -1], NAT).unwrap(), vec![30, NAT]);
        assert!(matches!(
            take_with_fill(&values, &[-2], NAT),
            Err(ChronocolError::IndexOutOfBounds { index: -2, len: 3 })
        ));
        assert!(take_with_fill(&values, &[3], NAT).is_err());
    }

    #[test]
    fn test_repeat() {
        assert_eq!(repeat(&[1, 2], Repeats::Uniform(2)).unwrap(), vec![1, 1, 2, 2]);
        assert_eq!(
            repeat(&[1, 2, 3], Repeats::PerElement(&[0, 2, 1])).unwrap(),
            vec![2, 2, 3]
        );
        assert!(repeat(&[1, 2], Repeats::PerElement(&[1])).is_err());
    }

    #[test]
    fn test_repeat_total_overflow_is_an_error() {
        assert!(matches!(
            repeat(&[1, 2], Repeats::Uniform(usize::MAX)),
            Err(ChronocolError::Overflow(_))
        ));
        assert!(matches!(
            repeat(&[1, 2], Repeats::PerElement(&[usize::MAX, 1])),
            Err(ChronocolError::Overflow(_))
        ));
    }
}
