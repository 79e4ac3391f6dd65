//! Skip-NaT reductions. An all-NaT (or empty) input reduces to [`NAT`] for
//! `min`/`max` and to `-1` for `argmin`/`argmax`.

use crate::types::unit::{is_nat, NAT};

pub fn min(values: &[i64]) -> i64 {
    values.iter().copied().filter(|v| !is_nat(*v)).min().unwrap_or(NAT)
}

pub fn max(values: &[i64]) -> i64 {
    values.iter().copied().filter(|v| !is_nat(*v)).max().unwrap_or(NAT)
}

/// Position of the first minimum.
pub fn argmin(values: &[i64]) -> i64 {
    let mut best: Option<(usize, i64)> = None;
    for (i, &v) in values.iter().enumerate().filter(|(_, v)| !is_nat(**v)) {
        if best.map_or(true, |(_, b)| v < b) {
            best = Some((i, v));
        }
    }
    best.map_or(-1, |(i, _)| i as i64)
}

/// Position of the first maximum.
pub fn argmax(values: &[i64]) -> i64 {
    let mut best: Option<(usize, i64)> = None;
    for (i, &v) in values.iter().enumerate().filter(|(_, v)| !is_nat(**v)) {
        if best.map_or(true, |(_, b)| v > b) {
            best = Some((i, v));
        }
    }
    best.map_or(-1, |(i, _)| i as i64)
}
