// --- IN: src/null_handling/bitmap.rs ---

//! Pure, stateless kernels for deriving and re-applying nullability on dense
//! `i64` buffers that use [`NAT`] as their in-band missing marker.

use arrow::buffer::NullBuffer;
use bitvec::prelude::*;

use crate::error::{ChronocolError, Result};
use crate::null_handling::Mask;
use crate::types::unit::{is_nat, NAT};

//==================================================================================
// 1. Mask Derivation
//==================================================================================

/// Elementwise "is this NaT" test. O(N).
pub fn missing_mask(values: &[i64]) -> Mask {
    values.iter().map(|v| is_nat(*v)).collect()
}

/// Short-circuits on the first NaT.
pub fn any_missing(values: &[i64]) -> bool {
    values.iter().any(|v| is_nat(*v))
}

pub fn count_missing(values: &[i64]) -> usize {
    values.iter().filter(|v| is_nat(**v)).count()
}

/// Positions whose mask bit is set, in ascending order.
pub fn set_positions(mask: &BitSlice) -> Vec<usize> {
    mask.iter_ones().collect()
}

//==================================================================================
// 2. Arrow Validity Translation
//==================================================================================

/// Builds an Arrow validity buffer (`true` = valid) for the buffer, or `None`
/// when nothing is missing.
pub fn validity_buffer(values: &[i64]) -> Option<NullBuffer> {
    if !any_missing(values) {
        return None;
    }
    Some(NullBuffer::from(
        values.iter().map(|v| !is_nat(*v)).collect::<Vec<bool>>(),
    ))
}

/// Writes NaT into every slot that the validity buffer marks as null.
///
/// The slot contents under a null are unspecified in Arrow, so they are
/// always overwritten.
pub fn apply_validity(mut values: Vec<i64>, nulls: Option<&NullBuffer>) -> Result<Vec<i64>> {
    let Some(nb) = nulls else {
        return Ok(values);
    };
    if nb.len() != values.len() {
        return Err(ChronocolError::InternalError(format!(
            "validity length ({}) does not match value length ({})",
            nb.len(),
            values.len()
        )));
    }
    for i in nb.iter().enumerate().filter(|(_, valid)| !valid).map(|(i, _)| i) {
        values[i] = NAT;
    }
    Ok(values)
}
