//! Missing-value kernels.
//!
//! Nullity is encoded in-band by the NaT sentinel, so there is no validity
//! buffer to keep in sync. These helpers derive bitsets from the sentinel and
//! translate to and from Arrow's `NullBuffer` at the bridge boundary.

pub mod bitmap;


/// Elementwise boolean results (missing masks, comparison results).
pub type Mask = bitvec::vec::BitVec;

pub use bitmap::{any_missing, apply_validity, count_missing, missing_mask, validity_buffer};
