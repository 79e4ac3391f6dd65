//! This module contains the pure, stateless kernels that operate on raw `i64`
//! buffers. Every kernel treats [`crate::types::NAT`] as "missing": it is never
//! ordered, never compared, and always propagated through arithmetic.
//!
//! Nothing in here knows about dtypes or timezones; the column layer owns that.

pub mod arith;
pub mod reduce;
pub mod sort;
pub mod take;

pub use take::{Repeats, SliceSpec, StridedRange};
