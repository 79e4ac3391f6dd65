// In: src/bridge/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Bridge Layer
// ====================================================================================
//
// The `bridge` is the boundary between chronocol's own column types and the
// outside world. The core never depends on it; it only translates.
//
// Arrow (export):
//
//   DatetimeTzArray --(to_arrow)--> TimestampNanosecondArray
//         |                             values: the shared ScalarBuffer<i64>
//         |                             nulls:  derived from NaT positions
//         |                             tz:     the dtype's canonical name
//         `--(to_arrow_field)--> Field  Timestamp(Nanosecond, tz), nullable
//
// Arrow (import):
//
//   &dyn Array (Timestamp(unit, tz)) --(from_arrow)--> DatetimeTzArray
//         a. null slots are overwritten with NaT
//         b. coarser units are scaled up to nanoseconds (checked)
//         c. the Arrow tz string is resolved through TimeZoneId::parse
//
// Raw layout:
//
//   DatetimeTzArray <--(as_bytes / from_bytes)--> native-endian i64 bytes
//
// ====================================================================================
pub(crate) mod arrow_impl;
pub(crate) mod bytes;

pub use arrow_impl::{durations_to_arrow, from_arrow, to_arrow, to_arrow_field};
pub use bytes::{as_bytes, from_bytes};

#[cfg(test)]
mod tests;
