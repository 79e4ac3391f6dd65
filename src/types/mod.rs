//! This module defines the core, strongly-typed temporal representations used
//! throughout chronocol: the physical unit and its NaT sentinel, timezone
//! identities, the `(unit, tz)` dtype, boxed scalars, and the freq descriptor.

pub mod dtype;
pub mod freq;
pub mod scalar;
pub mod timezone;
pub mod unit;

// Re-export the main type(s) for easier access.
pub use dtype::{DatetimeTzDtype, TimedeltaDtype};
pub use freq::Freq;
pub use scalar::{Duration, Timestamp};
pub use timezone::{AmbiguousPolicy, NonexistentPolicy, TimeZoneId};
pub use unit::{is_nat, TimeUnit, NAT};
