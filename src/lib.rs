//! This file is the root of the `chronocol` Rust crate.
//!
//! chronocol implements a timezone-aware temporal column: a dense buffer of
//! UTC nanoseconds (with an in-band NaT sentinel) tagged by a `(unit, tz)`
//! dtype, an index adapter that adds name and freq metadata on top of it, and
//! an arithmetic dispatch layer that boxes results into the right column type.
//!
//! Its responsibilities here are strictly limited to:
//! 1.  Declaring all the top-level modules of our library.
//! 2.  Re-exporting the types most callers need.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
//==================================================================================
// 1. Module Declarations
//==================================================================================
pub mod arith;
pub mod bridge;
pub mod column;
pub mod config;
pub mod error;
pub mod index;
pub mod kernels;
pub mod null_handling;
pub mod observability;
pub mod types;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================
pub use arith::{ArithOutput, ArithmeticDispatch, Dispatch, Operand};
pub use column::{
    CmpOp, DatetimeTzArray, DurationArray, ExtensionColumn, Indexer, InstantLike, Item,
    LocalizeOptions,
};
pub use config::ChronocolConfig;
pub use error::{ChronocolError, Result};
pub use index::{DatetimeTzIndex, DurationIndex, IndexArithOutput, Loc, Mapped};
pub use observability::enable_verbose_logging;
pub use types::{
    AmbiguousPolicy, DatetimeTzDtype, Duration, Freq, NonexistentPolicy, TimeZoneId, Timestamp, NAT,
};
