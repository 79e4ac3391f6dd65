//! The forwarding table from `DatetimeTzIndex` to its array.
//!
//! Every delegated operation is listed here once, with its boxing rule:
//!
//! - `boxed`: the array result is wrapped back into an index with the name
//!   pinned and freq kept or reset per its [`FreqRule`].
//! - `raw`: the array result is returned as-is.
//!
//! The wrappers are generated at compile time; nothing is looked up by name at
//! call time.

use crate::arith::{Dispatch, Operand};
use crate::column::{CmpOp, LocalizeOptions, Repeats};
use crate::error::Result;
use crate::index::DatetimeTzIndex;
use crate::null_handling::Mask;
use crate::types::{Freq, TimeZoneId, Timestamp};

/// What happens to `freq` when an operation is boxed back into an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreqRule {
    Keep,
    Reset,
}

macro_rules! delegate_boxed {
    (
        fallible {
            $( $(#[$fm:meta])* fn $fname:ident( $($farg:ident : $fty:ty),* ) => $frule:ident; )*
        }
        infallible {
            $( $(#[$im:meta])* fn $iname:ident( $($iarg:ident : $ity:ty),* ) => $irule:ident; )*
        }
    ) => {
        impl DatetimeTzIndex {
            $(
                $(#[$fm])*
                pub fn $fname(&self, $($farg: $fty),*) -> Result<DatetimeTzIndex> {
                    let data = self.data.$fname($($farg),*)?;
                    Ok(self.rewrap(data, FreqRule::$frule, stringify!($fname)))
                }
            )*
            $(
                $(#[$im])*
                pub fn $iname(&self, $($iarg: $ity),*) -> DatetimeTzIndex {
                    let data = self.data.$iname($($iarg),*);
                    self.rewrap(data, FreqRule::$irule, stringify!($iname))
                }
            )*
        }
    };
}

macro_rules! delegate_raw {
    ( $( $(#[$m:meta])* fn $name:ident( $($arg:ident : $ty:ty),* ) -> $ret:ty; )* ) => {
        impl DatetimeTzIndex {
            $(
                $(#[$m])*
                pub fn $name(&self, $($arg: $ty),*) -> $ret {
                    self.data.$name($($arg),*)
                }
            )*
        }
    };
}

delegate_boxed! {
    fallible {
        /// Same instants in another zone.
        fn tz_convert(tz: TimeZoneId) => Keep;
        fn tz_localize(tz: Option<TimeZoneId>, options: LocalizeOptions) => Reset;
        fn normalize(options: LocalizeOptions) => Reset;
        fn floor(freq: Freq, options: LocalizeOptions) => Reset;
        fn ceil(freq: Freq, options: LocalizeOptions) => Reset;
        fn round(freq: Freq, options: LocalizeOptions) => Reset;
        fn where_(cond: &Mask, other: Option<Timestamp>) => Reset;
        fn fillna(value: Timestamp) => Reset;
        fn repeat(repeats: Repeats<'_>) => Reset;
    }
    infallible {
        fn unique() => Reset;
        fn dropna() => Reset;
    }
}

delegate_raw! {
    fn asi8() -> &[i64];
    fn year() -> Vec<Option<i64>>;
    fn month() -> Vec<Option<i64>>;
    fn day() -> Vec<Option<i64>>;
    fn hour() -> Vec<Option<i64>>;
    fn minute() -> Vec<Option<i64>>;
    fn second() -> Vec<Option<i64>>;
    fn microsecond() -> Vec<Option<i64>>;
    fn nanosecond() -> Vec<Option<i64>>;
    fn dayofweek() -> Vec<Option<i64>>;
    fn dayofyear() -> Vec<Option<i64>>;
    fn wall_values() -> Result<Vec<i64>>;
    fn min() -> Timestamp;
    fn max() -> Timestamp;
    fn argmin() -> i64;
    fn argmax() -> i64;
    fn argsort(ascending: bool) -> Vec<usize>;
    fn isin(values: &[Timestamp]) -> Result<Mask>;
    fn compare(other: Operand<'_>, op: CmpOp) -> Result<Dispatch<Mask>>;
    /// Elementwise NaT mask, cached on the array.
    fn missing_mask() -> &Mask;
    fn count_missing() -> usize;
    fn is_monotonic_increasing() -> bool;
    fn is_monotonic_decreasing() -> bool;
}
