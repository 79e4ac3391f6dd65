//! The Column Storage Engine.
//!
//! A column owns a dense buffer of physical UTC nanoseconds (an Arrow
//! `ScalarBuffer<i64>`, so slices and shallow copies share memory) plus the
//! dtype that tells us how to box each integer. NaT is encoded in-band.
//!
//! The container-facing contract is the [`ExtensionColumn`] trait; everything
//! datetime-specific lives in inherent methods spread over the submodules.

use crate::error::Result;
use crate::null_handling::Mask;

//==================================================================================
// 1. Module Declarations
//==================================================================================
pub mod construct;

mod datetime;
mod duration;
mod indexing;
mod ops;
mod tz;


//==================================================================================
// 2. Public API Re-exports
//==================================================================================
pub use self::construct::InstantLike;
pub use self::datetime::DatetimeTzArray;
pub use self::duration::DurationArray;
pub use self::ops::CmpOp;
pub use self::tz::LocalizeOptions;
pub use crate::kernels::{Repeats, SliceSpec};

/// What `get` is asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Indexer {
    /// A single position; negative positions count from the end.
    Position(i64),
    Slice(SliceSpec),
    /// Boolean selection; must be exactly as long as the column.
    Mask(Mask),
    /// Positional gather without fill; negative positions wrap.
    Positions(Vec<i64>),
}

/// The result of `get`: a boxed scalar for a position, a column otherwise.
#[derive(Debug, Clone)]
pub enum Item<S, C> {
    Scalar(S),
    Column(C),
}

impl<S, C> Item<S, C> {
    pub fn into_scalar(self) -> Option<S> {
        match self {
            Item::Scalar(s) => Some(s),
            Item::Column(_) => None,
        }
    }

    pub fn into_column(self) -> Option<C> {
        match self {
            Item::Scalar(_) => None,
            Item::Column(c) => Some(c),
        }
    }
}

/// **CONTRACT:** the capability set a columnar container relies on.
///
/// `from_sequence` is not part of the trait; each implementor provides it as an
/// inherent constructor over its own input type.
pub trait ExtensionColumn: Sized {
    /// The boxed form of one element.
    type Scalar;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Human-readable dtype, e.g. `datetime64[ns, UTC]`.
    fn dtype_name(&self) -> String;

    fn is_missing(&self) -> Mask;

    /// Size of the physical buffer in bytes.
    fn nbytes(&self) -> usize;

    /// Shallow copies share the buffer; deep copies reallocate it.
    fn copy(&self, deep: bool) -> Self;

    fn get(&self, indexer: &Indexer) -> Result<Item<Self::Scalar, Self>>;

    fn take(
        &self,
        indices: &[i64],
        allow_fill: bool,
        fill_value: Option<Self::Scalar>,
    ) -> Result<Self>;

    fn concat_same_type(to_concat: &[&Self]) -> Result<Self>;

    /// Rebuilds a column from factorization codes (`-1` = missing).
    fn from_factorized(codes: &[i64], original: &Self) -> Result<Self>;
}
