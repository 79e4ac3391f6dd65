//! `DatetimeTzArray`: the physical buffer, its dtype, and the per-instance
//! lazy caches.

use std::fmt;
use std::sync::OnceLock;

use arrow::buffer::ScalarBuffer;

use crate::column::{ExtensionColumn, Indexer, Item};
use crate::error::Result;
use crate::kernels;
use crate::null_handling::{self, Mask};
use crate::types::{DatetimeTzDtype, TimeZoneId, Timestamp};

/// A homogeneous, nullable sequence of instants sharing one dtype.
///
/// Immutable under normal use: every operation returns a new array. The
/// caches are filled at most once per instance and never invalidated.
#[derive(Debug, Clone)]
pub struct DatetimeTzArray {
    pub(super) data: ScalarBuffer<i64>,
    pub(super) dtype: DatetimeTzDtype,
    missing_cache: OnceLock<Mask>,
    hasnans_cache: OnceLock<bool>,
    monotonic_cache: OnceLock<(bool, bool)>,
}

impl DatetimeTzArray {
    //==============================================================================
    // Constructors
    //==============================================================================

    /// Low-level constructor with no validation. The caller guarantees that
    /// every value is NaT or a UTC nanosecond instant.
    pub fn simple_new(data: impl Into<ScalarBuffer<i64>>, dtype: DatetimeTzDtype) -> Self {
        Self {
            data: data.into(),
            dtype,
            missing_cache: OnceLock::new(),
            hasnans_cache: OnceLock::new(),
            monotonic_cache: OnceLock::new(),
        }
    }

    /// Wraps raw UTC nanoseconds (NaT allowed) with a `{ns, tz}` dtype.
    pub fn from_i64(values: Vec<i64>, tz: Option<TimeZoneId>) -> Self {
        Self::simple_new(values, DatetimeTzDtype::ns(tz))
    }

    /// A new array with the same dtype over different physical values.
    pub(crate) fn with_values(&self, values: impl Into<ScalarBuffer<i64>>) -> Self {
        Self::simple_new(values, self.dtype)
    }

    //==============================================================================
    // Metadata
    //==============================================================================

    pub fn dtype(&self) -> &DatetimeTzDtype {
        &self.dtype
    }

    pub fn tz(&self) -> Option<&TimeZoneId> {
        self.dtype.tz()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The physical UTC nanoseconds, NaT included.
    pub fn asi8(&self) -> &[i64] {
        &self.data
    }

    /// The shared Arrow buffer (a cheap reference-counted clone).
    pub fn buffer(&self) -> ScalarBuffer<i64> {
        self.data.clone()
    }

    pub fn nbytes(&self) -> usize {
        self.data.len() * std::mem::size_of::<i64>()
    }

    //==============================================================================
    // Missing values
    //==============================================================================

    /// Cached elementwise NaT mask.
    pub fn missing_mask(&self) -> &Mask {
        self.missing_cache
            .get_or_init(|| null_handling::missing_mask(&self.data))
    }

    /// Computed once per instance.
    pub fn has_any_missing(&self) -> bool {
        *self.hasnans_cache.get_or_init(|| {
            match self.missing_cache.get() {
                Some(mask) => mask.any(),
                None => null_handling::any_missing(&self.data),
            }
        })
    }

    pub fn count_missing(&self) -> usize {
        null_handling::count_missing(&self.data)
    }

    //==============================================================================
    // Ordering metadata
    //==============================================================================

    fn monotonic(&self) -> (bool, bool) {
        *self.monotonic_cache.get_or_init(|| {
            (
                kernels::sort::is_monotonic_increasing(&self.data),
                kernels::sort::is_monotonic_decreasing(&self.data),
            )
        })
    }

    /// Non-strict; any NaT makes this false.
    pub fn is_monotonic_increasing(&self) -> bool {
        self.monotonic().0
    }

    pub fn is_monotonic_decreasing(&self) -> bool {
        self.monotonic().1
    }

    //==============================================================================
    // Boxing
    //==============================================================================

    /// Boxes one physical value with this array's timezone attached.
    pub fn box_value(&self, value: i64) -> Timestamp {
        if crate::types::is_nat(value) {
            return Timestamp::nat();
        }
        Timestamp::from_utc_nanos(value, self.dtype.tz().copied())
    }

    pub fn iter(&self) -> impl Iterator<Item = Timestamp> + '_ {
        self.data.iter().map(|v| self.box_value(*v))
    }

    /// Every element boxed, in order.
    pub fn to_timestamps(&self) -> Vec<Timestamp> {
        self.iter().collect()
    }
}

//==================================================================================
// Extension contract
//==================================================================================

impl ExtensionColumn for DatetimeTzArray {
    type Scalar = Timestamp;

    fn len(&self) -> usize {
        self.data.len()
    }

    fn dtype_name(&self) -> String {
        self.dtype.to_string()
    }

    fn is_missing(&self) -> Mask {
        self.missing_mask().clone()
    }

    fn nbytes(&self) -> usize {
        DatetimeTzArray::nbytes(self)
    }

    fn copy(&self, deep: bool) -> Self {
        if deep {
            self.with_values(self.data.to_vec())
        } else {
            self.clone()
        }
    }

    fn get(&self, indexer: &Indexer) -> Result<Item<Timestamp, Self>> {
        DatetimeTzArray::get(self, indexer)
    }

    fn take(&self, indices: &[i64], allow_fill: bool, fill_value: Option<Timestamp>) -> Result<Self> {
        DatetimeTzArray::take(self, indices, allow_fill, fill_value)
    }

    fn concat_same_type(to_concat: &[&Self]) -> Result<Self> {
        DatetimeTzArray::concat_same_type(to_concat)
    }

    fn from_factorized(codes: &[i64], original: &Self) -> Result<Self> {
        DatetimeTzArray::from_factorized(codes, original)
    }
}

/// Same dtype and identical physical buffers, NaT positions included.
impl PartialEq for DatetimeTzArray {
    fn eq(&self, other: &Self) -> bool {
        self.dtype == other.dtype && self.data[..] == other.data[..]
    }
}

impl fmt::Display for DatetimeTzArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<DatetimeTzArray>")?;
        let rendered: Vec<String> = self.iter().map(|ts| ts.to_string()).collect();
        writeln!(f, "[{}]", rendered.join(", "))?;
        write!(f, "Length: {}, dtype: {}", self.len(), self.dtype)
    }
}
