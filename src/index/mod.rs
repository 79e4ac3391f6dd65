//! The Index Adapter.
//!
//! `DatetimeTzIndex` owns one [`DatetimeTzArray`] and adds ordered-sequence
//! metadata on top of it: a name, an optional `freq`, and a handful of lazily
//! computed caches. All heavy lifting is forwarded to the array, either by hand
//! (where freq needs care) or through the table in [`delegate`].
//!
//! Freq survives only shape-and-order-preserving affine operations: slices
//! (scaled by the step), `shift`, `± Duration` scalars, `tz_convert`, `copy`
//! and `sort_values`. Everything else resets it.

use std::fmt;
use std::sync::{Arc, OnceLock};

use hashbrown::HashMap;

use crate::column::{DatetimeTzArray, ExtensionColumn, Indexer, InstantLike, Item, LocalizeOptions};
use crate::config::ChronocolConfig;
use crate::error::{ChronocolError, Result};
use crate::kernels;
use crate::types::{DatetimeTzDtype, Duration, Freq, TimeZoneId, Timestamp};

//==================================================================================
// 1. Module Declarations
//==================================================================================
mod arith;
mod delegate;
mod duration;

#[cfg(test)]
mod index_tests;

pub use self::arith::IndexArithOutput;
pub use self::delegate::FreqRule;
pub use self::duration::DurationIndex;

//==================================================================================
// 2. Result Types
//==================================================================================

/// Where a key lives in the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loc {
    Single(usize),
    /// Every matching position, ascending.
    Many(Vec<usize>),
}

/// The outcome of [`DatetimeTzIndex::map`].
#[derive(Debug, Clone, PartialEq)]
pub enum Mapped {
    /// Every mapped value shares one timezone, so the result is still an index.
    Typed(DatetimeTzIndex),
    /// Mixed zones or awareness; the values are returned boxed.
    Boxed(Vec<Timestamp>),
}

//==================================================================================
// 3. The Index
//==================================================================================

#[derive(Debug, Clone)]
pub struct DatetimeTzIndex {
    data: DatetimeTzArray,
    name: Option<String>,
    freq: Option<Freq>,
    config: Arc<ChronocolConfig>,
    inferred_freq_cache: OnceLock<Option<Freq>>,
    engine_cache: OnceLock<HashMap<i64, Vec<usize>>>,
}

impl DatetimeTzIndex {
    //==============================================================================
    // Construction
    //==============================================================================

    pub fn new(data: DatetimeTzArray) -> Self {
        Self::with_config(data, Arc::new(ChronocolConfig::default()))
    }

    pub fn with_config(data: DatetimeTzArray, config: Arc<ChronocolConfig>) -> Self {
        Self {
            data,
            name: None,
            freq: None,
            config,
            inferred_freq_cache: OnceLock::new(),
            engine_cache: OnceLock::new(),
        }
    }

    /// Parses instant-like values with the config's policies and default zone.
    pub fn from_sequence(
        values: &[InstantLike],
        tz: Option<TimeZoneId>,
        config: Arc<ChronocolConfig>,
    ) -> Result<Self> {
        let data = DatetimeTzArray::from_sequence_with(values, tz, &config)?;
        Ok(Self::with_config(data, config))
    }

    /// `periods` instants starting at `start`, `freq` apart. The result
    /// carries `freq`.
    pub fn date_range(start: Timestamp, periods: usize, freq: Freq) -> Result<Self> {
        if start.is_nat() {
            return Err(ChronocolError::InvalidValue("date_range start cannot be NaT".into()));
        }
        let mut values = Vec::with_capacity(periods);
        let mut current = start.value();
        for i in 0..periods {
            if i > 0 {
                current = current
                    .checked_add(freq.step())
                    .filter(|v| !crate::types::is_nat(*v))
                    .ok_or_else(|| ChronocolError::overflow("date_range"))?;
            }
            values.push(current);
        }
        let data = DatetimeTzArray::from_i64(values, start.tz().copied());
        Ok(Self::new(data).with_freq_unchecked(Some(freq)))
    }

    /// A new index over `data` carrying this index's config, with the given
    /// name and freq and fresh caches.
    pub(crate) fn rebuild(&self, data: DatetimeTzArray, name: Option<String>, freq: Option<Freq>) -> Self {
        Self {
            data,
            name,
            freq,
            config: Arc::clone(&self.config),
            inferred_freq_cache: OnceLock::new(),
            engine_cache: OnceLock::new(),
        }
    }

    /// Wraps a derived array with the name pinned and freq set by `rule`.
    pub(crate) fn rewrap(&self, data: DatetimeTzArray, rule: FreqRule, op: &str) -> Self {
        let freq = match rule {
            FreqRule::Keep => self.freq,
            FreqRule::Reset => {
                if self.freq.is_some() {
                    log::debug!("{}: freq reset to None", op);
                }
                None
            }
        };
        self.rebuild(data, self.name.clone(), freq)
    }

    fn with_freq_unchecked(mut self, freq: Option<Freq>) -> Self {
        self.freq = freq;
        self
    }

    /// Attaches a freq after checking that the values conform to it.
    pub fn with_freq(&self, freq: Option<Freq>) -> Result<Self> {
        if let Some(f) = freq {
            if !f.conforms(self.data.asi8()) {
                return Err(ChronocolError::InvalidValue(format!(
                    "Inferred frequency does not conform to passed frequency {}",
                    f
                )));
            }
        }
        Ok(self.rebuild(self.data.clone(), self.name.clone(), freq))
    }

    /// Builder-style name setter.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Same values under a different name.
    pub fn rename(&self, name: Option<&str>) -> Self {
        self.rebuild(self.data.clone(), name.map(str::to_string), self.freq)
    }

    //==============================================================================
    // Metadata
    //==============================================================================

    pub fn array(&self) -> &DatetimeTzArray {
        &self.data
    }

    pub fn into_array(self) -> DatetimeTzArray {
        self.data
    }

    pub fn dtype(&self) -> &DatetimeTzDtype {
        self.data.dtype()
    }

    pub fn tz(&self) -> Option<&TimeZoneId> {
        self.data.tz()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn freq(&self) -> Option<Freq> {
        self.freq
    }

    pub fn freqstr(&self) -> Option<String> {
        self.freq.map(|f| f.freqstr())
    }

    pub fn config(&self) -> &Arc<ChronocolConfig> {
        &self.config
    }

    /// DST policies from this index's config.
    pub fn localize_options(&self) -> LocalizeOptions {
        LocalizeOptions::from(self.config.as_ref())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn has_nans(&self) -> bool {
        self.data.has_any_missing()
    }

    /// Freq inferred from the values, cached per instance.
    pub fn inferred_freq(&self) -> Option<Freq> {
        *self.inferred_freq_cache.get_or_init(|| {
            Freq::infer(self.data.asi8(), self.config.min_periods_for_freq_inference)
        })
    }

    //==============================================================================
    // Indexing
    //==============================================================================

    /// Slices keep freq scaled by the step (dropped if that overflows); masks and
    /// position lists reset it.
    pub fn get(&self, indexer: &Indexer) -> Result<Item<Timestamp, Self>> {
        match indexer {
            Indexer::Position(i) => {
                let pos = kernels::take::normalize_position(*i, self.len())?;
                Ok(Item::Scalar(self.data.box_value(self.data.asi8()[pos])))
            }
            Indexer::Slice(spec) => {
                let range = kernels::take::resolve_slice(spec, self.len())?;
                let freq = self.freq.and_then(|f| f.scaled(range.step).ok());
                let data = self.data.gather_range(&range);
                Ok(Item::Column(self.rebuild(data, self.name.clone(), freq)))
            }
            Indexer::Mask(mask) => {
                let data = self.data.filter(mask)?;
                Ok(Item::Column(self.rewrap(data, FreqRule::Reset, "mask")))
            }
            Indexer::Positions(positions) => self.take(positions, false, None).map(Item::Column),
        }
    }

    pub fn take(&self, indices: &[i64], allow_fill: bool, fill_value: Option<Timestamp>) -> Result<Self> {
        let data = self.data.take_with(
            indices,
            allow_fill,
            fill_value,
            self.config.detect_contiguous_take,
        )?;
        Ok(self.rewrap(data, FreqRule::Reset, "take"))
    }

    /// Shallow or deep copy; name and freq are kept.
    pub fn copy(&self, deep: bool) -> Self {
        self.rebuild(ExtensionColumn::copy(&self.data, deep), self.name.clone(), self.freq)
    }

    /// The name survives only if every input shares it.
    pub fn concat(indexes: &[&Self]) -> Result<Self> {
        let first = indexes
            .first()
            .ok_or_else(|| ChronocolError::InvalidValue("need at least one index to concatenate".into()))?;
        let arrays: Vec<&DatetimeTzArray> = indexes.iter().map(|idx| &idx.data).collect();
        let data = DatetimeTzArray::concat_same_type(&arrays)?;
        let name = if indexes.iter().all(|idx| idx.name == first.name) {
            first.name.clone()
        } else {
            None
        };
        Ok(first.rebuild(data, name, None))
    }

    pub fn append(&self, other: &Self) -> Result<Self> {
        Self::concat(&[self, other])
    }

    /// Codes plus an index of the distinct values.
    pub fn factorize(&self) -> (Vec<i64>, Self) {
        let (codes, uniques) = self.data.factorize();
        (codes, self.rewrap(uniques, FreqRule::Reset, "factorize"))
    }

    //==============================================================================
    // Ordering & shifting
    //==============================================================================

    pub fn sort_values(&self, ascending: bool) -> Self {
        self.sort_values_with_indexer(ascending).0
    }

    /// Sorted index plus the permutation applied. A freq keeps its spacing with
    /// the sign set by the direction.
    pub fn sort_values_with_indexer(&self, ascending: bool) -> (Self, Vec<usize>) {
        let (data, order) = self.data.sort(ascending);
        let freq = self.freq.map(|f| f.oriented(ascending));
        (self.rebuild(data, self.name.clone(), freq), order)
    }

    /// Moves every value by `periods` steps of `freq` (or the index's own).
    pub fn shift(&self, periods: i64, freq: Option<Freq>) -> Result<Self> {
        let step = freq
            .or(self.freq)
            .ok_or_else(|| ChronocolError::InvalidValue("Cannot shift with no freq".into()))?;
        if periods == 0 {
            return Ok(self.clone());
        }
        let delta = step.as_duration().checked_mul(periods)?;
        let values = kernels::arith::add_scalar(self.data.asi8(), delta.nanos())?;
        Ok(self.rebuild(self.data.with_values(values), self.name.clone(), self.freq))
    }

    //==============================================================================
    // Lookup
    //==============================================================================

    /// Same values and dtype. Names and freq are not compared.
    pub fn equals(&self, other: &Self) -> bool {
        self.data.equals(&other.data)
    }

    fn engine(&self) -> &HashMap<i64, Vec<usize>> {
        self.engine_cache.get_or_init(|| {
            let mut engine: HashMap<i64, Vec<usize>> = HashMap::with_capacity(self.len());
            for (i, v) in self.data.asi8().iter().enumerate() {
                engine.entry(*v).or_default().push(i);
            }
            engine
        })
    }

    /// Position(s) of `key`. A NaT key finds the NaT entries.
    pub fn get_loc(&self, key: &Timestamp) -> Result<Loc> {
        if !key.is_nat() && key.is_aware() != self.dtype().is_aware() {
            return Err(ChronocolError::TypeMismatch(format!(
                "Cannot compare tz-naive and tz-aware datetime-like objects: {}",
                key
            )));
        }
        match self.engine().get(&key.value()).map(Vec::as_slice) {
            Some([single]) => Ok(Loc::Single(*single)),
            Some(many) if !many.is_empty() => Ok(Loc::Many(many.to_vec())),
            _ => Err(ChronocolError::KeyNotFound(key.to_string())),
        }
    }

    pub fn contains(&self, key: &Timestamp) -> bool {
        self.get_loc(key).is_ok()
    }

    /// Checks a tolerance against the target it will be applied to. A list
    /// must be a single value or exactly as long as the target.
    pub fn convert_tolerance(&self, tolerance: &[Duration], target_len: usize) -> Result<Vec<Duration>> {
        if tolerance.len() > 1 && tolerance.len() != target_len {
            return Err(ChronocolError::InvalidValue(
                "list-like tolerance size must match target index size".into(),
            ));
        }
        Ok(tolerance.to_vec())
    }

    //==============================================================================
    // Boxing
    //==============================================================================

    pub fn tolist(&self) -> Vec<Timestamp> {
        self.data.to_timestamps()
    }

    /// Every element boxed; the caller owns the heterogeneous container.
    pub fn astype_object(&self) -> Vec<Timestamp> {
        self.tolist()
    }

    /// Applies `f` to every element.
    ///
    /// If every non-NaT result shares one zone (or all are naive) the result
    /// is rebuilt as an index keeping this name. Otherwise the boxed values are
    /// returned as they are.
    pub fn map<F>(&self, f: F) -> Result<Mapped>
    where
        F: Fn(Timestamp) -> Timestamp,
    {
        let mapped: Vec<Timestamp> = self.data.iter().map(f).collect();
        let mut zones = mapped.iter().filter(|ts| !ts.is_nat()).map(|ts| ts.tz().copied());
        let first = zones.next();
        let homogeneous = zones.all(|tz| Some(tz) == first);
        if !homogeneous {
            log::debug!("map: mixed zones in result, returning boxed values");
            return Ok(Mapped::Boxed(mapped));
        }
        let dtype = DatetimeTzDtype::ns(first.flatten().or_else(|| self.tz().copied()));
        let data = DatetimeTzArray::from_timestamps(&mapped, Some(dtype))?;
        Ok(Mapped::Typed(self.rewrap(data, FreqRule::Reset, "map")))
    }

    //==============================================================================
    // Summary
    //==============================================================================

    fn format_for_summary(&self, ts: &Timestamp) -> String {
        let pattern = &self.config.summary_datetime_format;
        if ts.is_aware() {
            ts.format(pattern)
        } else {
            ts.format(&pattern.replace("%:z", ""))
        }
    }

    /// One-line description: entry count and range, plus the freq if set.
    pub fn summary(&self, name: Option<&str>) -> String {
        let head = name.unwrap_or("DatetimeTzIndex");
        let values = self.data.asi8();
        let mut out = match (values.first(), values.last()) {
            (Some(&first), Some(&last)) => format!(
                "{}: {} entries, {} to {}",
                head,
                self.len(),
                self.format_for_summary(&self.data.box_value(first)),
                self.format_for_summary(&self.data.box_value(last))
            ),
            _ => format!("{}: 0 entries", head),
        };
        if let Some(freq) = self.freq {
            out.push_str(&format!("\nFreq: {}", freq));
        }
        out
    }
}

/// Values, dtype, name and freq must all match.
impl PartialEq for DatetimeTzIndex {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data && self.name == other.name && self.freq == other.freq
    }
}

impl fmt::Display for DatetimeTzIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.data.iter().map(|ts| format!("'{}'", ts)).collect();
        write!(f, "DatetimeTzIndex([{}], dtype='{}'", rendered.join(", "), self.dtype())?;
        if let Some(name) = &self.name {
            write!(f, ", name='{}'", name)?;
        }
        match self.freq {
            Some(freq) => write!(f, ", freq='{}')", freq),
            None => write!(f, ", freq=None)"),
        }
    }
}
