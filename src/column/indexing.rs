//! Positional access: `get`, `take`, `repeat`, concatenation and
//! factorization.

use hashbrown::HashMap;

use crate::column::{DatetimeTzArray, Indexer, Item};
use crate::error::{ChronocolError, Result};
use crate::kernels::{self, take::StridedRange, Repeats, SliceSpec};
use crate::null_handling::{self, Mask};
use crate::types::{is_nat, Timestamp, NAT};

impl DatetimeTzArray {
    /// Scalar for a position, column otherwise.
    pub fn get(&self, indexer: &Indexer) -> Result<Item<Timestamp, Self>> {
        match indexer {
            Indexer::Position(i) => {
                let pos = kernels::take::normalize_position(*i, self.len())?;
                Ok(Item::Scalar(self.box_value(self.data[pos])))
            }
            Indexer::Slice(spec) => self.slice(spec).map(Item::Column),
            Indexer::Mask(mask) => self.filter(mask).map(Item::Column),
            Indexer::Positions(positions) => self.take(positions, false, None).map(Item::Column),
        }
    }

    /// Python-style slice. Step 1 shares the underlying buffer.
    pub fn slice(&self, spec: &SliceSpec) -> Result<Self> {
        let range = kernels::take::resolve_slice(spec, self.len())?;
        Ok(self.gather_range(&range))
    }

    pub(crate) fn gather_range(&self, range: &StridedRange) -> Self {
        if range.step == 1 {
            self.with_values(self.data.slice(range.start, range.count))
        } else {
            self.with_values(kernels::take::gather_strided(&self.data, range))
        }
    }

    /// Boolean selection. The mask must be as long as the column.
    pub fn filter(&self, mask: &Mask) -> Result<Self> {
        if mask.len() != self.len() {
            return Err(ChronocolError::InvalidValue(format!(
                "boolean index has length {} but the column has length {}",
                mask.len(),
                self.len()
            )));
        }
        let values: Vec<i64> = null_handling::bitmap::set_positions(mask)
            .into_iter()
            .map(|i| self.data[i])
            .collect();
        Ok(self.with_values(values))
    }

    /// Gathers `indices`. See [`Self::take_with`] for the progression fast path.
    pub fn take(&self, indices: &[i64], allow_fill: bool, fill_value: Option<Timestamp>) -> Result<Self> {
        self.take_with(indices, allow_fill, fill_value, true)
    }

    /// With `allow_fill`, `-1` yields `fill_value` (NaT by default) and any other
    /// negative index is out of bounds. Without it, negative indices wrap.
    ///
    /// If `detect_contiguous` is set and `indices` form an in-bounds arithmetic
    /// progression, the take is served as a slice.
    pub fn take_with(
        &self,
        indices: &[i64],
        allow_fill: bool,
        fill_value: Option<Timestamp>,
        detect_contiguous: bool,
    ) -> Result<Self> {
        // The fill is only validated when it can be used.
        let fill = match fill_value {
            Some(ts) if allow_fill => self.unbox_fill(&ts)?,
            _ => NAT,
        };

        if detect_contiguous {
            if let Some(range) = kernels::take::maybe_indices_to_slice(indices, self.len()) {
                log::debug!(
                    "take: {} indices served as slice start={} step={}",
                    indices.len(),
                    range.start,
                    range.step
                );
                return Ok(self.gather_range(&range));
            }
        }

        let values = if allow_fill {
            kernels::take::take_with_fill(&self.data, indices, fill)?
        } else {
            kernels::take::take_wrapping(&self.data, indices)?
        };
        Ok(self.with_values(values))
    }

    /// Validates a scalar against this dtype and returns its physical value.
    pub(crate) fn unbox_fill(&self, value: &Timestamp) -> Result<i64> {
        if value.is_nat() {
            return Ok(NAT);
        }
        if value.tz() != self.tz() {
            return Err(ChronocolError::TypeMismatch(format!(
                "cannot use {} as a value for a column with dtype {}",
                value, self.dtype
            )));
        }
        Ok(value.value())
    }

    pub fn repeat(&self, repeats: Repeats<'_>) -> Result<Self> {
        Ok(self.with_values(kernels::take::repeat(&self.data, repeats)?))
    }

    /// Concatenates columns that share an identical dtype.
    pub fn concat_same_type(to_concat: &[&Self]) -> Result<Self> {
        let first = to_concat
            .first()
            .ok_or_else(|| ChronocolError::InvalidValue("need at least one column to concatenate".into()))?;
        if to_concat.iter().any(|c| c.dtype != first.dtype) {
            return Err(ChronocolError::InvalidValue("to_concat must have the same tz".into()));
        }
        let total = to_concat.iter().map(|c| c.len()).sum();
        let mut values = Vec::with_capacity(total);
        for column in to_concat {
            values.extend_from_slice(&column.data);
        }
        Ok(first.with_values(values))
    }

    /// Codes into the distinct non-NaT values, in order of first appearance.
    /// NaT gets code `-1`.
    pub fn factorize(&self) -> (Vec<i64>, Self) {
        let mut seen: HashMap<i64, i64> = HashMap::new();
        let mut uniques = Vec::new();
        let codes = self
            .data
            .iter()
            .map(|&v| {
                if is_nat(v) {
                    return -1;
                }
                *seen.entry(v).or_insert_with(|| {
                    uniques.push(v);
                    (uniques.len() - 1) as i64
                })
            })
            .collect();
        (codes, self.with_values(uniques))
    }

    /// Inverse of [`Self::factorize`].
    pub fn from_factorized(codes: &[i64], original: &Self) -> Result<Self> {
        let values = kernels::take::take_with_fill(&original.data, codes, NAT)?;
        Ok(original.with_values(values))
    }

    /// Distinct values in order of first appearance; a single NaT is kept if
    /// any is present.
    pub fn unique(&self) -> Self {
        let mut seen = hashbrown::HashSet::new();
        let values: Vec<i64> = self.data.iter().copied().filter(|v| seen.insert(*v)).collect();
        self.with_values(values)
    }
}
