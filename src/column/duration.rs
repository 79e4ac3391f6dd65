//! `DurationArray`: the column type produced by datetime differences.
//!
//! Same physical layout as [`DatetimeTzArray`] (dense `i64` nanoseconds, NaT
//! in-band) with a fixed `timedelta64[ns]` dtype.

use std::fmt;
use std::sync::OnceLock;

use arrow::buffer::ScalarBuffer;

use crate::column::{ExtensionColumn, Indexer, Item};
use crate::error::{ChronocolError, Result};
use crate::kernels;
use crate::null_handling::{self, Mask};
use crate::types::{is_nat, Duration, TimedeltaDtype, NAT};

#[derive(Debug, Clone)]
pub struct DurationArray {
    pub(super) data: ScalarBuffer<i64>,
    missing_cache: OnceLock<Mask>,
}

impl DurationArray {
    pub fn simple_new(data: impl Into<ScalarBuffer<i64>>) -> Self {
        Self {
            data: data.into(),
            missing_cache: OnceLock::new(),
        }
    }

    pub fn from_nanos(values: Vec<i64>) -> Self {
        Self::simple_new(values)
    }

    pub fn from_durations(durations: &[Duration]) -> Self {
        Self::simple_new(durations.iter().map(|d| d.nanos()).collect::<Vec<i64>>())
    }

    pub fn dtype(&self) -> TimedeltaDtype {
        TimedeltaDtype
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn asi8(&self) -> &[i64] {
        &self.data
    }

    pub fn missing_mask(&self) -> &Mask {
        self.missing_cache
            .get_or_init(|| null_handling::missing_mask(&self.data))
    }

    pub fn box_value(&self, value: i64) -> Duration {
        if is_nat(value) {
            return Duration::nat();
        }
        Duration::from_nanos(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = Duration> + '_ {
        self.data.iter().map(|v| self.box_value(*v))
    }

    pub fn to_durations(&self) -> Vec<Duration> {
        self.iter().collect()
    }

    /// Elementwise negation; NaT stays NaT.
    pub fn neg(&self) -> Self {
        let values: Vec<i64> = self
            .data
            .iter()
            .map(|&v| if is_nat(v) { NAT } else { -v })
            .collect();
        Self::simple_new(values)
    }
}

impl ExtensionColumn for DurationArray {
    type Scalar = Duration;

    fn len(&self) -> usize {
        self.data.len()
    }

    fn dtype_name(&self) -> String {
        TimedeltaDtype.to_string()
    }

    fn is_missing(&self) -> Mask {
        self.missing_mask().clone()
    }

    fn nbytes(&self) -> usize {
        self.data.len() * std::mem::size_of::<i64>()
    }

    fn copy(&self, deep: bool) -> Self {
        if deep {
            Self::simple_new(self.data.to_vec())
        } else {
            self.clone()
        }
    }

    fn get(&self, indexer: &Indexer) -> Result<Item<Duration, Self>> {
        let values = match indexer {
            Indexer::Position(i) => {
                let pos = kernels::take::normalize_position(*i, self.len())?;
                return Ok(Item::Scalar(self.box_value(self.data[pos])));
            }
            Indexer::Slice(spec) => {
                let range = kernels::take::resolve_slice(spec, self.len())?;
                kernels::take::gather_strided(&self.data, &range)
            }
            Indexer::Mask(mask) => {
                if mask.len() != self.len() {
                    return Err(ChronocolError::InvalidValue(format!(
                        "boolean index has length {} but the column has length {}",
                        mask.len(),
                        self.len()
                    )));
                }
                null_handling::bitmap::set_positions(mask)
                    .into_iter()
                    .map(|i| self.data[i])
                    .collect()
            }
            Indexer::Positions(positions) => kernels::take::take_wrapping(&self.data, positions)?,
        };
        Ok(Item::Column(Self::simple_new(values)))
    }

    fn take(&self, indices: &[i64], allow_fill: bool, fill_value: Option<Duration>) -> Result<Self> {
        let values = if allow_fill {
            let fill = fill_value.map_or(NAT, |d| d.nanos());
            kernels::take::take_with_fill(&self.data, indices, fill)?
        } else {
            kernels::take::take_wrapping(&self.data, indices)?
        };
        Ok(Self::simple_new(values))
    }

    fn concat_same_type(to_concat: &[&Self]) -> Result<Self> {
        if to_concat.is_empty() {
            return Err(ChronocolError::InvalidValue(
                "need at least one column to concatenate".into(),
            ));
        }
        let values: Vec<i64> = to_concat.iter().flat_map(|c| c.data.iter().copied()).collect();
        Ok(Self::simple_new(values))
    }

    fn from_factorized(codes: &[i64], original: &Self) -> Result<Self> {
        Ok(Self::simple_new(kernels::take::take_with_fill(&original.data, codes, NAT)?))
    }
}

impl PartialEq for DurationArray {
    fn eq(&self, other: &Self) -> bool {
        self.data[..] == other.data[..]
    }
}

impl fmt::Display for DurationArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<DurationArray>")?;
        let rendered: Vec<String> = self.iter().map(|d| d.to_string()).collect();
        writeln!(f, "[{}]", rendered.join(", "))?;
        write!(f, "Length: {}, dtype: {}", self.len(), TimedeltaDtype)
    }
}
