//! `DurationIndex`: a named wrapper around the durations produced by index
//! subtraction.

use std::fmt;

use crate::column::{DurationArray, ExtensionColumn, Indexer, Item};
use crate::error::Result;
use crate::types::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct DurationIndex {
    data: DurationArray,
    name: Option<String>,
}

impl DurationIndex {
    pub fn new(data: DurationArray) -> Self {
        Self { data, name: None }
    }

    pub fn with_name(data: DurationArray, name: Option<String>) -> Self {
        Self { data, name }
    }

    pub fn array(&self) -> &DurationArray {
        &self.data
    }

    pub fn asi8(&self) -> &[i64] {
        self.data.asi8()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn rename(&self, name: Option<&str>) -> Self {
        Self::with_name(self.data.clone(), name.map(str::to_string))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, indexer: &Indexer) -> Result<Item<Duration, Self>> {
        Ok(match self.data.get(indexer)? {
            Item::Scalar(d) => Item::Scalar(d),
            Item::Column(data) => Item::Column(Self::with_name(data, self.name.clone())),
        })
    }

    pub fn tolist(&self) -> Vec<Duration> {
        self.data.to_durations()
    }
}

impl fmt::Display for DurationIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.data.iter().map(|d| format!("'{}'", d)).collect();
        write!(f, "DurationIndex([{}], dtype='{}'", rendered.join(", "), self.data.dtype())?;
        if let Some(name) = &self.name {
            write!(f, ", name='{}'", name)?;
        }
        f.write_str(")")
    }
}
