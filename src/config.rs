// In: src/config.rs

//! The single source of truth for chronocol's behavioral knobs.
//!
//! `ChronocolConfig` is created once at the application boundary (from a JSON
//! document or `Default`) and handed to the constructors and the index adapter
//! as a shared, read-only `Arc<ChronocolConfig>`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::timezone::{AmbiguousPolicy, NonexistentPolicy, TimeZoneId};

//==================================================================================
// I. The Unified Config
//==================================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct ChronocolConfig {
    /// Zone attached by `from_sequence_with` when the caller passes no tz and
    /// none can be inferred from the inputs. `None` keeps such data naive.
    #[serde(default)]
    pub default_tz: Option<String>,

    /// Resolution of wall times that occur twice (DST fall-back).
    #[serde(default)]
    pub ambiguous: AmbiguousPolicy,

    /// Resolution of wall times skipped by a DST gap.
    #[serde(default)]
    pub nonexistent: NonexistentPolicy,

    /// If true, `take` serves arithmetic-progression indexers as slices.
    /// Results are identical either way.
    #[serde(default = "default_true")]
    pub detect_contiguous_take: bool,

    /// chrono strftime pattern used by the index summary.
    #[serde(default = "default_summary_datetime_format")]
    pub summary_datetime_format: String,

    /// Minimum number of evenly spaced values before a freq is inferred.
    #[serde(default = "default_min_periods_for_freq_inference")]
    pub min_periods_for_freq_inference: usize,
}

impl Default for ChronocolConfig {
    fn default() -> Self {
        Self {
            default_tz: None,
            ambiguous: AmbiguousPolicy::default(),
            nonexistent: NonexistentPolicy::default(),
            detect_contiguous_take: true,
            summary_datetime_format: default_summary_datetime_format(),
            min_periods_for_freq_inference: default_min_periods_for_freq_inference(),
        }
    }
}

impl ChronocolConfig {
    /// Parses a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Resolves `default_tz`, if set.
    pub fn default_timezone(&self) -> Result<Option<TimeZoneId>> {
        self.default_tz
            .as_deref()
            .map(TimeZoneId::parse)
            .transpose()
    }
}

/// Helper for `serde` to default a boolean field to true.
fn default_true() -> bool {
    true
}

fn default_summary_datetime_format() -> String {
    "%Y-%m-%d %H:%M:%S%:z".to_string()
}

fn default_min_periods_for_freq_inference() -> usize {
    3
}
