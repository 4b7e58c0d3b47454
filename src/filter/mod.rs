//! Segment and numeric range filtering.
//!
//! Filtering is a pure function of the dataset and a [`FilterState`]; the
//! [`FilterController`] in `cascade` sequences it in response to input.

pub mod cascade;
pub mod presets;

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dataset::{Column, Dataset, FundRecord};

pub use cascade::FilterController;
pub use presets::Preset;

/// Which end of a range an input edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundSide {
    Min,
    Max,
}

impl std::str::FromStr for BoundSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "min" => Ok(BoundSide::Min),
            "max" => Ok(BoundSide::Max),
            other => Err(format!("Expected 'min' or 'max', got '{}'", other)),
        }
    }
}

/// Inclusive range, either end optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeConstraint {
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
}

impl RangeConstraint {
    pub fn new(min: Option<Decimal>, max: Option<Decimal>) -> Self {
        Self { min, max }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn set(&mut self, side: BoundSide, value: Option<Decimal>) {
        match side {
            BoundSide::Min => self.min = value,
            BoundSide::Max => self.max = value,
        }
    }

    /// A missing value never satisfies a bound.
    pub fn contains(&self, value: Option<Decimal>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(v) = value else {
            return false;
        };
        self.min.map_or(true, |min| min <= v) && self.max.map_or(true, |max| v <= max)
    }
}

impl fmt::Display for RangeConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |b: Option<Decimal>| b.map(|d| d.normalize().to_string()).unwrap_or_else(|| "-".into());
        write!(f, "[{}, {}]", show(self.min), show(self.max))
    }
}

/// Active segment plus per-column numeric ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub segment: Option<String>,
    /// Ordered by column so evaluation order is fixed.
    pub ranges: BTreeMap<Column, RangeConstraint>,
}

impl FilterState {
    pub fn range(&self, column: Column) -> RangeConstraint {
        self.ranges.get(&column).copied().unwrap_or_default()
    }

    pub fn set_bound(&mut self, column: Column, side: BoundSide, value: Option<Decimal>) {
        let mut range = self.range(column);
        range.set(side, value);
        self.set_range(column, range);
    }

    pub fn set_range(&mut self, column: Column, range: RangeConstraint) {
        if range.is_unbounded() {
            self.ranges.remove(&column);
        } else {
            self.ranges.insert(column, range);
        }
    }

    pub fn clear_ranges(&mut self) {
        self.ranges.clear();
    }

    pub fn matches_ranges(&self, record: &FundRecord) -> bool {
        self.ranges
            .iter()
            .all(|(&column, range)| range.contains(record.number(column)))
    }

    pub fn matches(&self, record: &FundRecord) -> bool {
        let segment_ok = self
            .segment
            .as_deref()
            .map_or(true, |seg| record.segment == seg);
        segment_ok && self.matches_ranges(record)
    }
}

/// Stage 1: indices of rows in the active segment, in original order.
pub fn resolve_segment(dataset: &Dataset, segment: Option<&str>) -> Vec<usize> {
    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, r)| segment.map_or(true, |seg| r.segment == seg))
        .map(|(idx, _)| idx)
        .collect()
}

/// Stage 2: narrow a working set by every range constraint.
pub fn apply_ranges(dataset: &Dataset, working: &[usize], state: &FilterState) -> Vec<usize> {
    let mut rows = working.to_vec();
    for (&column, range) in &state.ranges {
        rows.retain(|&idx| {
            dataset
                .get(idx)
                .is_some_and(|r| range.contains(r.number(column)))
        });
    }
    rows
}
