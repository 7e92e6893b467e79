use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One cleaned sensor export: local civil timestamps with validated values.
///
/// Samples keep file order; they are neither sorted nor deduplicated here.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedSeries {
    pub source_file: String,
    pub column: String,
    pub samples: Vec<(NaiveDateTime, f64)>,
}

impl CleanedSeries {
    pub fn new(source_file: String, column: String, samples: Vec<(NaiveDateTime, f64)>) -> Self {
        Self {
            source_file,
            column,
            samples,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn timestamps(&self) -> impl Iterator<Item = NaiveDateTime> + '_ {
        self.samples.iter().map(|(ts, _)| *ts)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SamplingClass {
    Minute,
    QuarterHour,
    Hour,
    Coarser,
}

impl SamplingClass {
    /// Whether a series of this cadence can be brought onto the 15-minute grid
    pub fn is_aggregatable(&self) -> bool {
        matches!(self, SamplingClass::Minute | SamplingClass::QuarterHour)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SamplingClass::Minute => "minute",
            SamplingClass::QuarterHour => "15min",
            SamplingClass::Hour => "hour",
            SamplingClass::Coarser => "coarser",
        }
    }
}

impl fmt::Display for SamplingClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Sparse quarter-hour values of one sensor, keyed by local civil time.
///
/// `counts` holds the number of raw samples behind each value; keys missing
/// from it count as one sample.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedSeries {
    pub source_file: String,
    pub column: String,
    pub values: BTreeMap<NaiveDateTime, f64>,
    pub counts: BTreeMap<NaiveDateTime, usize>,
}

impl AggregatedSeries {
    pub fn new(source_file: String, column: String, values: BTreeMap<NaiveDateTime, f64>) -> Self {
        Self {
            source_file,
            column,
            values,
            counts: BTreeMap::new(),
        }
    }

    pub fn with_counts(mut self, counts: BTreeMap<NaiveDateTime, usize>) -> Self {
        self.counts = counts;
        self
    }

    /// Value and sample count at a local key
    pub fn weighted(&self, key: &NaiveDateTime) -> Option<(f64, usize)> {
        let value = *self.values.get(key)?;
        Some((value, self.counts.get(key).copied().unwrap_or(1)))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn first_key(&self) -> Option<NaiveDateTime> {
        self.values.keys().next().copied()
    }

    pub fn last_key(&self) -> Option<NaiveDateTime> {
        self.values.keys().next_back().copied()
    }

    pub fn renamed(mut self, column: String) -> Self {
        self.column = column;
        self
    }
}
