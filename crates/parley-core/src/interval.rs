//! Half-open time intervals and interval-set merging

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected interval bounds
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("Invalid interval: start {start} must be finite and before end {end}")]
pub struct InvalidIntervalError {
    pub start: f64,
    pub end: f64,
}

/// Time interval in seconds, `start < end`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawInterval", into = "RawInterval")]
pub struct Interval {
    start: f64,
    end: f64,
}

#[derive(Serialize, Deserialize)]
struct RawInterval {
    start: f64,
    end: f64,
}

impl Interval {
    /// Create a validated interval
    pub fn new(start: f64, end: f64) -> Result<Self, InvalidIntervalError> {
        if !start.is_finite() || !end.is_finite() || start >= end {
            return Err(InvalidIntervalError { start, end });
        }
        Ok(Self { start, end })
    }

    /// Start time in seconds
    pub fn start(&self) -> f64 {
        self.start
    }

    /// End time in seconds
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Length in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Signed intersection length with `[start, end)`.
    ///
    /// Zero or negative when the two spans are disjoint.
    pub fn overlap_with(&self, start: f64, end: f64) -> f64 {
        self.end.min(end) - self.start.max(start)
    }

    /// Signed intersection length with another interval
    pub fn overlap(&self, other: &Interval) -> f64 {
        self.overlap_with(other.start, other.end)
    }
}

impl TryFrom<RawInterval> for Interval {
    type Error = InvalidIntervalError;

    fn try_from(raw: RawInterval) -> Result<Self, Self::Error> {
        Interval::new(raw.start, raw.end)
    }
}

impl From<Interval> for RawInterval {
    fn from(interval: Interval) -> Self {
        Self {
            start: interval.start,
            end: interval.end,
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}-{:.2}", self.start, self.end)
    }
}

/// Merge intervals into a sorted, disjoint, minimal cover.
///
/// Touching intervals (`next.start == current.end`) are coalesced.
pub fn merge(intervals: &[Interval]) -> Vec<Interval> {
    if intervals.is_empty() {
        return Vec::new();
    }

    let mut sorted = intervals.to_vec();
    sorted.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut merged = Vec::with_capacity(sorted.len());
    let mut current = sorted[0];

    for next in sorted.into_iter().skip(1) {
        if next.start <= current.end {
            current.end = current.end.max(next.end);
        } else {
            merged.push(current);
            current = next;
        }
    }

    merged.push(current);
    merged
}

/// Sum of interval lengths (no de-duplication)
pub fn total_length(intervals: &[Interval]) -> f64 {
    intervals.iter().map(Interval::duration).sum()
}
