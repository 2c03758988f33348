//! Percentile classification of county metric values.
//!
//! A classification is always computed from scratch: cutoffs depend on the
//! selected metric and county filter, so nothing here is cached.

use std::fmt;

use serde::Serialize;

use super::metric::MetricKind;
use crate::data::filter::CountyFilter;
use crate::data::model::Dataset;

/// Percentile separating Low from Medium.
pub const LOW_PERCENTILE: f64 = 33.0;
/// Percentile separating Medium from High.
pub const HIGH_PERCENTILE: f64 = 66.0;

// ---------------------------------------------------------------------------
// Buckets and cutoffs
// ---------------------------------------------------------------------------

/// Impact level of a county relative to its peers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ImpactBucket {
    Low,
    Medium,
    High,
}

impl ImpactBucket {
    pub const ALL: [ImpactBucket; 3] = [ImpactBucket::Low, ImpactBucket::Medium, ImpactBucket::High];

    pub fn label(self) -> &'static str {
        match self {
            ImpactBucket::Low => "Low Impact",
            ImpactBucket::Medium => "Medium Impact",
            ImpactBucket::High => "High Impact",
        }
    }
}

impl fmt::Display for ImpactBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The 33rd and 66th percentile of a cleaned value set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Cutoffs {
    pub low: f64,
    pub high: f64,
}

impl Cutoffs {
    /// Compute cutoffs over `values` (any order). `None` when empty.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Some(Cutoffs {
            low: percentile(&sorted, LOW_PERCENTILE)?,
            high: percentile(&sorted, HIGH_PERCENTILE)?,
        })
    }
}

/// Percentile `p` (0..=100) of an ascending slice with linear interpolation,
/// matching NumPy's default `percentile` method bit for bit.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let virtual_index = (p / 100.0) * last as f64;
    let below = (virtual_index.floor() as usize).min(last);
    let above = (below + 1).min(last);
    let t = virtual_index - below as f64;

    let (a, b) = (sorted[below], sorted[above]);
    let diff = b - a;
    // NumPy interpolates from the nearer neighbour to limit rounding error.
    Some(if t >= 0.5 { b - diff * (1.0 - t) } else { a + diff * t })
}

/// Bucket for `value`. Values equal to a cutoff fall into the lower bucket.
pub fn bucket_for(value: f64, cutoffs: Cutoffs) -> ImpactBucket {
    if value <= cutoffs.low {
        ImpactBucket::Low
    } else if value <= cutoffs.high {
        ImpactBucket::Medium
    } else {
        ImpactBucket::High
    }
}

/// Round to 4 decimal places, ties to even.
pub fn round_display(value: f64) -> f64 {
    (value * 1e4).round_ties_even() / 1e4
}

// ---------------------------------------------------------------------------
// Classification result
// ---------------------------------------------------------------------------

/// One county projected onto the selected metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedRecord {
    pub county_id: String,
    /// Unrounded metric value; buckets are assigned from this.
    pub value: f64,
    /// Value rounded to 4 decimals for display.
    pub display_value: f64,
    pub bucket: ImpactBucket,
}

/// Count and value range of one bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketSummary {
    pub bucket: ImpactBucket,
    pub count: usize,
    pub range: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub metric: MetricKind,
    pub filter: CountyFilter,
    pub cutoffs: Cutoffs,
    /// Records in dataset order.
    pub records: Vec<ClassifiedRecord>,
    /// Counties inside the filter dropped for missing, zero or negative values.
    pub dropped: usize,
}

impl Classification {
    pub fn count(&self, bucket: ImpactBucket) -> usize {
        self.records.iter().filter(|r| r.bucket == bucket).count()
    }

    /// Per-bucket counts with their value ranges, Low first.
    pub fn summary(&self) -> Vec<BucketSummary> {
        let Cutoffs { low, high } = self.cutoffs;
        ImpactBucket::ALL
            .iter()
            .map(|&bucket| BucketSummary {
                bucket,
                count: self.count(bucket),
                range: match bucket {
                    ImpactBucket::Low => format!("≤ {low:.4}"),
                    ImpactBucket::Medium => format!("{low:.4} - {high:.4}"),
                    ImpactBucket::High => format!("> {high:.4}"),
                },
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifyError {
    /// Nothing left to classify once the filter and cleaning ran.
    #[error("no counties with {metric} data for {filter}")]
    EmptyResult { metric: MetricKind, filter: String },
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Classify every county passing `filter` by the selected metric.
///
/// Values that are NaN, infinite, zero or negative are treated as missing and
/// excluded before the cutoffs are computed. Rows whose FIPS code cannot be
/// formatted are skipped.
pub fn classify(
    dataset: &Dataset,
    metric: MetricKind,
    filter: &CountyFilter,
) -> Result<Classification, ClassifyError> {
    let mut kept: Vec<(String, f64)> = Vec::new();
    let mut dropped = 0usize;
    let mut identified = 0usize;

    for record in dataset.records() {
        identified += 1;
        if !filter.matches(&record.county_id) {
            continue;
        }
        let value = record.value(metric);
        if !value.is_finite() || value <= 0.0 {
            dropped += 1;
            continue;
        }
        kept.push((record.county_id, value));
    }

    let unidentified = dataset.len() - identified;
    if unidentified > 0 {
        log::warn!("{unidentified} rows have no usable county FIPS code");
    }

    let values: Vec<f64> = kept.iter().map(|(_, v)| *v).collect();
    let Some(cutoffs) = Cutoffs::from_values(&values) else {
        return Err(ClassifyError::EmptyResult {
            metric,
            filter: filter.to_string(),
        });
    };

    log::debug!(
        "{metric} / {filter}: {} counties kept, {dropped} dropped, cutoffs {:.4} / {:.4}",
        kept.len(),
        cutoffs.low,
        cutoffs.high
    );

    let records = kept
        .into_iter()
        .map(|(county_id, value)| ClassifiedRecord {
            county_id,
            value,
            display_value: round_display(value),
            bucket: bucket_for(value, cutoffs),
        })
        .collect();

    Ok(Classification {
        metric,
        filter: filter.clone(),
        cutoffs,
        records,
        dropped,
    })
}
