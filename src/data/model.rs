use serde::Serialize;

use super::loader::LoadError;
use crate::pipeline::metric::MetricKind;

// ---------------------------------------------------------------------------
// Array names inside the source container
// ---------------------------------------------------------------------------

/// Water scarcity factor (L-eq/kWh).
pub const WATER_SCARCITY_ARRAY: &str = "AWAREUSCF";
/// Carbon intensity (kg CO2e/kWh).
pub const CARBON_INTENSITY_ARRAY: &str = "EFkgkWh";
/// Water footprint intensity (L/kWh).
pub const WATER_INTENSITY_ARRAY: &str = "EWIF";
/// County FIPS code, stored numerically.
pub const COUNTY_FIPS_ARRAY: &str = "CountyFIPS";

/// Every array a dataset file must provide, in load order.
pub const ARRAY_NAMES: [&str; 4] = [
    WATER_SCARCITY_ARRAY,
    CARBON_INTENSITY_ARRAY,
    WATER_INTENSITY_ARRAY,
    COUNTY_FIPS_ARRAY,
];

// ---------------------------------------------------------------------------
// CountyRecord – one position across the four parallel arrays
// ---------------------------------------------------------------------------

/// A single county, re-joined by position from the parallel arrays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountyRecord {
    /// 5-digit zero-padded FIPS code.
    pub county_id: String,
    /// kg CO2e per kWh.
    pub carbon_intensity: f64,
    /// Litres of water per kWh.
    pub water_intensity: f64,
    /// Litres water-equivalent per kWh, scarcity weighted.
    pub water_scarcity_factor: f64,
}

impl CountyRecord {
    /// The record's value for `metric`.
    pub fn value(&self, metric: MetricKind) -> f64 {
        match metric {
            MetricKind::CarbonFootprint => self.carbon_intensity,
            MetricKind::WaterFootprint => self.water_intensity,
            MetricKind::WaterScarcityFootprint => self.water_scarcity_factor,
        }
    }
}

/// Format a numeric FIPS code as a 5-digit zero-padded identifier.
///
/// Codes that are not finite or are negative cannot name a county and
/// yield `None`. Fractional parts are truncated.
pub fn format_fips(code: f64) -> Option<String> {
    if !code.is_finite() || code < 0.0 {
        return None;
    }
    Some(format!("{:05}", code.trunc() as u64))
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The four source arrays, unmodified and of equal length.
///
/// Built once at load time and never mutated afterwards, so it can be
/// shared behind an `Arc` by any number of sessions.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    water_scarcity: Vec<f64>,
    carbon_intensity: Vec<f64>,
    water_intensity: Vec<f64>,
    county_fips: Vec<f64>,
}

impl Dataset {
    /// Assemble a dataset, rejecting arrays of unequal length.
    pub fn from_arrays(
        water_scarcity: Vec<f64>,
        carbon_intensity: Vec<f64>,
        water_intensity: Vec<f64>,
        county_fips: Vec<f64>,
    ) -> Result<Self, LoadError> {
        let n = county_fips.len();
        let lengths = [
            (WATER_SCARCITY_ARRAY, water_scarcity.len()),
            (CARBON_INTENSITY_ARRAY, carbon_intensity.len()),
            (WATER_INTENSITY_ARRAY, water_intensity.len()),
        ];
        for (name, len) in lengths {
            if len != n {
                return Err(LoadError::Schema(format!(
                    "array '{name}' has {len} values but '{COUNTY_FIPS_ARRAY}' has {n}"
                )));
            }
        }
        Ok(Dataset {
            water_scarcity,
            carbon_intensity,
            water_intensity,
            county_fips,
        })
    }

    /// Shared length N of the four arrays.
    pub fn len(&self) -> usize {
        self.county_fips.len()
    }

    /// Whether the dataset has no counties.
    pub fn is_empty(&self) -> bool {
        self.county_fips.is_empty()
    }

    /// Raw values of the array backing `metric`.
    pub fn values(&self, metric: MetricKind) -> &[f64] {
        match metric {
            MetricKind::CarbonFootprint => &self.carbon_intensity,
            MetricKind::WaterFootprint => &self.water_intensity,
            MetricKind::WaterScarcityFootprint => &self.water_scarcity,
        }
    }

    /// Raw numeric FIPS codes.
    pub fn county_fips(&self) -> &[f64] {
        &self.county_fips
    }

    /// The record at `index`, if it exists and its FIPS code is usable.
    pub fn record(&self, index: usize) -> Option<CountyRecord> {
        let county_id = format_fips(*self.county_fips.get(index)?)?;
        Some(CountyRecord {
            county_id,
            carbon_intensity: self.carbon_intensity[index],
            water_intensity: self.water_intensity[index],
            water_scarcity_factor: self.water_scarcity[index],
        })
    }

    /// All identifiable records in source order.
    pub fn records(&self) -> impl Iterator<Item = CountyRecord> + '_ {
        (0..self.len()).filter_map(|i| self.record(i))
    }
}
