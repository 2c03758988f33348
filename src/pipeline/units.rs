//! Facility consumption units and their annual normalisation.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Hours in a (non-leap) year.
pub const HOURS_PER_YEAR: f64 = 8760.0;
/// Minutes in a (non-leap) year.
pub const MINUTES_PER_YEAR: f64 = 525_600.0;
/// Seconds in a (non-leap) year.
pub const SECONDS_PER_YEAR: f64 = 31_536_000.0;
/// Litres per US gallon.
pub const LITERS_PER_GALLON: f64 = 3.78541;
pub const MONTHS_PER_YEAR: f64 = 12.0;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnitError {
    #[error("unknown {quantity} unit '{unit}'")]
    UnknownUnit { quantity: &'static str, unit: String },
}

// ---------------------------------------------------------------------------
// Power
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum PowerUnit {
    #[default]
    KwhPerYear,
    KwhPerMonth,
    Kilowatt,
    Megawatt,
}

impl PowerUnit {
    pub const ALL: [PowerUnit; 4] = [
        PowerUnit::KwhPerYear,
        PowerUnit::KwhPerMonth,
        PowerUnit::Kilowatt,
        PowerUnit::Megawatt,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            PowerUnit::KwhPerYear => "kWh/yr",
            PowerUnit::KwhPerMonth => "kWh/mo",
            PowerUnit::Kilowatt => "kW",
            PowerUnit::Megawatt => "MW",
        }
    }

    /// Convert `value` in this unit to kWh/year.
    pub fn to_kwh_per_year(self, value: f64) -> f64 {
        match self {
            PowerUnit::KwhPerYear => value,
            PowerUnit::KwhPerMonth => value * MONTHS_PER_YEAR,
            PowerUnit::Kilowatt => value * HOURS_PER_YEAR,
            PowerUnit::Megawatt => value * 1000.0 * HOURS_PER_YEAR,
        }
    }
}

impl fmt::Display for PowerUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for PowerUnit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PowerUnit::ALL
            .into_iter()
            .find(|u| u.tag() == s.trim())
            .ok_or_else(|| UnitError::UnknownUnit {
                quantity: "power",
                unit: s.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Water
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum WaterUnit {
    #[default]
    LitersPerYear,
    LitersPerMonth,
    LitersPerSecond,
    GallonsPerMinute,
    GallonsPerMonth,
}

impl WaterUnit {
    pub const ALL: [WaterUnit; 5] = [
        WaterUnit::LitersPerYear,
        WaterUnit::LitersPerMonth,
        WaterUnit::LitersPerSecond,
        WaterUnit::GallonsPerMinute,
        WaterUnit::GallonsPerMonth,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            WaterUnit::LitersPerYear => "L/yr",
            WaterUnit::LitersPerMonth => "L/mo",
            WaterUnit::LitersPerSecond => "L/s",
            WaterUnit::GallonsPerMinute => "gpm",
            WaterUnit::GallonsPerMonth => "gal/mo",
        }
    }

    /// Convert `value` in this unit to litres/year.
    pub fn to_liters_per_year(self, value: f64) -> f64 {
        match self {
            WaterUnit::LitersPerYear => value,
            WaterUnit::LitersPerMonth => value * MONTHS_PER_YEAR,
            WaterUnit::LitersPerSecond => value * SECONDS_PER_YEAR,
            WaterUnit::GallonsPerMinute => value * MINUTES_PER_YEAR * LITERS_PER_GALLON,
            WaterUnit::GallonsPerMonth => value * MONTHS_PER_YEAR * LITERS_PER_GALLON,
        }
    }
}

impl fmt::Display for WaterUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for WaterUnit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WaterUnit::ALL
            .into_iter()
            .find(|u| u.tag() == s.trim())
            .ok_or_else(|| UnitError::UnknownUnit {
                quantity: "water",
                unit: s.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// String-tag entry points
// ---------------------------------------------------------------------------

/// Normalise a power reading given by unit tag to kWh/year.
pub fn normalize_power(value: f64, unit: &str) -> Result<f64, UnitError> {
    Ok(unit.parse::<PowerUnit>()?.to_kwh_per_year(value))
}

/// Normalise a water reading given by unit tag to litres/year.
pub fn normalize_water(value: f64, unit: &str) -> Result<f64, UnitError> {
    Ok(unit.parse::<WaterUnit>()?.to_liters_per_year(value))
}
