use serde::Serialize;

use super::units::{PowerUnit, WaterUnit};

/// A consumption reading as entered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConsumptionInput<U> {
    pub value: f64,
    pub unit: U,
}

/// A facility's consumption normalised to annual figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacilitySummary {
    pub power: ConsumptionInput<PowerUnit>,
    pub water: ConsumptionInput<WaterUnit>,
    pub power_kwh_per_year: f64,
    pub water_liters_per_year: f64,
}

impl FacilitySummary {
    pub fn new(power: ConsumptionInput<PowerUnit>, water: ConsumptionInput<WaterUnit>) -> Self {
        FacilitySummary {
            power,
            water,
            power_kwh_per_year: power.unit.to_kwh_per_year(power.value),
            water_liters_per_year: water.unit.to_liters_per_year(water.value),
        }
    }

    /// Annual impact at a county with the given per-kWh `factor`.
    pub fn annual_impact(&self, factor: f64) -> f64 {
        self.power_kwh_per_year * factor
    }
}

/// Format with thousands separators and no decimals, e.g. `43,800`.
pub fn format_thousands(value: f64) -> String {
    let rounded = format!("{:.0}", value.abs());
    let mut out = String::with_capacity(rounded.len() + rounded.len() / 3);
    for (i, ch) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if value < 0.0 && rounded != "0" {
        out.insert(0, '-');
    }
    out
}
