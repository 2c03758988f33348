use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Which intensity array a classification runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum MetricKind {
    #[default]
    CarbonFootprint,
    WaterFootprint,
    WaterScarcityFootprint,
}

impl MetricKind {
    pub const ALL: [MetricKind; 3] = [
        MetricKind::CarbonFootprint,
        MetricKind::WaterFootprint,
        MetricKind::WaterScarcityFootprint,
    ];

    /// Human-readable name, as offered to users.
    pub fn label(self) -> &'static str {
        match self {
            MetricKind::CarbonFootprint => "carbon footprint",
            MetricKind::WaterFootprint => "scope 1 & 2 water footprint",
            MetricKind::WaterScarcityFootprint => "water scarcity footprint",
        }
    }

    /// Unit of the per-county factor.
    pub fn unit(self) -> &'static str {
        match self {
            MetricKind::CarbonFootprint => "kg CO2e/kWh",
            MetricKind::WaterFootprint => "L/kWh",
            MetricKind::WaterScarcityFootprint => "L-eq/kWh",
        }
    }

    /// Unit of a facility's annual impact: the factor unit times kWh/year.
    pub fn annual_unit(self) -> &'static str {
        match self {
            MetricKind::CarbonFootprint => "kg CO2e/year",
            MetricKind::WaterFootprint => "L/year",
            MetricKind::WaterScarcityFootprint => "L-eq/year",
        }
    }

    /// Label in title case, for headings.
    pub fn title(self) -> String {
        self.label()
            .split(' ')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown metric '{0}' (expected carbon, water or scarcity)")]
pub struct UnknownMetric(pub String);

impl FromStr for MetricKind {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        if let Some(m) = MetricKind::ALL.iter().find(|m| m.label() == key) {
            return Ok(*m);
        }
        match key.as_str() {
            "carbon" | "co2" => Ok(MetricKind::CarbonFootprint),
            "water" => Ok(MetricKind::WaterFootprint),
            "scarcity" | "water-scarcity" => Ok(MetricKind::WaterScarcityFootprint),
            _ => Err(UnknownMetric(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_names_and_labels() {
        assert_eq!("carbon".parse::<MetricKind>().unwrap(), MetricKind::CarbonFootprint);
        assert_eq!(
            "Scope 1 & 2 Water Footprint".parse::<MetricKind>().unwrap(),
            MetricKind::WaterFootprint
        );
        assert_eq!("scarcity".parse::<MetricKind>().unwrap(), MetricKind::WaterScarcityFootprint);
        assert!("noise".parse::<MetricKind>().is_err());
    }

    #[test]
    fn title_case() {
        assert_eq!(MetricKind::WaterFootprint.title(), "Scope 1 & 2 Water Footprint");
        assert_eq!(MetricKind::CarbonFootprint.title(), "Carbon Footprint");
    }
}
