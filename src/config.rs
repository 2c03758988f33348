//! Command-line configuration.
//!
//! `Cli` is the raw clap surface; [`Config`] is the validated form the rest
//! of the binary works from.

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{ArgAction, Parser, ValueEnum};

use crate::data::filter::CountyFilter;
use crate::pipeline::metric::MetricKind;
use crate::pipeline::units::{PowerUnit, WaterUnit};

/// Where the published dataset lives relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "CountyLevelMetrics.mat";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Statistics and facility summary for a terminal.
    #[default]
    Text,
    /// One row per classified county.
    Csv,
    /// Full report including cutoffs and counties.
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "impact-explorer",
    version,
    about = "Classify U.S. counties by carbon, water and water-scarcity footprint"
)]
pub struct Cli {
    /// County metrics file (.mat, .parquet, .json or .csv).
    #[arg(long, env = "IMPACT_DATA", default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// State name or postal abbreviation, or USA for the whole country.
    #[arg(long, default_value = "USA")]
    pub state: String,

    /// carbon, water or scarcity (full metric names are accepted too).
    #[arg(long, default_value = "carbon")]
    pub metric: MetricKind,

    /// On-site power consumption; leave empty to skip the facility summary.
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub power: String,

    /// kWh/yr, kWh/mo, kW or MW.
    #[arg(long, default_value = "kWh/yr")]
    pub power_unit: PowerUnit,

    /// On-site water consumption; leave empty to skip the facility summary.
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub water: String,

    /// L/yr, L/mo, L/s, gpm or gal/mo.
    #[arg(long, default_value = "L/yr")]
    pub water_unit: WaterUnit,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write the report here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the selectable states and exit.
    #[arg(long)]
    pub list_states: bool,

    /// Disable coloured terminal output.
    #[arg(long)]
    pub no_color: bool,

    /// -v for info, -vv for debug logging (RUST_LOG overrides).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Validated run configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_path: PathBuf,
    pub filter: CountyFilter,
    pub metric: MetricKind,
    pub power_text: String,
    pub power_unit: PowerUnit,
    pub water_text: String,
    pub water_unit: WaterUnit,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub color: bool,
}

impl Cli {
    pub fn into_config(self) -> Result<Config> {
        let filter = CountyFilter::from_selector(&self.state).ok_or_else(|| {
            anyhow!(
                "unknown state '{}' (use --list-states to see valid names)",
                self.state
            )
        })?;
        Ok(Config {
            data_path: self.data,
            filter,
            metric: self.metric,
            power_text: self.power,
            power_unit: self.power_unit,
            water_text: self.water,
            water_unit: self.water_unit,
            format: self.format,
            color: color_enabled(
                self.no_color,
                self.output.is_some(),
                std::io::stdout().is_terminal(),
            ),
            output: self.output,
        })
    }

    /// Default log filter for the chosen verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

/// ANSI colour goes only to an interactive stdout.
fn color_enabled(no_color: bool, to_file: bool, stdout_is_terminal: bool) -> bool {
    !no_color && !to_file && stdout_is_terminal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["impact-explorer"]).unwrap();
        assert_eq!(cli.log_level(), "warn");
        let config = cli.into_config().unwrap();
        assert_eq!(config.filter, CountyFilter::WholeCountry);
        assert_eq!(config.metric, MetricKind::CarbonFootprint);
        assert_eq!(config.power_unit, PowerUnit::KwhPerYear);
        assert_eq!(config.water_unit, WaterUnit::LitersPerYear);
        assert_eq!(config.format, OutputFormat::Text);
        assert!(config.power_text.is_empty());
    }

    #[test]
    fn full_selection() {
        let cli = Cli::try_parse_from([
            "impact-explorer",
            "--data",
            "metrics.parquet",
            "--state",
            "tx",
            "--metric",
            "scarcity",
            "--power",
            "5",
            "--power-unit",
            "kW",
            "--water",
            "-2",
            "--water-unit",
            "gpm",
            "--format",
            "json",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.log_level(), "debug");
        let config = cli.into_config().unwrap();
        assert!(matches!(config.filter, CountyFilter::State(s) if s.fips == "48"));
        assert_eq!(config.metric, MetricKind::WaterScarcityFootprint);
        assert_eq!(config.water_text, "-2");
        assert_eq!(config.water_unit, WaterUnit::GallonsPerMinute);
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn color_only_for_a_terminal() {
        assert!(color_enabled(false, false, true));
        assert!(!color_enabled(false, false, false));
        assert!(!color_enabled(true, false, true));
        assert!(!color_enabled(false, true, true));

        let cli = Cli::try_parse_from(["impact-explorer", "--output", "out.csv"]).unwrap();
        assert!(!cli.into_config().unwrap().color);
    }

    #[test]
    fn bad_unit_is_a_parse_error() {
        assert!(Cli::try_parse_from(["impact-explorer", "--power-unit", "GW"]).is_err());
    }

    #[test]
    fn unknown_state_is_rejected() {
        let cli = Cli::try_parse_from(["impact-explorer", "--state", "Narnia"]).unwrap();
        assert!(cli.into_config().is_err());
    }
}
