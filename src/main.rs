use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use impact_explorer::config::{Cli, Config, OutputFormat};
use impact_explorer::data::loader::load_file;
use impact_explorer::data::states::STATES;
use impact_explorer::report;
use impact_explorer::state::{Render, Session};

fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .init();

    if cli.list_states {
        println!("USA (whole country)");
        for s in STATES {
            println!("{} ({}, FIPS {})", s.name, s.abbreviation, s.fips);
        }
        return ExitCode::SUCCESS;
    }

    match cli.into_config().and_then(run) {
        Ok(code) => code,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: Config) -> Result<ExitCode> {
    // Without the dataset there is nothing to explore: a load failure ends the session.
    let dataset = load_file(&config.data_path)
        .with_context(|| format!("loading county metrics from {}", config.data_path.display()))?;

    let mut session = Session::new(Arc::new(dataset));
    session.filter = config.filter.clone();
    session.metric = config.metric;
    session.power_text = config.power_text.clone();
    session.power_unit = config.power_unit;
    session.water_text = config.water_text.clone();
    session.water_unit = config.water_unit;

    let render = session.recompute();
    let ready = match &render {
        Render::Rejected(_) => {
            report::write_text(&render, io::stderr().lock(), false)?;
            return Ok(ExitCode::FAILURE);
        }
        Render::Empty(_) => None,
        Render::Ready {
            classification,
            facility,
        } => Some((classification, facility.as_ref())),
    };

    let mut out: Box<dyn Write> = match &config.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    match (ready, config.format) {
        (None, _) | (Some(_), OutputFormat::Text) => {
            report::write_text(&render, &mut out, config.color)?
        }
        (Some((classification, _)), OutputFormat::Csv) => {
            report::write_csv(classification, &mut out)?
        }
        (Some((classification, facility)), OutputFormat::Json) => {
            report::write_json(classification, facility, &mut out)?;
            writeln!(out)?;
        }
    }

    out.flush().context("writing report")?;
    if let Some(path) = &config.output {
        log::info!("Wrote report to {}", path.display());
    }
    Ok(ExitCode::SUCCESS)
}
