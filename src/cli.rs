//! Command-line harness for the two engines.
//!
//! Stands in for a production ingress service during local testing and
//! exploration: it loads a JSON job fixture, invokes the library, and
//! writes the result as JSON. A `--config` flag (default `config.toml`)
//! layers in defaults under any per-field overrides embedded in the job
//! file.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config::{EstimatorConfig, LocateConfig};
use crate::error::LocatorError;
use crate::io::read_json_file;
use crate::{delay, locate};

#[derive(Parser, Debug)]
#[command(name = "seismic-core-cli", about = "Delay estimation and event location engines")]
pub struct Cli {
    /// Job-configuration defaults, layered under any `config` object
    /// embedded in the job file itself.
    #[arg(long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the Delay Estimator over a signal block.
    EstimateDelays {
        /// JSON job fixture (see `EstimateDelaysJob`).
        #[arg(long)]
        input: PathBuf,
        /// Output path; defaults to stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Run the Localization Engine over a batch of events.
    LocateEvents {
        /// JSON job fixture (see `LocateEventsJob`).
        #[arg(long)]
        input: PathBuf,
        /// Output path; defaults to stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// `estimate_delays` job fixture shape.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateDelaysJob {
    pub station_count: usize,
    pub sample_count: usize,
    pub signals: Vec<f32>,
    #[serde(default)]
    pub config: Option<EstimatorConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateDelaysResult {
    pub real_delays: Vec<i32>,
}

/// `locate_events` job fixture shape.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocateEventsJob {
    pub model: Vec<f32>,
    pub layer_count: usize,
    pub real_delays: Vec<i32>,
    pub event_count: usize,
    pub coords: Vec<f32>,
    pub station_count: usize,
    pub stations_altitude: f32,
    pub origins: Vec<f32>,
    #[serde(default)]
    pub config: Option<LocateConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocateEventsResult {
    pub best_node: Vec<i32>,
    pub residual: Vec<f32>,
}

/// Defaults layered in from `--config`, used only for job fixtures that
/// omit their own `config` object.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigDefaults {
    estimator: Option<EstimatorConfig>,
    locate: Option<LocateConfig>,
}

fn load_defaults(path: &PathBuf) -> ConfigDefaults {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
            log::warn!("ignoring malformed config file '{}': {}", path.display(), e);
            ConfigDefaults::default()
        }),
        Err(_) => {
            log::debug!("no config file at '{}', using job-embedded config only", path.display());
            ConfigDefaults::default()
        }
    }
}

/// Parse arguments and run the requested subcommand, writing its result
/// to the requested output.
pub fn run() -> Result<(), LocatorError> {
    let cli = Cli::parse();

    match cli.command {
        Command::EstimateDelays { input, output } => {
            let job: EstimateDelaysJob = serde_json::from_str(&read_json_file(
                input.to_str().ok_or_else(|| LocatorError::ValidationError {
                    message: "input path is not valid UTF-8".to_string(),
                })?,
            )?)?;

            let config = job.config.unwrap_or_else(|| {
                load_defaults(&cli.config).estimator.unwrap_or(EstimatorConfig {
                    window_size: 2,
                    scanner_size: 1,
                    min_correlation: 0.5,
                    base_station_index: 0,
                    precision: crate::config::Precision::default(),
                })
            });

            let real_delays =
                delay::estimate_delays(&job.signals, job.station_count, job.sample_count, &config)?;
            write_result(output, &EstimateDelaysResult { real_delays })
        }
        Command::LocateEvents { input, output } => {
            let job: LocateEventsJob = serde_json::from_str(&read_json_file(
                input.to_str().ok_or_else(|| LocatorError::ValidationError {
                    message: "input path is not valid UTF-8".to_string(),
                })?,
            )?)?;

            let config = job.config.ok_or(()).or_else(|_| {
                load_defaults(&cli.config)
                    .locate
                    .ok_or_else(|| LocatorError::ValidationError {
                        message: "no locate config in job file or --config defaults".to_string(),
                    })
            })?;

            let (best_node, residual) = locate::locate_events(
                &job.model,
                job.layer_count,
                &job.real_delays,
                job.event_count,
                &job.coords,
                job.station_count,
                job.stations_altitude,
                &job.origins,
                &config,
            )?;
            write_result(output, &LocateEventsResult { best_node, residual })
        }
    }
}

fn write_result<T: Serialize>(output: Option<PathBuf>, result: &T) -> Result<(), LocatorError> {
    let json = serde_json::to_string_pretty(result)?;
    match output {
        Some(path) => {
            std::fs::write(&path, json)?;
            log::info!("wrote result to '{}'", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
