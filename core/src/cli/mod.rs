pub mod report;

use crate::inference::default_model_path;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for ecgscan
#[derive(Parser, Debug)]
#[command(name = "ecgscan")]
#[command(about = "Digitize a 6x2 12-lead ECG image and classify it")]
#[command(version)]
pub struct Cli {
    /// Path to ECG image file
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    /// Classifier weight file [default: models/ecg_model.json next to the
    /// executable, else relative to the working directory]
    #[arg(short, long, env = "ECGSCAN_MODEL", value_name = "FILE")]
    pub model: Option<PathBuf>,

    /// JSON file overriding the calibrated thresholds (keys MI, STTC, HYP, CD)
    #[arg(short, long, value_name = "FILE")]
    pub thresholds: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Weight file to load, resolving the default location when unset
    pub fn model_path(&self) -> PathBuf {
        self.model.clone().unwrap_or_else(default_model_path)
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON object
    Json,
    /// Human-readable text format
    Text,
}
