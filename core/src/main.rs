use clap::error::ErrorKind;
use clap::Parser;
use ecgscan_core::cli::{Cli, OutputFormat};
use ecgscan_core::{
    AnalysisReport, EcgAnalysis, EcgAnalyzer, EcgError, ErrorReport, LinearGraphModel, TextReport,
    ThresholdTable,
};
use log::{error, info};
use std::process;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            ErrorKind::MissingRequiredArgument => {
                exit_with(ErrorReport::new("No image path provided"))
            }
            _ => exit_with(ErrorReport::new(usage_error(&e))),
        },
    };

    // Setup logging (stderr; stdout carries the single result object)
    setup_logging(cli.verbose);

    match run(&cli) {
        Ok(analysis) => {
            if let Err(e) = output_analysis(&analysis, cli.format) {
                fail(&e);
            }
        }
        Err(e) => fail(&e),
    }
}

fn setup_logging(verbose: bool) {
    if verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }
}

fn run(cli: &Cli) -> ecgscan_core::Result<EcgAnalysis> {
    // Verify image exists before paying for model loading
    if !cli.image.exists() {
        return Err(EcgError::InputNotFound(cli.image.clone()));
    }

    let thresholds = match &cli.thresholds {
        Some(path) => {
            info!("Using threshold overrides from {}", path.display());
            ThresholdTable::from_file(path)?
        }
        None => ThresholdTable::default(),
    };

    let model = LinearGraphModel::load(&cli.model_path())?;
    let analyzer = EcgAnalyzer::new(model, thresholds);
    analyzer.analyze_path(&cli.image)
}

fn output_analysis(analysis: &EcgAnalysis, format: OutputFormat) -> ecgscan_core::Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string(&AnalysisReport::from(analysis))?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            println!("{}", TextReport::new(analysis));
        }
    }
    Ok(())
}

fn fail(e: &EcgError) -> ! {
    error!("{}", e);
    exit_with(ErrorReport::from(e))
}

fn exit_with(report: ErrorReport) -> ! {
    match serde_json::to_string(&report) {
        Ok(json) => println!("{}", json),
        Err(_) => println!("{{\"success\":false,\"error\":\"internal error\"}}"),
    }
    process::exit(1);
}

/// First line of a clap error without its `error: ` prefix
fn usage_error(e: &clap::Error) -> String {
    let rendered = e.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.trim_start_matches("error: ").to_string()
}
