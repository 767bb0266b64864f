//! Vitalis CLI - Command-line interface for Vitalis Analytics
//!
//! Commands:
//! - analyze: Compute the analytics report for an input document
//! - validate: Check an input document against the data contract
//! - config: Print the effective engine configuration

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use vitalis_analytics::encoder::ReportEncoder;
use vitalis_analytics::{
    logging, AnalyticsEngine, AnalyticsError, AnalyticsInput, AnalyticsWindow, EngineConfig,
    ENGINE_VERSION,
};

/// Vitalis - Deterministic health and fitness analytics
#[derive(Parser)]
#[command(name = "vitalis")]
#[command(version = ENGINE_VERSION)]
#[command(
    about = "Compute correlations, health scores and insights from daily health data",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the analytics report for an input document
    Analyze {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Analytics window in days (7, 14 or 30); overrides the input's window
        #[arg(long)]
        window: Option<u32>,

        /// Last day of the window (YYYY-MM-DD); defaults to the latest date in the input
        #[arg(long)]
        as_of: Option<String>,

        /// Engine configuration file (TOML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        output_format: OutputFormat,
    },

    /// Check an input document against the data contract
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective engine configuration as TOML
    Config {
        /// Configuration file to load (defaults are printed when omitted)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Compact JSON on one line
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

fn main() -> ExitCode {
    logging::init_with_level("warn");
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let error = CliError::from(e);
            eprintln!(
                "{}",
                serde_json::to_string(&error).unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), VitalisCliError> {
    match cli.command {
        Commands::Analyze {
            input,
            output,
            window,
            as_of,
            config,
            output_format,
        } => cmd_analyze(
            &input,
            &output,
            window,
            as_of.as_deref(),
            config.as_deref(),
            output_format,
        ),

        Commands::Validate { input, json } => cmd_validate(&input, json),

        Commands::Config { path } => cmd_config(path.as_deref()),
    }
}

fn read_input(input: &Path) -> Result<String, VitalisCliError> {
    if input.to_string_lossy() == "-" {
        if atty::is(atty::Stream::Stdin) {
            return Err(VitalisCliError::NoInput);
        }
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn cmd_analyze(
    input: &Path,
    output: &Path,
    window: Option<u32>,
    as_of: Option<&str>,
    config: Option<&Path>,
    output_format: OutputFormat,
) -> Result<(), VitalisCliError> {
    let input_data = read_input(input)?;
    let mut analytics_input: AnalyticsInput = serde_json::from_str(&input_data)?;

    if let Some(days) = window {
        analytics_input.window = AnalyticsWindow::try_from(days)?;
    }

    if let Some(date) = as_of {
        let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| AnalyticsError::InvalidDate(format!("{}: {}", date, e)))?;
        analytics_input.as_of = Some(parsed);
    }

    let engine_config = match config {
        Some(path) => EngineConfig::load_from(path)?,
        None => EngineConfig::default(),
    };

    tracing::info!(
        window = analytics_input.window.days(),
        daily_records = analytics_input.daily_records.len(),
        "running analytics"
    );

    let report = AnalyticsEngine::with_config(engine_config).compute(&analytics_input);
    let encoder = ReportEncoder::new();

    let output_data = match output_format {
        OutputFormat::Json => {
            let mut line = serde_json::to_string(&encoder.encode(report))?;
            line.push('\n');
            line
        }
        OutputFormat::JsonPretty => {
            let mut pretty = encoder.encode_to_json(report)?;
            pretty.push('\n');
            pretty
        }
    };

    if output.to_string_lossy() == "-" {
        print!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

fn cmd_validate(input: &Path, json: bool) -> Result<(), VitalisCliError> {
    let input_data = read_input(input)?;
    let analytics_input: AnalyticsInput = serde_json::from_str(&input_data)?;
    let errors = analytics_input.validate();

    let report = ValidationReport {
        daily_records: analytics_input.daily_records.len(),
        weight_samples: analytics_input.weight_history.len(),
        sleep_samples: analytics_input.sleep_samples.len(),
        workout_days: analytics_input.workout_days.len(),
        errors: errors.iter().map(|e| e.to_string()).collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Daily records:  {}", report.daily_records);
        println!("Weight samples: {}", report.weight_samples);
        println!("Sleep samples:  {}", report.sleep_samples);
        println!("Workout days:   {}", report.workout_days);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!("  - {}", err);
            }
        }
    }

    if report.errors.is_empty() {
        Ok(())
    } else {
        Err(VitalisCliError::ValidationFailed(report.errors.len()))
    }
}

fn cmd_config(path: Option<&Path>) -> Result<(), VitalisCliError> {
    let config = match path {
        Some(path) => EngineConfig::load_from(path)?,
        None => EngineConfig::default(),
    };
    print!("{}", config.to_toml_string()?);
    Ok(())
}

// Error types

#[derive(Debug)]
enum VitalisCliError {
    Io(io::Error),
    Json(serde_json::Error),
    Analytics(AnalyticsError),
    NoInput,
    ValidationFailed(usize),
}

impl From<io::Error> for VitalisCliError {
    fn from(e: io::Error) -> Self {
        VitalisCliError::Io(e)
    }
}

impl From<serde_json::Error> for VitalisCliError {
    fn from(e: serde_json::Error) -> Self {
        VitalisCliError::Json(e)
    }
}

impl From<AnalyticsError> for VitalisCliError {
    fn from(e: AnalyticsError) -> Self {
        VitalisCliError::Analytics(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<VitalisCliError> for CliError {
    fn from(e: VitalisCliError) -> Self {
        match e {
            VitalisCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            VitalisCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax and field types".to_string()),
            },
            VitalisCliError::Analytics(e) => {
                let (code, hint) = match &e {
                    AnalyticsError::InvalidWindow(_) => {
                        ("INVALID_WINDOW", "Use a window of 7, 14 or 30 days")
                    }
                    AnalyticsError::InvalidDate(_) => ("INVALID_DATE", "Use the YYYY-MM-DD format"),
                    AnalyticsError::ConfigError(_) => {
                        ("CONFIG_ERROR", "Run 'vitalis config' to see the expected layout")
                    }
                    AnalyticsError::JsonError(_) => {
                        ("JSON_ERROR", "Check JSON syntax and field types")
                    }
                    AnalyticsError::Io(_) => ("IO_ERROR", "Check file paths and permissions"),
                    AnalyticsError::EncodingError(_) => ("ENCODING_ERROR", "Report this as a bug"),
                };
                CliError {
                    code: code.to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
            VitalisCliError::NoInput => CliError {
                code: "NO_INPUT".to_string(),
                message: "stdin is a terminal; nothing to read".to_string(),
                hint: Some("Pipe an input document or pass --input <file>".to_string()),
            },
            VitalisCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} contract violations found", count),
                hint: Some("Fix the listed records and retry".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    daily_records: usize,
    weight_samples: usize,
    sleep_samples: usize,
    workout_days: usize,
    errors: Vec<String>,
}
