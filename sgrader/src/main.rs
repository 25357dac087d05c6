use clap::{Parser, ValueEnum};
use std::{fs, path::PathBuf, process::ExitCode, time::Duration};
use submission_grader::{AssignmentConfig, HarnessError, LoggingMode, RunOptions};

/// Exit code of a run aborted by a harness fault. A graded submission, even a rejected
/// one, exits with 0.
const ABORT_EXIT_CODE: u8 = 2;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Logging {
    Silent,
    Normal,
    Verbose,
}

impl From<Logging> for LoggingMode {
    fn from(value: Logging) -> Self {
        match value {
            Logging::Silent => LoggingMode::Silent,
            Logging::Normal => LoggingMode::Normal,
            Logging::Verbose => LoggingMode::Verbose,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "sgrader",
    version,
    about,
    long_about = "Grade the submission in SUBMISSION_DIR using the checks of CONFIGURATION_FILE."
)]
struct Cli {
    configuration_file: PathBuf,

    #[arg(default_value = ".")]
    submission_dir: PathBuf,

    /// Seconds allowed per command; 0 disables the limit.
    #[arg(long)]
    timeout: Option<u64>,

    /// Write the report to this file instead of stdout.
    #[arg(long)]
    report: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t)]
    format: ReportFormat,

    /// Overrides the configuration's logging mode.
    #[arg(long, value_enum)]
    logging: Option<Logging>,
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = AssignmentConfig::load(&cli.configuration_file)?;

    let logging_mode = cli.logging.map(LoggingMode::from).unwrap_or(config.logging_mode);
    let env = env_logger::Env::default().default_filter_or(logging_mode.filter());
    env_logger::Builder::from_env(env).init();

    let options = RunOptions {
        timeout: cli
            .timeout
            .map(|secs| (secs > 0).then(|| Duration::from_secs(secs))),
    };
    let ledger = submission_grader::grade(&config, &cli.submission_dir, options)?;

    let report = match cli.format {
        ReportFormat::Text => ledger.summarize(),
        ReportFormat::Json => serde_json::to_string_pretty(&ledger.to_report())? + "\n",
    };
    match &cli.report {
        Some(path) => {
            fs::write(path, report)?;
            log::info!("📄 Report written to '{}'", path.display());
        }
        None => print!("{report}"),
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let kind = match err.downcast_ref::<HarnessError>() {
                Some(HarnessError::ConfigRead { .. } | HarnessError::ConfigParse(_)) => {
                    "configuration error"
                }
                Some(_) => "harness fault",
                None => "i/o error",
            };
            eprintln!("GRADING ABORTED ({kind}): {err}");
            ExitCode::from(ABORT_EXIT_CODE)
        }
    }
}
