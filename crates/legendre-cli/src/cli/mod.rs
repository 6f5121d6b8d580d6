mod commands;
mod helpers;

use clap::Parser;
use legendre_core::domain::{LegendreError, LegendreErrorCategory};
use legendre_core::regression::RegressionError;
use tracing_subscriber::EnvFilter;

const USAGE_PLACEHOLDER: &str = "INPUT.CLI_USAGE";
const INTERNAL_PLACEHOLDER: &str = "IO.CLI";

pub fn run_from_env() -> i32 {
    init_logging();
    let args = std::env::args().skip(1).collect::<Vec<_>>();

    match run(args) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("{}", error.diagnostic_line());
            error.exit_code()
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once("legendre".to_string())
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();
    parse_and_dispatch(full_args)
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => dispatch_parsed(cli.command),
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

/// Logs go to stderr so table output on stdout stays machine-readable.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser)]
#[command(
    name = "legendre",
    version,
    about = "Associated Legendre functions and their angle derivatives"
)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Print the value table P(n,m)[cos phi]
    Values(commands::TableArgs),
    /// Print the derivative table dP(n,m)/dphi with its value table
    Derivative(commands::TableArgs),
    /// Check the engines against the reference fixtures
    Check(commands::CheckArgs),
}

fn dispatch_parsed(command: CliCommand) -> Result<i32, CliError> {
    match command {
        CliCommand::Values(args) => commands::run_values_command(args),
        CliCommand::Derivative(args) => commands::run_derivative_command(args),
        CliCommand::Check(args) => commands::run_check_command(args),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Compute(LegendreError),
    #[error(transparent)]
    Regression(RegressionError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    pub fn category(&self) -> LegendreErrorCategory {
        match self {
            Self::Usage(_) => LegendreErrorCategory::InputValidationError,
            Self::Compute(error) => error.category(),
            Self::Regression(error) => error.category(),
            Self::Internal(_) => LegendreErrorCategory::IoSystemError,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.category().exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        match self {
            Self::Usage(message) => {
                format!("ERROR: [{USAGE_PLACEHOLDER}] {}", message.trim_end())
            }
            Self::Compute(error) => error.diagnostic_line(),
            Self::Regression(error) => error.diagnostic_line(),
            Self::Internal(error) => format!("ERROR: [{INTERNAL_PLACEHOLDER}] {error:#}"),
        }
    }
}
