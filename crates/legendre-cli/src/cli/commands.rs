use super::CliError;
use super::helpers::{OutputFormat, TableReport, emit};
use legendre_core::numerics::NUMERIC_TOLERANCE_POLICY_PATH;
use legendre_core::regression::{
    REFERENCE_FIXTURES_PATH, ReferenceCheckConfig, render_human_summary, run_reference_check,
};
use legendre_core::{LegendreInput, Normalization, legendre_derivative, legendre_values};
use std::path::PathBuf;

#[derive(clap::Args)]
pub(super) struct TableArgs {
    /// Normalization: unnormalized, schmidt or full
    #[arg(long, default_value = "full")]
    normalization: Normalization,

    /// Colatitude-like angle phi, in radians unless --degrees is set
    #[arg(long, allow_negative_numbers = true)]
    angle: f64,

    /// Interpret --angle in degrees
    #[arg(long)]
    degrees: bool,

    /// Largest degree n
    #[arg(long, allow_negative_numbers = true)]
    max_degree: i32,

    /// Largest order m; negative means same as --max-degree
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    max_order: i32,

    /// Apply the Condon-Shortley phase (-1)^m
    #[arg(long)]
    phase_term: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

impl TableArgs {
    fn input(&self) -> LegendreInput {
        let angle = if self.degrees {
            self.angle.to_radians()
        } else {
            self.angle
        };
        LegendreInput::new(self.normalization, angle, self.max_degree)
            .with_max_order(self.max_order)
            .with_phase_term(self.phase_term)
    }
}

#[derive(clap::Args)]
pub(super) struct CheckArgs {
    /// Reference fixture path
    #[arg(long, default_value = REFERENCE_FIXTURES_PATH)]
    fixtures: PathBuf,

    /// Numeric tolerance policy path
    #[arg(long, default_value = NUMERIC_TOLERANCE_POLICY_PATH)]
    policy: PathBuf,

    /// Ignore the policy and judge each case by its own tolerances
    #[arg(long)]
    case_tolerances: bool,

    /// JSON report output path
    #[arg(long)]
    report: Option<PathBuf>,
}

impl CheckArgs {
    fn into_config(self) -> ReferenceCheckConfig {
        ReferenceCheckConfig {
            fixtures_path: self.fixtures,
            policy_path: (!self.case_tolerances).then_some(self.policy),
            report_path: self.report,
        }
    }
}

pub(super) fn run_values_command(args: TableArgs) -> Result<i32, CliError> {
    let input = args.input();
    input.validate().map_err(CliError::Compute)?;

    let values = legendre_values(input).map_err(CliError::Compute)?;
    tracing::debug!(rows = values.nrows(), columns = values.ncols(), "value table ready");
    emit(&TableReport::values(input, &values), args.format)?;
    Ok(0)
}

pub(super) fn run_derivative_command(args: TableArgs) -> Result<i32, CliError> {
    let input = args.input();
    input.validate().map_err(CliError::Compute)?;

    let (derivative, values) = legendre_derivative(input).map_err(CliError::Compute)?;
    tracing::debug!(
        rows = derivative.nrows(),
        columns = derivative.ncols(),
        value_columns = values.ncols(),
        "derivative table ready"
    );
    emit(
        &TableReport::derivative(input, &derivative, &values),
        args.format,
    )?;
    Ok(0)
}

pub(super) fn run_check_command(args: CheckArgs) -> Result<i32, CliError> {
    let config = args.into_config();
    let report = run_reference_check(&config).map_err(CliError::Regression)?;
    println!("{}", render_human_summary(&report));
    if let Some(report_path) = &config.report_path {
        println!("JSON report: {}", report_path.display());
    }

    if report.passed { Ok(0) } else { Ok(1) }
}
