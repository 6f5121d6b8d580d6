//! Checks the engines against checked-in reference tables.
//!
//! The reference tables in `tasks/legendre-reference-values.json` were built
//! independently of the recurrences (column-wise recurrence with factorial
//! normalization, derivatives by Richardson-extrapolated finite differences).

use crate::domain::LegendreErrorCategory;
use crate::numerics::legendre::{
    LegendreInput, LegendreTable, Normalization, TableBounds, legendre_derivative,
};
use crate::numerics::{
    DERIVATIVES_TOLERANCE_CATEGORY, NUMERIC_TOLERANCE_POLICY_PATH, NumericTolerance,
    NumericTolerancePolicy, NumericTolerancePolicyError, VALUES_TOLERANCE_CATEGORY,
    load_numeric_tolerance_policy,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const REFERENCE_FIXTURES_PATH: &str = "tasks/legendre-reference-values.json";

#[derive(Debug, Clone)]
pub struct ReferenceCheckConfig {
    pub fixtures_path: PathBuf,
    /// Without a policy every case is judged by its own tolerances.
    pub policy_path: Option<PathBuf>,
    pub report_path: Option<PathBuf>,
}

impl Default for ReferenceCheckConfig {
    fn default() -> Self {
        Self {
            fixtures_path: PathBuf::from(REFERENCE_FIXTURES_PATH),
            policy_path: Some(PathBuf::from(NUMERIC_TOLERANCE_POLICY_PATH)),
            report_path: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceFixtures {
    pub cases: Vec<ReferenceCase>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceCase {
    pub id: String,
    #[serde(flatten)]
    pub input: LegendreInput,
    pub expected_values: Vec<Vec<f64>>,
    pub expected_derivatives: Vec<Vec<f64>>,
    pub abs_tol: f64,
    pub rel_tol: f64,
}

impl ReferenceCase {
    pub fn tolerance(&self) -> NumericTolerance {
        NumericTolerance::new(self.abs_tol, self.rel_tol)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceCheckReport {
    pub passed: bool,
    pub fixtures_path: String,
    pub policy_path: Option<String>,
    pub case_count: usize,
    pub passed_case_count: usize,
    pub failed_case_count: usize,
    pub cases: Vec<CaseCheckReport>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseCheckReport {
    pub id: String,
    pub normalization: Normalization,
    pub passed: bool,
    pub error: Option<String>,
    pub values: Option<TableComparison>,
    pub derivatives: Option<TableComparison>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableComparison {
    pub cell_count: usize,
    pub failed_cell_count: usize,
    pub max_abs_diff: f64,
    pub max_rel_diff: f64,
    pub first_failure: Option<CellMismatch>,
}

impl TableComparison {
    pub fn passed(&self) -> bool {
        self.failed_cell_count == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellMismatch {
    pub degree: usize,
    pub order: usize,
    pub expected: f64,
    pub actual: f64,
    pub abs_diff: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum RegressionError {
    #[error("failed to read reference fixtures '{}': {source}", path.display())]
    ReadFixtures {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse reference fixtures '{}': {source}", path.display())]
    ParseFixtures {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Policy(#[from] NumericTolerancePolicyError),
    #[error("failed to serialize reference check report: {0}")]
    SerializeReport(#[source] serde_json::Error),
    #[error("failed to write reference check report '{}': {source}", path.display())]
    WriteReport {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl RegressionError {
    pub const fn category(&self) -> LegendreErrorCategory {
        match self {
            Self::ParseFixtures { .. } | Self::Policy(NumericTolerancePolicyError::Parse { .. }) => {
                LegendreErrorCategory::InputValidationError
            }
            Self::ReadFixtures { .. }
            | Self::Policy(NumericTolerancePolicyError::Read { .. })
            | Self::WriteReport { .. } => LegendreErrorCategory::IoSystemError,
            Self::SerializeReport(_) => LegendreErrorCategory::ComputationError,
        }
    }

    pub const fn placeholder(&self) -> &'static str {
        match self {
            Self::ReadFixtures { .. } | Self::ParseFixtures { .. } => "IO.REFERENCE_FIXTURES",
            Self::Policy(_) => "IO.TOLERANCE_POLICY",
            Self::SerializeReport(_) | Self::WriteReport { .. } => "IO.REFERENCE_REPORT",
        }
    }

    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.placeholder(), self)
    }
}

pub fn load_reference_fixtures(
    fixtures_path: impl AsRef<Path>,
) -> Result<ReferenceFixtures, RegressionError> {
    let fixtures_path = fixtures_path.as_ref();
    let source = fs::read_to_string(fixtures_path).map_err(|source| RegressionError::ReadFixtures {
        path: fixtures_path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&source).map_err(|source| RegressionError::ParseFixtures {
        path: fixtures_path.to_path_buf(),
        source,
    })
}

pub fn run_reference_check(
    config: &ReferenceCheckConfig,
) -> Result<ReferenceCheckReport, RegressionError> {
    let fixtures = load_reference_fixtures(&config.fixtures_path)?;
    let policy = config
        .policy_path
        .as_ref()
        .map(|policy_path| load_numeric_tolerance_policy(policy_path))
        .transpose()?;

    let cases = check_reference_cases(&fixtures, policy.as_ref());
    let case_count = cases.len();
    let passed_case_count = cases.iter().filter(|case| case.passed).count();
    let failed_case_count = case_count - passed_case_count;

    let report = ReferenceCheckReport {
        passed: failed_case_count == 0,
        fixtures_path: normalize_path(&config.fixtures_path),
        policy_path: config.policy_path.as_deref().map(normalize_path),
        case_count,
        passed_case_count,
        failed_case_count,
        cases,
    };
    tracing::info!(
        passed = report.passed,
        case_count,
        failed_case_count,
        "reference check finished"
    );

    if let Some(report_path) = &config.report_path {
        write_report(&report, report_path)?;
    }

    Ok(report)
}

pub fn check_reference_cases(
    fixtures: &ReferenceFixtures,
    policy: Option<&NumericTolerancePolicy>,
) -> Vec<CaseCheckReport> {
    fixtures
        .cases
        .iter()
        .map(|case| check_reference_case(case, policy))
        .collect()
}

pub fn check_reference_case(
    case: &ReferenceCase,
    policy: Option<&NumericTolerancePolicy>,
) -> CaseCheckReport {
    let category_tolerance = |category: &str| match policy {
        Some(policy) => policy.tolerance_or(category, case.tolerance()),
        None => case.tolerance(),
    };

    let (derivative, values) = match legendre_derivative(case.input) {
        Ok(tables) => tables,
        Err(error) => {
            tracing::debug!(case = %case.id, %error, "reference case could not be evaluated");
            return CaseCheckReport {
                id: case.id.clone(),
                normalization: case.input.normalization,
                passed: false,
                error: Some(error.to_string()),
                values: None,
                derivatives: None,
            };
        }
    };

    // The companion value table may be one column wider; only the
    // derivative's triangle is compared.
    let bounds = TableBounds::new(
        derivative.nrows().saturating_sub(1),
        derivative.ncols().saturating_sub(1),
    );
    let values = compare_table(
        &case.expected_values,
        &values,
        bounds,
        category_tolerance(VALUES_TOLERANCE_CATEGORY),
    );
    let derivatives = compare_table(
        &case.expected_derivatives,
        &derivative,
        bounds,
        category_tolerance(DERIVATIVES_TOLERANCE_CATEGORY),
    );
    let passed = values.passed() && derivatives.passed();
    tracing::debug!(case = %case.id, passed, "reference case compared");

    CaseCheckReport {
        id: case.id.clone(),
        normalization: case.input.normalization,
        passed,
        error: None,
        values: Some(values),
        derivatives: Some(derivatives),
    }
}

/// Compares the triangle `m <= min(n, bounds.max_order)` for every degree up
/// to `bounds.max_degree`, plus any extra rows `expected` carries. A cell
/// missing from either side is compared as NaN and fails, so truncated or
/// oversized fixtures cannot pass.
pub fn compare_table(
    expected: &[Vec<f64>],
    actual: &LegendreTable,
    bounds: TableBounds,
    tolerance: NumericTolerance,
) -> TableComparison {
    let mut comparison = TableComparison {
        cell_count: 0,
        failed_cell_count: 0,
        max_abs_diff: 0.0,
        max_rel_diff: 0.0,
        first_failure: None,
    };

    let degree_count = expected.len().max(bounds.max_degree + 1);
    for degree in 0..degree_count {
        for order in 0..bounds.order_count(degree) {
            comparison.cell_count += 1;
            let expected_value = expected
                .get(degree)
                .and_then(|row| row.get(order))
                .copied()
                .unwrap_or(f64::NAN);
            let actual_value = if degree <= bounds.max_degree
                && degree < actual.nrows()
                && order < actual.ncols()
            {
                actual[(degree, order)]
            } else {
                f64::NAN
            };

            let outcome = tolerance.compare(expected_value, actual_value);
            if outcome.abs_diff.is_finite() {
                comparison.max_abs_diff = comparison.max_abs_diff.max(outcome.abs_diff);
                comparison.max_rel_diff = comparison.max_rel_diff.max(outcome.rel_diff);
            }
            if outcome.passes {
                continue;
            }

            comparison.failed_cell_count += 1;
            if comparison.first_failure.is_none() {
                comparison.first_failure = Some(CellMismatch {
                    degree,
                    order,
                    expected: expected_value,
                    actual: actual_value,
                    abs_diff: outcome.abs_diff,
                });
            }
        }
    }

    comparison
}

pub fn write_report(report: &ReferenceCheckReport, report_path: &Path) -> Result<(), RegressionError> {
    let write_error = |source| RegressionError::WriteReport {
        path: report_path.to_path_buf(),
        source,
    };

    if let Some(parent) = report_path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    let serialized = serde_json::to_string_pretty(report).map_err(RegressionError::SerializeReport)?;
    fs::write(report_path, serialized).map_err(write_error)
}

pub fn render_human_summary(report: &ReferenceCheckReport) -> String {
    let mut lines = Vec::new();
    let status = if report.passed { "PASS" } else { "FAIL" };
    lines.push(format!("Reference check status: {status}"));
    lines.push(format!(
        "Cases: {} total ({} passed, {} failed)",
        report.case_count, report.passed_case_count, report.failed_case_count
    ));

    for case in &report.cases {
        let case_status = if case.passed { "PASS" } else { "FAIL" };
        let worst = |table: &Option<TableComparison>| {
            table
                .as_ref()
                .map_or(0.0, |comparison| comparison.max_abs_diff)
        };
        lines.push(format!(
            "Case {} ({}): {} (max_abs_diff values={:.3e} derivatives={:.3e})",
            case.id,
            case.normalization,
            case_status,
            worst(&case.values),
            worst(&case.derivatives)
        ));

        if let Some(error) = &case.error {
            lines.push(format!("  error: {error}"));
            continue;
        }

        let first_failure = [("values", &case.values), ("derivatives", &case.derivatives)]
            .into_iter()
            .find_map(|(label, table)| {
                table
                    .as_ref()
                    .and_then(|comparison| comparison.first_failure)
                    .map(|mismatch| (label, mismatch))
            });
        if let Some((label, mismatch)) = first_failure {
            lines.push(format!(
                "  first failure: {label}[{},{}] expected={:.15e} actual={:.15e}",
                mismatch.degree, mismatch.order, mismatch.expected, mismatch.actual
            ));
        }
    }

    lines.join("\n")
}

fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
