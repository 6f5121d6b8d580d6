pub mod legendre;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const NUMERIC_TOLERANCE_POLICY_PATH: &str = "tasks/numeric-tolerance-policy.json";
pub const VALUES_TOLERANCE_CATEGORY: &str = "legendre_values";
pub const DERIVATIVES_TOLERANCE_CATEGORY: &str = "legendre_derivatives";

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericTolerance {
    pub abs_tol: f64,
    pub rel_tol: f64,
    pub relative_floor: f64,
}

impl NumericTolerance {
    pub const fn new(abs_tol: f64, rel_tol: f64) -> Self {
        Self {
            abs_tol,
            rel_tol,
            relative_floor: 1.0e-12,
        }
    }

    /// Passes when the difference is inside either the absolute tolerance or
    /// `rel_tol * max(|expected|, relative_floor)`. A non-finite difference
    /// never passes, so a NaN stand-in for a missing cell always fails.
    pub fn compare(&self, expected: f64, actual: f64) -> ToleranceOutcome {
        let abs_diff = (actual - expected).abs();
        let scale = expected.abs().max(self.relative_floor);
        let passes =
            abs_diff.is_finite() && (abs_diff <= self.abs_tol || abs_diff <= self.rel_tol * scale);

        ToleranceOutcome {
            abs_diff,
            rel_diff: abs_diff / scale,
            passes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToleranceOutcome {
    pub abs_diff: f64,
    pub rel_diff: f64,
    pub passes: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericTolerancePolicy {
    pub policy_version: String,
    pub default_mode: String,
    #[serde(default)]
    pub match_strategy: Option<String>,
    #[serde(default)]
    pub categories: Vec<NumericToleranceCategory>,
}

impl NumericTolerancePolicy {
    pub fn tolerance_for_category(&self, category_id: &str) -> Option<NumericTolerance> {
        self.categories
            .iter()
            .find(|category| category.id == category_id)
            .and_then(|category| category.tolerance)
    }

    /// Category tolerance, or `fallback` when the policy does not define one.
    pub fn tolerance_or(&self, category_id: &str, fallback: NumericTolerance) -> NumericTolerance {
        self.tolerance_for_category(category_id).unwrap_or(fallback)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NumericToleranceCategory {
    pub id: String,
    pub mode: String,
    pub tolerance: Option<NumericTolerance>,
}

#[derive(Debug, thiserror::Error)]
pub enum NumericTolerancePolicyError {
    #[error("failed to read numeric tolerance policy '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse numeric tolerance policy '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub fn load_numeric_tolerance_policy(
    policy_path: impl AsRef<Path>,
) -> Result<NumericTolerancePolicy, NumericTolerancePolicyError> {
    let policy_path = policy_path.as_ref();
    let source =
        fs::read_to_string(policy_path).map_err(|source| NumericTolerancePolicyError::Read {
            path: policy_path.to_path_buf(),
            source,
        })?;
    serde_json::from_str(&source).map_err(|source| NumericTolerancePolicyError::Parse {
        path: policy_path.to_path_buf(),
        source,
    })
}
