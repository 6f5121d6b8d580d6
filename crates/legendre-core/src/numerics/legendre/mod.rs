pub mod derivatives;
pub mod dimensions;
pub mod values;

pub use derivatives::{
    fill_full_derivative, fill_schmidt_derivative, fill_unnormalized_derivative,
};
pub use dimensions::{TableBounds, resolve_bounds, resolve_paired_bounds, resolve_table_bounds};
pub use values::{fill_full_values, fill_schmidt_values, fill_unnormalized_values};

use crate::domain::{LegendreError, LegendreResult};
use faer::Mat;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Dense degree x order table. Row `n` holds degree `n`, column `m` order `m`;
/// only cells with `m <= n` carry values.
pub type LegendreTable = Mat<f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Normalization {
    Unnormalized,
    Schmidt,
    Full,
}

impl Normalization {
    pub const ALL: [Self; 3] = [Self::Unnormalized, Self::Schmidt, Self::Full];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unnormalized => "unnormalized",
            Self::Schmidt => "schmidt",
            Self::Full => "full",
        }
    }
}

impl Display for Normalization {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

impl FromStr for Normalization {
    type Err = LegendreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|normalization| normalization.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| LegendreError::UnknownNormalization {
                name: value.to_string(),
            })
    }
}

/// One evaluation request for the allocating entry points.
///
/// Here a negative or oversized `max_order` resolves to `max_degree`. The
/// in-place `fill_*` functions take the same bounds but resolve them against
/// the table they are given (see [`resolve_bounds`]), so a negative order
/// there means "all columns" for a tall table and "same as degree" only for
/// one wider than it is tall.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendreInput {
    pub normalization: Normalization,
    pub angle: f64,
    pub max_degree: i32,
    #[serde(default = "inferred_bound")]
    pub max_order: i32,
    #[serde(default)]
    pub phase_term: bool,
}

fn inferred_bound() -> i32 {
    -1
}

impl LegendreInput {
    pub fn new(normalization: Normalization, angle: f64, max_degree: i32) -> Self {
        Self {
            normalization,
            angle,
            max_degree,
            max_order: inferred_bound(),
            phase_term: false,
        }
    }

    pub fn with_max_order(mut self, max_order: i32) -> Self {
        self.max_order = max_order;
        self
    }

    pub fn with_phase_term(mut self, phase_term: bool) -> Self {
        self.phase_term = phase_term;
        self
    }

    /// Stricter than the engines: also rejects non-finite angles, which the
    /// recurrences would silently turn into NaN tables.
    pub fn validate(&self) -> LegendreResult<()> {
        if !self.angle.is_finite() {
            return Err(LegendreError::InvalidAngle { angle: self.angle });
        }
        requested_degree(self.max_degree).map(|_| ())
    }

    /// Order actually allocated by the computing entry points.
    pub fn resolved_max_order(&self) -> i32 {
        allocation_order(self.max_degree, self.max_order)
    }
}

pub fn fill_values(
    normalization: Normalization,
    table: &mut LegendreTable,
    angle: f64,
    max_degree: i32,
    max_order: i32,
    phase_term: bool,
) {
    match normalization {
        Normalization::Unnormalized => {
            fill_unnormalized_values(table, angle, max_degree, max_order, phase_term)
        }
        Normalization::Schmidt => {
            fill_schmidt_values(table, angle, max_degree, max_order, phase_term)
        }
        Normalization::Full => fill_full_values(table, angle, max_degree, max_order, phase_term),
    }
}

/// Fills `derivative` from `values`. The value table must have been filled
/// with the same normalization and phase term; a mismatch is not detected.
pub fn fill_derivative(
    normalization: Normalization,
    derivative: &mut LegendreTable,
    angle: f64,
    values: &LegendreTable,
    max_degree: i32,
    max_order: i32,
    phase_term: bool,
) {
    match normalization {
        Normalization::Unnormalized => fill_unnormalized_derivative(
            derivative, angle, values, max_degree, max_order, phase_term,
        ),
        Normalization::Schmidt => {
            fill_schmidt_derivative(derivative, angle, values, max_degree, max_order, phase_term)
        }
        Normalization::Full => {
            fill_full_derivative(derivative, angle, values, max_degree, max_order, phase_term)
        }
    }
}

pub fn compute_values(
    normalization: Normalization,
    angle: f64,
    max_degree: i32,
    max_order: i32,
    phase_term: bool,
) -> LegendreResult<LegendreTable> {
    let degree = requested_degree(max_degree)?;
    let order = allocation_order(max_degree, max_order);
    tracing::debug!(%normalization, max_degree, max_order = order, phase_term, "computing Legendre values");

    let mut table = LegendreTable::zeros(degree + 1, order as usize + 1);
    fill_values(normalization, &mut table, angle, max_degree, order, phase_term);
    Ok(table)
}

/// Returns `(derivative, values)`. When `max_order < max_degree` the value
/// table carries one extra order column, which the derivative recurrence reads.
pub fn compute_derivative(
    normalization: Normalization,
    angle: f64,
    max_degree: i32,
    max_order: i32,
    phase_term: bool,
) -> LegendreResult<(LegendreTable, LegendreTable)> {
    let degree = requested_degree(max_degree)?;
    let order = allocation_order(max_degree, max_order);
    let value_order = if order < max_degree { order + 1 } else { order };
    tracing::debug!(%normalization, max_degree, max_order = order, value_order, phase_term, "computing Legendre derivatives");

    let values = compute_values(normalization, angle, max_degree, value_order, phase_term)?;
    let mut derivative = LegendreTable::zeros(degree + 1, order as usize + 1);
    fill_derivative(
        normalization,
        &mut derivative,
        angle,
        &values,
        max_degree,
        order,
        phase_term,
    );
    Ok((derivative, values))
}

pub fn legendre_values(input: LegendreInput) -> LegendreResult<LegendreTable> {
    compute_values(
        input.normalization,
        input.angle,
        input.max_degree,
        input.max_order,
        input.phase_term,
    )
}

pub fn legendre_derivative(input: LegendreInput) -> LegendreResult<(LegendreTable, LegendreTable)> {
    compute_derivative(
        input.normalization,
        input.angle,
        input.max_degree,
        input.max_order,
        input.phase_term,
    )
}

/// Copies a table into nested rows, e.g. for JSON output.
pub fn table_rows(table: &LegendreTable) -> Vec<Vec<f64>> {
    (0..table.nrows())
        .map(|row| (0..table.ncols()).map(|col| table[(row, col)]).collect())
        .collect()
}

fn requested_degree(max_degree: i32) -> LegendreResult<usize> {
    usize::try_from(max_degree).map_err(|_| LegendreError::InvalidDegree { max_degree })
}

fn allocation_order(max_degree: i32, max_order: i32) -> i32 {
    if max_order < 0 || max_order > max_degree {
        max_degree
    } else {
        max_order
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    pub(crate) fn assert_scalar_close(
        label: &str,
        expected: f64,
        actual: f64,
        abs_tol: f64,
        rel_tol: f64,
    ) {
        let abs_diff = (actual - expected).abs();
        let rel_diff = abs_diff / expected.abs().max(1.0);
        assert!(
            abs_diff <= abs_tol || rel_diff <= rel_tol,
            "{label} expected={expected:.15e} actual={actual:.15e} abs_diff={abs_diff:.15e} rel_diff={rel_diff:.15e}"
        );
    }
}
