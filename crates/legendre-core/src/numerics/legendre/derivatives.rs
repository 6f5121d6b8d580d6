//! First derivative `∂P[n,m]/∂ϕ` rebuilt from an already filled value table.
//!
//! The value recurrences only see `cos ϕ` and `|sin ϕ|`, so they cannot tell
//! `ϕ` from `2π - ϕ`. The derivative does change sign across `π`, which is
//! patched by flipping the whole table when `ϕ mod 2π > π`. Outside `[0, π]`
//! this is an empirical correction, not a derived identity.

use super::LegendreTable;
use super::dimensions::{TableBounds, resolve_paired_bounds};
use std::f64::consts::{PI, TAU};

pub fn fill_unnormalized_derivative(
    derivative: &mut LegendreTable,
    angle: f64,
    values: &LegendreTable,
    max_degree: i32,
    max_order: i32,
    phase_term: bool,
) {
    let Some(bounds) = resolve_paired_bounds(derivative, values, max_degree, max_order) else {
        return;
    };
    warn_on_missing_companion_order(values, bounds);
    let sign = derivative_sign(angle, phase_term);

    derivative[(0, 0)] = 0.0;
    for degree in 1..=bounds.max_degree {
        let n = degree as f64;
        for order in 0..bounds.order_count(degree) {
            let m = order as f64;
            let value = if order == 0 {
                -companion(values, degree, 1)
            } else {
                let lower = (n + m) * (n - m + 1.0) * values[(degree, order - 1)];
                if order == degree {
                    0.5 * lower
                } else {
                    0.5 * (lower - companion(values, degree, order + 1))
                }
            };
            derivative[(degree, order)] = sign * value;
        }
    }
}

/// Schmidt and full tables differ by `√(2n+1)` per row, which cancels in the
/// derivative relation, so both share one recurrence.
pub fn fill_schmidt_derivative(
    derivative: &mut LegendreTable,
    angle: f64,
    values: &LegendreTable,
    max_degree: i32,
    max_order: i32,
    phase_term: bool,
) {
    fill_full_derivative(derivative, angle, values, max_degree, max_order, phase_term);
}

pub fn fill_full_derivative(
    derivative: &mut LegendreTable,
    angle: f64,
    values: &LegendreTable,
    max_degree: i32,
    max_order: i32,
    phase_term: bool,
) {
    let Some(bounds) = resolve_paired_bounds(derivative, values, max_degree, max_order) else {
        return;
    };
    warn_on_missing_companion_order(values, bounds);
    let sign = derivative_sign(angle, phase_term);

    derivative[(0, 0)] = 0.0;
    for degree in 1..=bounds.max_degree {
        let n = degree as f64;
        for order in 0..bounds.order_count(degree) {
            let m = order as f64;
            let value = match order {
                0 => {
                    // Both half-terms land on P[n,1] through P[n,-1] = -P[n,1].
                    let half = 0.5 * (n * (n + 1.0) / 2.0).sqrt();
                    -(half + half) * companion(values, degree, 1)
                }
                1 => {
                    let lower = 0.5 * (2.0 * n * (n + 1.0)).sqrt() * values[(degree, 0)];
                    if degree > 1 {
                        let b = -0.5 * ((n + 2.0) * (n - 1.0)).sqrt();
                        lower + b * companion(values, degree, 2)
                    } else {
                        lower
                    }
                }
                _ => {
                    let a = 0.5 * ((n + m) * (n - m + 1.0)).sqrt();
                    let lower = a * values[(degree, order - 1)];
                    if order < degree {
                        let b = -0.5 * ((n + m + 1.0) * (n - m)).sqrt();
                        lower + b * companion(values, degree, order + 1)
                    } else {
                        lower
                    }
                }
            };
            derivative[(degree, order)] = sign * value;
        }
    }
}

pub(crate) fn derivative_sign(angle: f64, phase_term: bool) -> f64 {
    let reduced = angle.rem_euclid(TAU);
    let sign = if reduced > PI { -1.0 } else { 1.0 };
    if phase_term { -sign } else { sign }
}

/// Reads `P[n,m]`, treating columns the value table does not have as unfilled.
fn companion(values: &LegendreTable, degree: usize, order: usize) -> f64 {
    if order < values.ncols() {
        values[(degree, order)]
    } else {
        0.0
    }
}

fn warn_on_missing_companion_order(values: &LegendreTable, bounds: TableBounds) {
    if bounds.max_order < bounds.max_degree && values.ncols() <= bounds.max_order + 1 {
        tracing::warn!(
            max_degree = bounds.max_degree,
            max_order = bounds.max_order,
            value_columns = values.ncols(),
            "value table lacks the order above max_order; it is read as zero"
        );
    }
}
