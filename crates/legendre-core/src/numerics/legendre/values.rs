//! Forward recurrences over increasing degree for `P(n,m)[cos ϕ]`.
//!
//! Every normalization shares the same sweep: the diagonal `P[n,n]` grows
//! from `P[n-1,n-1]` through the sine factor, and the remaining orders use
//! the three-term relation
//!
//! ```text
//! P[n,m] = a(n,m) P[n-1,m] - b(n,m) P[n-2,m]
//! ```
//!
//! with normalization-specific coefficients.

use super::LegendreTable;
use super::dimensions::resolve_table_bounds;

trait ValueRecurrence {
    /// Scale applied to `cos ϕ` and `sin ϕ` at degree 1.
    fn degree_one_scale() -> f64;

    fn diagonal_scale(degree: f64) -> f64;

    /// Returns `(a, b)` for an off-diagonal cell, `a` already multiplied by `cos ϕ`.
    fn coefficients(degree: f64, order: f64, cos: f64) -> (f64, f64);
}

struct Unnormalized;
struct Schmidt;
struct Full;

impl ValueRecurrence for Unnormalized {
    fn degree_one_scale() -> f64 {
        1.0
    }

    fn diagonal_scale(degree: f64) -> f64 {
        2.0 * degree - 1.0
    }

    fn coefficients(degree: f64, order: f64, cos: f64) -> (f64, f64) {
        let span = degree - order;
        let a = (2.0 * degree - 1.0) / span * cos;
        let b = (degree + order - 1.0) / span;
        (a, b)
    }
}

impl ValueRecurrence for Schmidt {
    fn degree_one_scale() -> f64 {
        1.0
    }

    fn diagonal_scale(degree: f64) -> f64 {
        ((2.0 * degree - 1.0) / (2.0 * degree)).sqrt()
    }

    fn coefficients(degree: f64, order: f64, cos: f64) -> (f64, f64) {
        let norm = ((degree - order) * (degree + order)).sqrt();
        let a = (2.0 * degree - 1.0) / norm * cos;
        let b = ((degree + order - 1.0) * (degree - order - 1.0)).sqrt() / norm;
        (a, b)
    }
}

impl ValueRecurrence for Full {
    fn degree_one_scale() -> f64 {
        3.0_f64.sqrt()
    }

    fn diagonal_scale(degree: f64) -> f64 {
        ((2.0 * degree + 1.0) / (2.0 * degree)).sqrt()
    }

    fn coefficients(degree: f64, order: f64, cos: f64) -> (f64, f64) {
        let span = (degree - order) * (degree + order);
        let a = ((2.0 * degree - 1.0) * (2.0 * degree + 1.0) / span).sqrt() * cos;
        let b = ((degree + order - 1.0) * (degree - order - 1.0) * (2.0 * degree + 1.0)
            / ((2.0 * degree - 3.0) * span))
            .sqrt();
        (a, b)
    }
}

pub fn fill_unnormalized_values(
    table: &mut LegendreTable,
    angle: f64,
    max_degree: i32,
    max_order: i32,
    phase_term: bool,
) {
    fill_with::<Unnormalized>(table, angle, max_degree, max_order, phase_term);
}

pub fn fill_schmidt_values(
    table: &mut LegendreTable,
    angle: f64,
    max_degree: i32,
    max_order: i32,
    phase_term: bool,
) {
    fill_with::<Schmidt>(table, angle, max_degree, max_order, phase_term);
}

pub fn fill_full_values(
    table: &mut LegendreTable,
    angle: f64,
    max_degree: i32,
    max_order: i32,
    phase_term: bool,
) {
    fill_with::<Full>(table, angle, max_degree, max_order, phase_term);
}

fn fill_with<R: ValueRecurrence>(
    table: &mut LegendreTable,
    angle: f64,
    max_degree: i32,
    max_order: i32,
    phase_term: bool,
) {
    let Some(bounds) = resolve_table_bounds(table, max_degree, max_order) else {
        return;
    };

    // sin comes from the primitive, not from cos, and is folded to >= 0.
    let (sin, cos) = angle.sin_cos();
    let sin = sin.abs();
    let sin_factor = if phase_term { -sin } else { sin };

    table[(0, 0)] = 1.0;
    if bounds.max_degree == 0 {
        return;
    }

    let scale = R::degree_one_scale();
    table[(1, 0)] = scale * cos;
    if bounds.max_order > 0 {
        table[(1, 1)] = scale * sin_factor;
    }

    for degree in 2..=bounds.max_degree {
        let n = degree as f64;
        for order in 0..bounds.order_count(degree) {
            let value = if order == degree {
                sin_factor * R::diagonal_scale(n) * table[(degree - 1, degree - 1)]
            } else {
                let (a, b) = R::coefficients(n, order as f64, cos);
                let lower = a * table[(degree - 1, order)];
                // P[n-2,n-1] lies outside the triangle.
                if order + 1 == degree {
                    lower
                } else {
                    lower - b * table[(degree - 2, order)]
                }
            };
            table[(degree, order)] = value;
        }
    }
}
