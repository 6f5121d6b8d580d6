mod common;

use common::assert_scalar_close;
use legendre_core::{
    LegendreInput, LegendreTable, Normalization, compute_derivative, compute_values, fill_values,
    legendre_values,
};

const ANGLES: [f64; 5] = [0.2, 0.9, 1.6, 2.4, 3.0];

fn values(normalization: Normalization, angle: f64, max_degree: i32, phase_term: bool) -> LegendreTable {
    compute_values(normalization, angle, max_degree, -1, phase_term)
        .unwrap_or_else(|error| panic!("{normalization} values at {angle}: {error}"))
}

#[test]
fn degree_zero_is_one_with_zero_derivative() {
    for normalization in Normalization::ALL {
        for angle in [-5.0, 0.0, 1.0, 3.5, 12.0] {
            for phase_term in [false, true] {
                let (derivative, values) =
                    compute_derivative(normalization, angle, 4, -1, phase_term)
                        .expect("derivative should compute");
                assert_eq!(values[(0, 0)], 1.0, "{normalization} P00 at {angle}");
                assert_eq!(derivative[(0, 0)], 0.0, "{normalization} dP00 at {angle}");
            }
        }
    }
}

#[test]
fn single_cell_table_holds_one() {
    for normalization in Normalization::ALL {
        let table = compute_values(normalization, 0.7, 0, -1, true).expect("values");
        assert_eq!((table.nrows(), table.ncols()), (1, 1));
        assert_eq!(table[(0, 0)], 1.0);

        for angle in [-2.0, 0.0, 3.3] {
            let mut in_place = LegendreTable::zeros(1, 1);
            in_place[(0, 0)] = -4.0;
            fill_values(normalization, &mut in_place, angle, -1, -1, false);
            assert_eq!(in_place[(0, 0)], 1.0, "{normalization} at {angle}");
        }
    }
}

#[test]
fn zero_angle_leaves_only_order_zero() {
    for normalization in Normalization::ALL {
        let table = values(normalization, 0.0, 6, false);
        for degree in 0_usize..=6 {
            let expected_p_n0 = match normalization {
                Normalization::Full => (2.0 * degree as f64 + 1.0).sqrt(),
                _ => 1.0,
            };
            assert_scalar_close(
                &format!("{normalization} P[{degree},0]"),
                expected_p_n0,
                table[(degree, 0)],
                1.0e-12,
                1.0e-12,
            );
            for order in 1..=degree {
                assert_eq!(table[(degree, order)], 0.0, "{normalization} P[{degree},{order}]");
            }
        }
    }
}

#[test]
fn phase_term_multiplies_by_minus_one_to_the_order() {
    for normalization in Normalization::ALL {
        for angle in ANGLES {
            let plain = values(normalization, angle, 7, false);
            let phased = values(normalization, angle, 7, true);
            let (plain_derivative, _) =
                compute_derivative(normalization, angle, 7, -1, false).expect("derivative");
            let (phased_derivative, _) =
                compute_derivative(normalization, angle, 7, -1, true).expect("derivative");

            for degree in 0_usize..=7 {
                for order in 0..=degree {
                    let sign = if order % 2 == 0 { 1.0 } else { -1.0 };
                    assert_scalar_close(
                        &format!("{normalization} P[{degree},{order}] at {angle}"),
                        sign * plain[(degree, order)],
                        phased[(degree, order)],
                        1.0e-12,
                        1.0e-12,
                    );
                    assert_scalar_close(
                        &format!("{normalization} dP[{degree},{order}] at {angle}"),
                        sign * plain_derivative[(degree, order)],
                        phased_derivative[(degree, order)],
                        1.0e-12,
                        1.0e-12,
                    );
                }
            }
        }
    }
}

#[test]
fn full_is_schmidt_scaled_by_row() {
    for angle in ANGLES {
        let schmidt = values(Normalization::Schmidt, angle, 9, true);
        let full = values(Normalization::Full, angle, 9, true);
        for degree in 0_usize..=9 {
            let scale = (2.0 * degree as f64 + 1.0).sqrt();
            for order in 0..=degree {
                assert_scalar_close(
                    &format!("P[{degree},{order}] at {angle}"),
                    scale * schmidt[(degree, order)],
                    full[(degree, order)],
                    1.0e-12,
                    1.0e-12,
                );
            }
        }
    }
}

#[test]
fn schmidt_order_zero_matches_unnormalized() {
    for angle in ANGLES {
        let unnormalized = values(Normalization::Unnormalized, angle, 8, false);
        let schmidt = values(Normalization::Schmidt, angle, 8, false);
        for degree in 0_usize..=8 {
            assert_scalar_close(
                &format!("P[{degree},0] at {angle}"),
                unnormalized[(degree, 0)],
                schmidt[(degree, 0)],
                1.0e-12,
                1.0e-12,
            );
        }
    }
}

#[test]
fn cells_above_the_diagonal_stay_zero() {
    for normalization in Normalization::ALL {
        let (derivative, values) =
            compute_derivative(normalization, 1.1, 6, -1, true).expect("derivative");
        for table in [&values, &derivative] {
            assert_eq!((table.nrows(), table.ncols()), (7, 7));
            for degree in 0_usize..7 {
                for order in degree + 1..7 {
                    assert_eq!(table[(degree, order)], 0.0, "{normalization} [{degree},{order}]");
                }
            }
        }
    }
}

#[test]
fn unnormalized_values_match_golden_digits() {
    let table = values(Normalization::Unnormalized, 0.45, 4, false);
    assert_scalar_close("P10", 0.9004471, table[(1, 0)], 5.0e-8, 0.0);
    assert_scalar_close("P21", 1.1749904, table[(2, 1)], 5.0e-8, 0.0);
    assert_scalar_close("P44", 3.7584492, table[(4, 4)], 5.0e-8, 0.0);
}

#[test]
fn schmidt_phased_values_match_golden_digits() {
    let table = compute_values(Normalization::Schmidt, 0.45, 4, 3, true).expect("values");
    assert_eq!((table.nrows(), table.ncols()), (5, 4));
    assert_scalar_close("P11", -0.4349655, table[(1, 1)], 5.0e-8, 0.0);
    assert_scalar_close("P33", -0.0650586, table[(3, 3)], 5.0e-8, 0.0);
}

#[test]
fn derivative_companion_values_agree_with_compute_values() {
    for normalization in Normalization::ALL {
        for max_order in [-1, 2, 5] {
            let (derivative, companion) =
                compute_derivative(normalization, 2.1, 5, max_order, false).expect("derivative");
            let resolved = derivative.ncols() - 1;
            let direct = compute_values(normalization, 2.1, 5, max_order, false).expect("values");
            assert_eq!(direct.ncols(), derivative.ncols());

            for degree in 0_usize..=5 {
                for order in 0..=degree.min(resolved) {
                    assert_eq!(
                        companion[(degree, order)],
                        direct[(degree, order)],
                        "{normalization} max_order={max_order} P[{degree},{order}]"
                    );
                }
            }

            if resolved < 5 {
                let widened =
                    compute_values(normalization, 2.1, 5, resolved as i32 + 1, false).expect("values");
                assert_eq!(companion.ncols(), resolved + 2);
                for degree in resolved + 1..=5 {
                    assert_eq!(
                        companion[(degree, resolved + 1)],
                        widened[(degree, resolved + 1)],
                        "{normalization} widened column at degree {degree}"
                    );
                }
            }
        }
    }
}

#[test]
fn truncated_order_derivative_matches_full_triangle() {
    for normalization in Normalization::ALL {
        let (truncated, _) =
            compute_derivative(normalization, 0.8, 6, 2, true).expect("derivative");
        let (complete, _) = compute_derivative(normalization, 0.8, 6, -1, true).expect("derivative");
        for degree in 0_usize..=6 {
            for order in 0..=degree.min(2) {
                assert_scalar_close(
                    &format!("{normalization} dP[{degree},{order}]"),
                    complete[(degree, order)],
                    truncated[(degree, order)],
                    1.0e-14,
                    1.0e-14,
                );
            }
        }
    }
}

#[test]
fn input_facade_matches_positional_entry_point() {
    let input = LegendreInput::new(Normalization::Full, -0.7, 5).with_phase_term(true);
    let via_input = legendre_values(input).expect("values");
    let direct = values(Normalization::Full, -0.7, 5, true);
    for degree in 0_usize..=5 {
        for order in 0..=degree {
            assert_eq!(via_input[(degree, order)], direct[(degree, order)]);
        }
    }
}
