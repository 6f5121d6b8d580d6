use super::LegendreTable;

/// Concrete degree and order limits for one fill call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableBounds {
    pub max_degree: usize,
    pub max_order: usize,
}

impl TableBounds {
    pub const fn new(max_degree: usize, max_order: usize) -> Self {
        Self {
            max_degree,
            max_order,
        }
    }

    /// Number of columns filled in row `degree`.
    pub fn order_count(&self, degree: usize) -> usize {
        degree.min(self.max_order) + 1
    }
}

/// Resolves requested bounds against a `rows x cols` capacity.
///
/// Negative requests are inferred from the capacity. The default order is the
/// full column range unless the table is wider than it is tall, in which case
/// it follows the degree. Requests beyond capacity are narrowed, never
/// rejected. Returns `None` for a table with no cells.
pub fn resolve_bounds(
    rows: usize,
    cols: usize,
    max_degree: i32,
    max_order: i32,
) -> Option<TableBounds> {
    if rows == 0 || cols == 0 {
        return None;
    }

    let last_row = (rows - 1) as i64;
    let last_col = (cols - 1) as i64;

    let mut degree = if max_degree < 0 {
        last_row
    } else {
        i64::from(max_degree)
    };
    let mut order = if max_order >= 0 {
        i64::from(max_order)
    } else if cols <= rows {
        last_col
    } else {
        degree
    };

    degree = degree.min(last_row);
    if order > last_col || order > degree {
        order = last_col.min(degree);
    }

    Some(TableBounds::new(degree as usize, order as usize))
}

pub fn resolve_table_bounds(
    table: &LegendreTable,
    max_degree: i32,
    max_order: i32,
) -> Option<TableBounds> {
    resolve_bounds(table.nrows(), table.ncols(), max_degree, max_order)
}

/// Two-table variant: the shared capacity is the element-wise minimum of the
/// derivative and value tables.
pub fn resolve_paired_bounds(
    derivative: &LegendreTable,
    values: &LegendreTable,
    max_degree: i32,
    max_order: i32,
) -> Option<TableBounds> {
    resolve_bounds(
        derivative.nrows().min(values.nrows()),
        derivative.ncols().min(values.ncols()),
        max_degree,
        max_order,
    )
}

#[cfg(test)]
mod tests {
    use super::{TableBounds, resolve_bounds, resolve_paired_bounds, resolve_table_bounds};
    use crate::numerics::legendre::LegendreTable;

    #[test]
    fn negative_requests_infer_full_square_table() {
        assert_eq!(resolve_bounds(5, 5, -1, -1), Some(TableBounds::new(4, 4)));
    }

    #[test]
    fn narrow_table_defaults_order_to_column_capacity() {
        assert_eq!(resolve_bounds(7, 3, -1, -1), Some(TableBounds::new(6, 2)));
    }

    #[test]
    fn wide_table_defaults_order_to_degree() {
        assert_eq!(resolve_bounds(3, 8, -1, -1), Some(TableBounds::new(2, 2)));
        assert_eq!(resolve_bounds(4, 8, 1, -1), Some(TableBounds::new(1, 1)));
    }

    #[test]
    fn requests_beyond_capacity_are_narrowed() {
        assert_eq!(resolve_bounds(4, 4, 10, 10), Some(TableBounds::new(3, 3)));
        assert_eq!(resolve_bounds(10, 10, 6, 9), Some(TableBounds::new(6, 6)));
        assert_eq!(resolve_bounds(10, 3, 6, 5), Some(TableBounds::new(6, 2)));
    }

    #[test]
    fn explicit_requests_inside_capacity_are_kept() {
        assert_eq!(resolve_bounds(10, 10, 6, 2), Some(TableBounds::new(6, 2)));
        assert_eq!(resolve_bounds(10, 10, 0, 0), Some(TableBounds::new(0, 0)));
    }

    #[test]
    fn empty_tables_resolve_to_nothing() {
        assert_eq!(resolve_bounds(0, 4, -1, -1), None);
        assert_eq!(resolve_bounds(4, 0, 2, 2), None);
    }

    #[test]
    fn single_cell_table_resolves_to_degree_zero() {
        assert_eq!(resolve_bounds(1, 1, 5, 5), Some(TableBounds::new(0, 0)));
    }

    #[test]
    fn paired_bounds_use_the_smaller_capacity() {
        let derivative = LegendreTable::zeros(6, 4);
        let values = LegendreTable::zeros(5, 6);

        assert_eq!(
            resolve_paired_bounds(&derivative, &values, -1, -1),
            Some(TableBounds::new(4, 3))
        );
        assert_eq!(
            resolve_table_bounds(&values, -1, -1),
            Some(TableBounds::new(4, 4))
        );
    }

    #[test]
    fn order_count_follows_triangle() {
        let bounds = TableBounds::new(5, 2);
        assert_eq!(bounds.order_count(0), 1);
        assert_eq!(bounds.order_count(1), 2);
        assert_eq!(bounds.order_count(4), 3);
    }
}
