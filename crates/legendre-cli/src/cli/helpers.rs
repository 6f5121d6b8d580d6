use super::CliError;
use anyhow::Context;
use legendre_core::numerics::legendre::table_rows;
use legendre_core::{LegendreInput, LegendreTable, Normalization};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(super) enum OutputFormat {
    Json,
    Text,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct TableReport {
    normalization: Normalization,
    angle: f64,
    max_degree: i32,
    max_order: i32,
    phase_term: bool,
    values: Vec<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    derivatives: Option<Vec<Vec<f64>>>,
}

impl TableReport {
    pub(super) fn values(input: LegendreInput, values: &LegendreTable) -> Self {
        Self::new(input, table_rows(values), None)
    }

    /// The companion value table may carry one extra order column; it is cut
    /// back to the derivative's shape.
    pub(super) fn derivative(
        input: LegendreInput,
        derivative: &LegendreTable,
        values: &LegendreTable,
    ) -> Self {
        let columns = derivative.ncols();
        let values = table_rows(values)
            .into_iter()
            .map(|mut row| {
                row.truncate(columns);
                row
            })
            .collect();
        Self::new(input, values, Some(table_rows(derivative)))
    }

    fn new(
        input: LegendreInput,
        values: Vec<Vec<f64>>,
        derivatives: Option<Vec<Vec<f64>>>,
    ) -> Self {
        Self {
            normalization: input.normalization,
            angle: input.angle,
            max_degree: input.max_degree,
            max_order: input.resolved_max_order(),
            phase_term: input.phase_term,
            values,
            derivatives,
        }
    }

    fn render_text(&self) -> String {
        let mut lines = vec![format!(
            "normalization={} angle={} maxDegree={} maxOrder={} phaseTerm={}",
            self.normalization, self.angle, self.max_degree, self.max_order, self.phase_term
        )];
        lines.push("values".to_string());
        lines.extend(render_triangle(&self.values));
        if let Some(derivatives) = &self.derivatives {
            lines.push("derivatives".to_string());
            lines.extend(render_triangle(derivatives));
        }
        lines.join("\n")
    }
}

/// One line per degree, listing only orders `m <= n`.
fn render_triangle(rows: &[Vec<f64>]) -> Vec<String> {
    rows.iter()
        .enumerate()
        .map(|(degree, row)| {
            let cells = row
                .iter()
                .take(degree + 1)
                .map(|value| format!("{value:.15e}"))
                .collect::<Vec<_>>();
            format!("n={degree}: {}", cells.join(" "))
        })
        .collect()
}

pub(super) fn emit(report: &TableReport, format: OutputFormat) -> Result<(), CliError> {
    let rendered = match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(report).context("failed to serialize table report")?
        }
        OutputFormat::Text => report.render_text(),
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{rendered}").context("failed to write table report to stdout")?;
    Ok(())
}
