// src/analysis/balance_sheet.rs
use std::fmt;

use async_trait::async_trait;

use crate::fmp::models::BalanceSheetStatement;
use crate::utils::error::FmpError;

/// Market-data service that serves a company's latest balance sheet.
#[async_trait]
pub trait BalanceSheetSource: Send + Sync {
    async fn balance_sheet(&self, ticker: &str) -> Result<BalanceSheet, FmpError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub label: String,
    /// One value per period, aligned with `BalanceSheet::periods`
    pub values: Vec<Option<f64>>,
}

/// Balance sheet as a table: line items by reporting period, most recent period first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BalanceSheet {
    pub periods: Vec<String>,
    pub rows: Vec<LineItem>,
}

impl BalanceSheet {
    /// Pivots per-period statements into rows of line items.
    /// Line items no period reports are left out.
    pub fn from_statements(statements: &[BalanceSheetStatement]) -> Self {
        let periods = statements.iter().map(|s| s.date.clone()).collect();
        let per_period: Vec<_> = statements.iter().map(|s| s.line_items()).collect();

        let mut rows = Vec::new();
        if let Some(first) = per_period.first() {
            for (idx, (label, _)) in first.iter().enumerate() {
                let values: Vec<Option<f64>> = per_period.iter().map(|items| items[idx].1).collect();
                if values.iter().any(Option::is_some) {
                    rows.push(LineItem { label: label.to_string(), values });
                }
            }
        }

        Self { periods, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", v as i64),
        Some(v) => format!("{:.2}", v),
        None => "NaN".to_string(),
    }
}

/// Plain-text table: a header line of period dates, then one line per item.
impl fmt::Display for BalanceSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("Empty balance sheet");
        }

        let cells: Vec<Vec<String>> = self.rows
            .iter()
            .map(|row| row.values.iter().map(|v| format_value(*v)).collect())
            .collect();

        let label_width = self.rows.iter().map(|r| r.label.len()).max().unwrap_or(0);
        let column_widths: Vec<usize> = self.periods
            .iter()
            .enumerate()
            .map(|(col, period)| {
                cells.iter()
                    .filter_map(|row| row.get(col).map(String::len))
                    .chain(std::iter::once(period.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{:<width$}", "", width = label_width)?;
        for (period, width) in self.periods.iter().zip(&column_widths) {
            write!(f, "  {:>width$}", period, width = *width)?;
        }

        for (row, row_cells) in self.rows.iter().zip(&cells) {
            write!(f, "\n{:<width$}", row.label, width = label_width)?;
            for (cell, width) in row_cells.iter().zip(&column_widths) {
                write!(f, "  {:>width$}", cell, width = *width)?;
            }
        }
        Ok(())
    }
}
