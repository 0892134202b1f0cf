use crate::error::{Result, StatementError};
use crate::normalize::normalize;
use crate::standardize::ACCOUNT_COLUMN;
use crate::table::{Cell, DataTable};
use crate::taxonomy::{ASSET_CATEGORIES, LIABILITY_CATEGORIES};
use log::debug;
use serde::{Deserialize, Serialize};

/// Column names accepted as the category column of an aggregated table, tried
/// in order.
pub const CATEGORY_COLUMN_CANDIDATES: &[&str] =
    &["categorias_bp", "Categorias", "Categoria", "categoria"];

/// Label prefix applied to every projected row.
pub const PROJECTION_PREFIX: &str = "Ano Seguinte_";

/// Fixed single-period linear growth applied by the naive projection.
const PROJECTION_GROWTH: f64 = 1.05;

/// Which column identifies each row of the analyzed table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisMode {
    /// Rows are category totals; the identifying column is one of
    /// [`CATEGORY_COLUMN_CANDIDATES`].
    Aggregated,
    /// Rows are individual accounts; the identifying column is `conta`.
    Detailed,
}

/// Mode with the identifying column already resolved against the table.
enum ResolvedMode {
    Aggregated {
        label_index: usize,
    },
    Detailed {
        label_index: usize,
        /// Category column, when the detailed table carries one. Used to
        /// decide which total a row is divided by.
        category_index: Option<usize>,
    },
}

/// Output of [`analyze`]: the input table with `<period>_AV` and
/// `<period>_AH` columns appended, plus a naive next-period projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub av_ah: DataTable,
    pub projection: DataTable,
}

/// Computes vertical analysis (each value as a proportion of the period's
/// asset or liability total), horizontal analysis (each value relative to the
/// base period, the first period column), and a fixed 5% projection.
///
/// Division by a zero total or zero base value yields IEEE infinities/NaN,
/// never an error; only a missing identifying column aborts the call.
pub fn analyze(table: &DataTable, mode: AnalysisMode) -> Result<AnalysisResult> {
    let resolved = resolve_mode(table, mode)?;

    let periods = table.numeric_columns();
    debug!(
        "Analyzing {} rows across {} period columns",
        table.rows.len(),
        periods.len()
    );

    let (asset_totals, liability_totals) = period_totals(table, &resolved, &periods);

    let mut av_ah = table.clone();

    for (p, (column, name)) in periods.iter().enumerate() {
        let cells: Vec<Cell> = table
            .rows
            .iter()
            .enumerate()
            .map(|(row, _)| {
                let value = table.number_at(row, *column).unwrap_or(f64::NAN);
                let total = if row_is_asset(table, &resolved, row) {
                    asset_totals[p]
                } else {
                    liability_totals[p]
                };
                Cell::Number(value / total)
            })
            .collect();
        av_ah.push_column(format!("{}_AV", name), cells);
    }

    // Base period for horizontal analysis: first period column encountered.
    if let Some((base_column, _)) = periods.first() {
        for (column, name) in &periods {
            let cells: Vec<Cell> = (0..table.rows.len())
                .map(|row| {
                    let value = table.number_at(row, *column).unwrap_or(f64::NAN);
                    let base = table.number_at(row, *base_column).unwrap_or(f64::NAN);
                    Cell::Number(value / base)
                })
                .collect();
            av_ah.push_column(format!("{}_AH", name), cells);
        }
    }

    let projection = project(table, &resolved, &periods);

    Ok(AnalysisResult { av_ah, projection })
}

fn resolve_mode(table: &DataTable, mode: AnalysisMode) -> Result<ResolvedMode> {
    match mode {
        AnalysisMode::Aggregated => {
            let label_index = CATEGORY_COLUMN_CANDIDATES
                .iter()
                .find_map(|name| table.column_index(name))
                .ok_or(StatementError::MissingCategoryColumn(
                    CATEGORY_COLUMN_CANDIDATES,
                ))?;
            Ok(ResolvedMode::Aggregated { label_index })
        }
        AnalysisMode::Detailed => {
            let label_index = table
                .column_index(ACCOUNT_COLUMN)
                .ok_or_else(|| StatementError::MissingColumn(ACCOUNT_COLUMN.to_string()))?;
            let category_index = CATEGORY_COLUMN_CANDIDATES
                .iter()
                .find_map(|name| table.column_index(name));
            Ok(ResolvedMode::Detailed {
                label_index,
                category_index,
            })
        }
    }
}

fn label_of(table: &DataTable, resolved: &ResolvedMode, row: usize) -> String {
    let index = match resolved {
        ResolvedMode::Aggregated { label_index } => *label_index,
        ResolvedMode::Detailed { label_index, .. } => *label_index,
    };
    match &table.rows[row][index] {
        Cell::Text(s) => s.clone(),
        Cell::Number(v) => v.to_string(),
        Cell::Empty => String::new(),
    }
}

/// Asset and liability totals per period. Missing total rows leave the total
/// at zero so that downstream division stays well-defined (as infinity/NaN).
fn period_totals(
    table: &DataTable,
    resolved: &ResolvedMode,
    periods: &[(usize, String)],
) -> (Vec<f64>, Vec<f64>) {
    let mut assets = vec![0.0; periods.len()];
    let mut liabilities = vec![0.0; periods.len()];

    match resolved {
        ResolvedMode::Aggregated { label_index } => {
            for row in 0..table.rows.len() {
                // Rows outside both category sets contribute to neither total.
                let label = table.rows[row][*label_index].as_text().unwrap_or("");
                let target = if ASSET_CATEGORIES.contains(&label) {
                    &mut assets
                } else if LIABILITY_CATEGORIES.contains(&label) {
                    &mut liabilities
                } else {
                    continue;
                };
                for (p, (column, _)) in periods.iter().enumerate() {
                    let Some(value) = table.number_at(row, *column) else {
                        continue;
                    };
                    if value.is_finite() {
                        target[p] += value;
                    }
                }
            }
        }
        ResolvedMode::Detailed { .. } => {
            for row in 0..table.rows.len() {
                let label = normalize(&label_of(table, resolved, row));
                let target = match label.as_str() {
                    "ativo total" => &mut assets,
                    "passivo total" => &mut liabilities,
                    _ => continue,
                };
                for (p, (column, _)) in periods.iter().enumerate() {
                    if let Some(value) = table.number_at(row, *column) {
                        if value.is_finite() {
                            target[p] = value;
                        }
                    }
                }
            }
        }
    }

    (assets, liabilities)
}

fn row_is_asset(table: &DataTable, resolved: &ResolvedMode, row: usize) -> bool {
    match resolved {
        ResolvedMode::Aggregated { label_index } => table.rows[row][*label_index]
            .as_text()
            .is_some_and(|label| ASSET_CATEGORIES.contains(&label)),
        ResolvedMode::Detailed {
            category_index: Some(index),
            ..
        } => table.rows[row][*index]
            .as_text()
            .is_some_and(|label| ASSET_CATEGORIES.contains(&label)),
        ResolvedMode::Detailed {
            category_index: None,
            ..
        } => false,
    }
}

/// Naive forward projection: raw period values scaled by a fixed 5%, one
/// synthetic row per input row, labeled with [`PROJECTION_PREFIX`].
fn project(table: &DataTable, resolved: &ResolvedMode, periods: &[(usize, String)]) -> DataTable {
    let label_index = match resolved {
        ResolvedMode::Aggregated { label_index } => *label_index,
        ResolvedMode::Detailed { label_index, .. } => *label_index,
    };

    let mut columns = vec![table.columns[label_index].clone()];
    columns.extend(periods.iter().map(|(_, name)| name.clone()));
    let mut projection = DataTable::new(columns);

    for row in 0..table.rows.len() {
        let label = label_of(table, resolved, row);
        let mut cells = vec![Cell::Text(format!("{}{}", PROJECTION_PREFIX, label))];
        for (column, _) in periods {
            let value = table.number_at(row, *column).unwrap_or(f64::NAN);
            cells.push(Cell::Number(value * PROJECTION_GROWTH));
        }
        projection.push_row(cells);
    }

    projection
}
