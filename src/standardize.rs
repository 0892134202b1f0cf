use crate::decode::decode_amount;
use crate::error::Result;
use crate::normalize::normalize;
use crate::table::{Cell, DataTable};
use crate::taxonomy::Taxonomy;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Canonical name of the account-name column in standardized output.
pub const ACCOUNT_COLUMN: &str = "conta";

/// Canonical name of the category column in standardized output.
pub const CATEGORY_COLUMN: &str = "categoria";

/// Output of [`Standardizer::standardize`].
///
/// `aggregated` has columns `["categoria", <period>...]`, one row per distinct
/// category in first-seen order. `original` is the enriched input table with
/// columns `["conta", "categoria", <period>...]`; unclassified rows carry an
/// empty category cell and do not contribute to `aggregated`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardizedStatement {
    pub aggregated: DataTable,
    pub original: DataTable,
}

/// Standardizes a raw statement table: normalizes account names, decodes
/// locale-formatted amounts, classifies each account against a taxonomy and
/// aggregates values per category.
pub struct Standardizer {
    taxonomy: Taxonomy,
}

impl Standardizer {
    pub fn new(taxonomy: Taxonomy) -> Self {
        Self { taxonomy }
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn standardize(&self, table: &DataTable) -> Result<StandardizedStatement> {
        let schema = table.infer_schema()?;
        let period_count = schema.period_columns.len();

        // Account names, normalized once and reused for classification.
        let names: Vec<String> = table
            .column_cells(0)
            .map(|cell| match cell {
                Cell::Text(s) => normalize(s),
                Cell::Number(v) => normalize(&v.to_string()),
                Cell::Empty => String::new(),
            })
            .collect();

        // Decode period columns. Textual columns go through the locale
        // decoder; columns that already hold numbers pass through unchanged.
        // A malformed cell degrades to NaN instead of failing the table.
        let mut values: Vec<Vec<f64>> = vec![Vec::with_capacity(period_count); names.len()];
        for (offset, period) in schema.period_columns.iter().enumerate() {
            let index = offset + 1;
            debug!(
                "Period column '{}': {}",
                period,
                if table.is_text_column(index) {
                    "decoding locale-formatted text"
                } else {
                    "numeric pass-through"
                }
            );

            for (row, cell) in table.column_cells(index).enumerate() {
                let value = match cell {
                    Cell::Number(v) => *v,
                    Cell::Text(s) => decode_amount(s).unwrap_or_else(|_| {
                        warn!(
                            "Unparseable amount '{}' in column '{}' (account '{}')",
                            s, period, names[row]
                        );
                        f64::NAN
                    }),
                    Cell::Empty => f64::NAN,
                };
                values[row].push(value);
            }
        }

        let categories: Vec<Option<String>> = names
            .iter()
            .map(|name| self.taxonomy.classify(name).map(str::to_string))
            .collect();

        // Single-pass aggregation, NaN-safe, preserving first-seen category
        // order for deterministic output.
        let mut order: Vec<String> = Vec::new();
        let mut sums: HashMap<String, Vec<f64>> = HashMap::new();
        for (row, category) in categories.iter().enumerate() {
            let Some(code) = category else { continue };
            let totals = sums.entry(code.clone()).or_insert_with(|| {
                order.push(code.clone());
                vec![0.0; period_count]
            });
            for (i, value) in values[row].iter().enumerate() {
                if value.is_finite() {
                    totals[i] += value;
                }
            }
        }

        let mut aggregated = DataTable::new(
            std::iter::once(CATEGORY_COLUMN.to_string())
                .chain(schema.period_columns.iter().cloned())
                .collect::<Vec<_>>(),
        );
        for code in &order {
            let mut row: Vec<Cell> = vec![Cell::Text(code.clone())];
            row.extend(sums[code].iter().map(|v| Cell::Number(*v)));
            aggregated.push_row(row);
        }

        let mut original = DataTable::new(
            [ACCOUNT_COLUMN.to_string(), CATEGORY_COLUMN.to_string()]
                .into_iter()
                .chain(schema.period_columns.iter().cloned())
                .collect::<Vec<_>>(),
        );
        for (row, name) in names.iter().enumerate() {
            let category_cell = match &categories[row] {
                Some(code) => Cell::Text(code.clone()),
                None => Cell::Empty,
            };
            let mut cells: Vec<Cell> = vec![Cell::Text(name.clone()), category_cell];
            cells.extend(values[row].iter().map(|v| Cell::Number(*v)));
            original.push_row(cells);
        }

        let unclassified = categories.iter().filter(|c| c.is_none()).count();
        info!(
            "Standardization complete: {} rows, {} categories, {} unclassified",
            names.len(),
            order.len(),
            unclassified
        );

        Ok(StandardizedStatement {
            aggregated,
            original,
        })
    }
}
