use crate::error::{Result, StatementError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single table cell: free text, a numeric amount, or an explicit null.
///
/// Unparseable amounts are represented as `Number(f64::NAN)` so that a period
/// column stays numeric; `Empty` is reserved for genuinely absent values such
/// as the category of an unclassified account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

impl Cell {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Cell::Number(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Cell::Text(_))
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

/// Generic in-memory table exchanged between pipeline stages.
///
/// Column order is significant: the first column of a raw statement holds
/// account names, and the horizontal-analysis base period is the first period
/// column encountered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DataTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// Typed column manifest produced by [`DataTable::infer_schema`].
///
/// Later stages consume the manifest instead of re-inferring column roles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TableSchema {
    pub name_column: String,
    pub period_columns: Vec<String>,
}

impl DataTable {
    pub fn new<S: Into<String>>(columns: Vec<S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    /// Appends a column at the end of the table. `cells` must have one entry
    /// per existing row.
    pub fn push_column<S: Into<String>>(&mut self, name: S, cells: Vec<Cell>) {
        debug_assert_eq!(cells.len(), self.rows.len());
        self.columns.push(name.into());
        for (row, cell) in self.rows.iter_mut().zip(cells) {
            row.push(cell);
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn column_cells(&self, index: usize) -> impl Iterator<Item = &Cell> {
        self.rows.iter().map(move |row| &row[index])
    }

    /// A column is numeric when every cell in it holds a number.
    pub fn is_numeric_column(&self, index: usize) -> bool {
        self.column_cells(index).all(Cell::is_number)
    }

    /// A column is textual when every cell in it holds text.
    pub fn is_text_column(&self, index: usize) -> bool {
        self.column_cells(index).all(Cell::is_text)
    }

    /// Indices and names of all numeric columns, in table order.
    pub fn numeric_columns(&self) -> Vec<(usize, String)> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(i, _)| self.is_numeric_column(*i))
            .map(|(i, name)| (i, name.clone()))
            .collect()
    }

    pub fn number_at(&self, row: usize, column: usize) -> Option<f64> {
        self.rows.get(row).and_then(|r| r.get(column)).and_then(Cell::as_number)
    }

    /// Infers the column manifest for a raw statement table: the first column
    /// holds account names, every remaining column is a period column.
    pub fn infer_schema(&self) -> Result<TableSchema> {
        let (name_column, period_columns) = self
            .columns
            .split_first()
            .ok_or(StatementError::EmptyTable)?;

        Ok(TableSchema {
            name_column: name_column.clone(),
            period_columns: period_columns.to_vec(),
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(DataTable)
    }
}
