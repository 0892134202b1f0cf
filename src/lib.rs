//! # Statement Analyzer
//!
//! A library for standardizing raw, locale-formatted financial statements
//! (Balance Sheet and Income Statement) into a normalized account taxonomy,
//! aggregating values by accounting category and deriving financial ratios.
//!
//! ## Core Concepts
//!
//! - **Raw table**: account names in the first column, locale-formatted amount
//!   strings (Brazilian format, e.g. `"(1.234,56)"` = −1234.56) or plain
//!   numbers in the remaining period columns
//! - **Taxonomy**: immutable mapping from category codes (ACF, PCO, PL,
//!   RECEITA_LIQUIDA, ...) to canonical account names, one per statement type
//! - **Standardization**: normalize names → decode amounts → classify →
//!   aggregate per category
//! - **Analysis**: vertical (proportion of total) and horizontal (evolution
//!   against a base period) views plus a naive next-period projection
//! - **Ratios**: liquidity, leverage, margin and DuPont indicators with
//!   division-by-zero and missing-category guards
//!
//! ## Example
//!
//! ```rust
//! use statement_analyzer::*;
//!
//! let mut table = DataTable::new(vec!["Conta", "X2022"]);
//! table.push_row(vec!["Caixa e equivalentes de caixa".into(), "1.000,00".into()]);
//! table.push_row(vec!["Fornecedores".into(), "(500,00)".into()]);
//!
//! let statement = standardize_balance_sheet(&table).unwrap();
//! let analysis = analyze(&statement.aggregated, AnalysisMode::Aggregated).unwrap();
//! let report = compute_ratios(Some(&statement.aggregated), None).unwrap();
//! ```

pub mod analysis;
pub mod decode;
pub mod error;
pub mod normalize;
pub mod ratios;
pub mod standardize;
pub mod table;
pub mod taxonomy;

pub use analysis::{analyze, AnalysisMode, AnalysisResult, CATEGORY_COLUMN_CANDIDATES, PROJECTION_PREFIX};
pub use decode::decode_amount;
pub use error::{Result, StatementError};
pub use normalize::normalize;
pub use ratios::{compute_ratios, lookup, safe_div, RatioReport, RatioRow, RatioTable, EBIT_CATEGORY};
pub use standardize::{StandardizedStatement, Standardizer, ACCOUNT_COLUMN, CATEGORY_COLUMN};
pub use table::{Cell, DataTable, TableSchema};
pub use taxonomy::{Taxonomy, TaxonomyEntry, ASSET_CATEGORIES, LIABILITY_CATEGORIES};

/// Standardizes a raw Balance Sheet table against the built-in BP taxonomy.
pub fn standardize_balance_sheet(table: &DataTable) -> Result<StandardizedStatement> {
    Standardizer::new(Taxonomy::balance_sheet()).standardize(table)
}

/// Standardizes a raw Income Statement table against the built-in DRE taxonomy.
pub fn standardize_income_statement(table: &DataTable) -> Result<StandardizedStatement> {
    Standardizer::new(Taxonomy::income_statement()).standardize(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_to_end_balance_sheet() {
        let mut table = DataTable::new(vec!["Conta", "X2022"]);
        table.push_row(vec![
            "Caixa e equivalentes de caixa".into(),
            "1.000,00".into(),
        ]);
        table.push_row(vec!["Fornecedores".into(), "(500,00)".into()]);

        let statement = standardize_balance_sheet(&table).unwrap();

        assert_eq!(statement.aggregated.rows.len(), 2);
        assert_eq!(
            statement.aggregated.rows[0][0],
            Cell::Text("ACF".to_string())
        );
        assert_eq!(statement.aggregated.rows[0][1], Cell::Number(1000.0));
        assert_eq!(
            statement.aggregated.rows[1][0],
            Cell::Text("PCO".to_string())
        );
        assert_eq!(statement.aggregated.rows[1][1], Cell::Number(-500.0));
    }

    #[test]
    fn test_standardized_output_feeds_analyzer_and_ratios() {
        let mut table = DataTable::new(vec!["Conta", "X2022", "X2023"]);
        table.push_row(vec!["Caixa e Bancos".into(), "500,00".into(), "550,00".into()]);
        table.push_row(vec!["Estoques".into(), "1.000,00".into(), "1.200,00".into()]);
        table.push_row(vec!["Imobilizado".into(), "2.000,00".into(), "2.000,00".into()]);
        table.push_row(vec!["Fornecedores".into(), "600,00".into(), "700,00".into()]);
        table.push_row(vec!["Capital Social".into(), "2.900,00".into(), "3.050,00".into()]);

        let statement = standardize_balance_sheet(&table).unwrap();

        let analysis = analyze(&statement.aggregated, AnalysisMode::Aggregated).unwrap();
        assert!(analysis.av_ah.column_index("X2022_AV").is_some());
        assert!(analysis.av_ah.column_index("X2023_AH").is_some());
        assert_eq!(analysis.projection.rows.len(), statement.aggregated.rows.len());

        let report = compute_ratios(Some(&statement.aggregated), None).unwrap();
        let bp = report.bp_ratios.unwrap();
        // (ACO + ACF) / (PCO + PCF): PCF absent, so the ratio has no value
        assert_eq!(bp.get("Liquidez Corrente", "X2022"), None);
        // ANC / PL = 2000 / 2900
        let imobilizacao = bp.get("Imobilização do PL", "X2022").unwrap();
        assert!((imobilizacao - 2000.0 / 2900.0).abs() < 1e-9);
    }
}
