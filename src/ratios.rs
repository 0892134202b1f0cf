use crate::analysis::CATEGORY_COLUMN_CANDIDATES;
use crate::error::{Result, StatementError};
use crate::table::{Cell, DataTable};
use log::warn;
use serde::{Deserialize, Serialize};

/// Synthetic category appended to the DRE table before ratio computation.
pub const EBIT_CATEGORY: &str = "EBIT";

/// One computed ratio across periods. `None` is the "no value" marker for a
/// missing category or a guarded division.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioRow {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Ratios laid out as one row per indicator, one value per period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioTable {
    pub periods: Vec<String>,
    pub rows: Vec<RatioRow>,
}

impl RatioTable {
    fn new(periods: Vec<String>) -> Self {
        Self {
            periods,
            rows: Vec::new(),
        }
    }

    fn push<F: Fn(&str) -> Option<f64>>(&mut self, name: &str, formula: F) {
        let values = self.periods.iter().map(|p| formula(p)).collect();
        self.rows.push(RatioRow {
            name: name.to_string(),
            values,
        });
    }

    pub fn get(&self, name: &str, period: &str) -> Option<f64> {
        let column = self.periods.iter().position(|p| p == period)?;
        self.rows
            .iter()
            .find(|row| row.name == name)
            .and_then(|row| row.values[column])
    }

    pub fn to_csv(&self) -> String {
        let mut output = String::from("Indicador");
        for period in &self.periods {
            output.push_str(&format!(",{}", period));
        }
        output.push('\n');

        for row in &self.rows {
            output.push_str(&row.name);
            for value in &row.values {
                match value {
                    Some(v) => output.push_str(&format!(",{:.4}", v)),
                    None => output.push(','),
                }
            }
            output.push('\n');
        }

        output
    }

    pub fn to_markdown(&self) -> String {
        let mut output = String::from("| Indicador |");
        for period in &self.periods {
            output.push_str(&format!(" {} |", period));
        }
        output.push_str("\n|---|");
        for _ in &self.periods {
            output.push_str("---|");
        }
        output.push('\n');

        for row in &self.rows {
            output.push_str(&format!("| {} |", row.name));
            for value in &row.values {
                match value {
                    Some(v) => output.push_str(&format!(" {:.4} |", v)),
                    None => output.push_str(" - |"),
                }
            }
            output.push('\n');
        }

        output
    }
}

/// Output of [`compute_ratios`]. Each section is present only when its input
/// table(s) were supplied; `dre_with_ebit` is the DRE table enriched with the
/// derived EBIT row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioReport {
    pub bp_ratios: Option<RatioTable>,
    pub dre_ratios: Option<RatioTable>,
    pub combined_ratios: Option<RatioTable>,
    pub dre_with_ebit: Option<DataTable>,
    pub warnings: Vec<String>,
}

impl RatioReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Summed value for a category/period, or `None` when the table is absent,
/// lacks a category column, lacks the category, or holds a non-finite value.
/// Never an error.
pub fn lookup(table: Option<&DataTable>, category: &str, period: &str) -> Option<f64> {
    let table = table?;
    let category_column = category_column(table)?;
    let period_column = table.column_index(period)?;
    let row = table
        .rows
        .iter()
        .position(|r| r[category_column].as_text() == Some(category))?;
    table
        .number_at(row, period_column)
        .filter(|v| v.is_finite())
}

/// Division with a uniform guard: `None` when the divisor is missing or
/// exactly zero, or when the numerator is missing.
pub fn safe_div(numerator: Option<f64>, divisor: Option<f64>) -> Option<f64> {
    match (numerator, divisor) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d),
        _ => None,
    }
}

fn category_column(table: &DataTable) -> Option<usize> {
    CATEGORY_COLUMN_CANDIDATES
        .iter()
        .find_map(|name| table.column_index(name))
}

/// `None`-propagating sum: any missing operand makes the result missing.
fn sum(values: &[Option<f64>]) -> Option<f64> {
    values.iter().copied().sum()
}

fn period_names(table: &DataTable) -> Vec<String> {
    table
        .numeric_columns()
        .into_iter()
        .map(|(_, name)| name)
        .collect()
}

/// Computes liquidity, leverage, margin and DuPont ratios from aggregated
/// Balance Sheet (`bp`) and Income Statement (`dre`) tables.
///
/// Every ratio is computed independently per period; combined ratios use the
/// intersection of the two tables' period sets. Absent inputs narrow the
/// report instead of failing. The only fatal condition is a DRE table that
/// already contains an `EBIT` category.
pub fn compute_ratios(bp: Option<&DataTable>, dre: Option<&DataTable>) -> Result<RatioReport> {
    let mut warnings = Vec::new();

    let dre_with_ebit = match dre {
        Some(table) => Some(derive_ebit(table, &mut warnings)?),
        None => None,
    };

    let bp_ratios = bp.map(balance_sheet_ratios);
    let dre_ratios = dre_with_ebit.as_ref().map(income_statement_ratios);
    let combined_ratios = match (bp, dre_with_ebit.as_ref()) {
        (Some(bp), Some(dre)) => Some(combined_ratios_table(bp, dre)),
        _ => None,
    };

    Ok(RatioReport {
        bp_ratios,
        dre_ratios,
        combined_ratios,
        dre_with_ebit,
        warnings,
    })
}

/// Appends the synthetic `EBIT` category to a copy of the DRE table:
/// `LUCRO_BRUTO - DESPESAS_OPERACIONAIS + RESULTADO_FINANCEIRO` per period.
///
/// When a precondition category is missing, a warning is surfaced and the
/// table is returned without an EBIT row; EBIT-dependent ratios then resolve
/// to no value. A pre-existing `EBIT` category is an error.
fn derive_ebit(dre: &DataTable, warnings: &mut Vec<String>) -> Result<DataTable> {
    let mut enriched = dre.clone();

    let Some(category_column) = category_column(&enriched) else {
        let message = "DRE table has no category column; EBIT not derived".to_string();
        warn!("{}", message);
        warnings.push(message);
        return Ok(enriched);
    };

    if enriched
        .rows
        .iter()
        .any(|row| row[category_column].as_text() == Some(EBIT_CATEGORY))
    {
        return Err(StatementError::DuplicateCategory(EBIT_CATEGORY.to_string()));
    }

    let required = ["LUCRO_BRUTO", "DESPESAS_OPERACIONAIS", "RESULTADO_FINANCEIRO"];
    let missing: Vec<&str> = required
        .iter()
        .filter(|code| {
            !enriched
                .rows
                .iter()
                .any(|row| row[category_column].as_text() == Some(**code))
        })
        .copied()
        .collect();

    if !missing.is_empty() {
        let message = format!("Cannot derive EBIT, missing categories: {:?}", missing);
        warn!("{}", message);
        warnings.push(message);
        return Ok(enriched);
    }

    let mut cells: Vec<Cell> = vec![Cell::Empty; enriched.columns.len()];
    cells[category_column] = Cell::Text(EBIT_CATEGORY.to_string());
    for (column, period) in enriched.numeric_columns() {
        let value = sum(&[
            lookup(Some(&enriched), "LUCRO_BRUTO", &period),
            lookup(Some(&enriched), "DESPESAS_OPERACIONAIS", &period).map(|v| -v),
            lookup(Some(&enriched), "RESULTADO_FINANCEIRO", &period),
        ]);
        cells[column] = Cell::Number(value.unwrap_or(f64::NAN));
    }
    enriched.rows.push(cells);

    Ok(enriched)
}

fn balance_sheet_ratios(bp: &DataTable) -> RatioTable {
    let mut table = RatioTable::new(period_names(bp));
    let v = |category: &str, period: &str| lookup(Some(bp), category, period);

    table.push("Liquidez Corrente", |p| {
        safe_div(sum(&[v("ACO", p), v("ACF", p)]), sum(&[v("PCO", p), v("PCF", p)]))
    });
    table.push("Liquidez Seca", |p| {
        safe_div(v("ACO", p), sum(&[v("PCO", p), v("PCF", p)]))
    });
    table.push("Liquidez Imediata", |p| {
        safe_div(v("ACF", p), sum(&[v("PCO", p), v("PCF", p)]))
    });
    table.push("Endividamento Geral", |p| {
        safe_div(
            sum(&[v("PCO", p), v("PCF", p), v("PNC", p)]),
            sum(&[v("ACO", p), v("ACF", p), v("ANC", p)]),
        )
    });
    table.push("Composição do Endividamento", |p| {
        safe_div(
            sum(&[v("PCO", p), v("PCF", p)]),
            sum(&[v("PCO", p), v("PCF", p), v("PNC", p)]),
        )
    });
    table.push("Imobilização do PL", |p| safe_div(v("ANC", p), v("PL", p)));

    table
}

fn income_statement_ratios(dre: &DataTable) -> RatioTable {
    let mut table = RatioTable::new(period_names(dre));
    let v = |category: &str, period: &str| lookup(Some(dre), category, period);

    table.push("Margem Bruta", |p| {
        let gross = match (v("RECEITA_LIQUIDA", p), v("CUSTO_VENDAS", p)) {
            (Some(revenue), Some(cost)) => Some(revenue - cost),
            _ => None,
        };
        safe_div(gross, v("RECEITA_LIQUIDA", p))
    });
    table.push("Margem Operacional", |p| {
        safe_div(v(EBIT_CATEGORY, p), v("RECEITA_LIQUIDA", p))
    });
    table.push("Margem Líquida", |p| {
        safe_div(v("RESULTADO_LIQUIDO", p), v("RECEITA_LIQUIDA", p))
    });

    table
}

fn combined_ratios_table(bp: &DataTable, dre: &DataTable) -> RatioTable {
    let dre_periods = period_names(dre);
    let shared: Vec<String> = period_names(bp)
        .into_iter()
        .filter(|p| dre_periods.contains(p))
        .collect();

    let mut table = RatioTable::new(shared);
    let b = |category: &str, period: &str| lookup(Some(bp), category, period);
    let d = |category: &str, period: &str| lookup(Some(dre), category, period);
    let total_assets = |p: &str| sum(&[b("ACO", p), b("ACF", p), b("ANC", p)]);

    table.push("ROA", |p| safe_div(d("RESULTADO_LIQUIDO", p), total_assets(p)));
    table.push("ROE", |p| safe_div(d("RESULTADO_LIQUIDO", p), b("PL", p)));
    table.push("Giro do Ativo", |p| {
        safe_div(d("RECEITA_LIQUIDA", p), total_assets(p))
    });
    table.push("Alavancagem Financeira", |p| {
        safe_div(total_assets(p), b("PL", p))
    });
    table.push("EBIT/Ativo", |p| safe_div(d(EBIT_CATEGORY, p), total_assets(p)));

    table
}
