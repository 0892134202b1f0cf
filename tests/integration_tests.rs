use anyhow::Result;
use statement_analyzer::*;

const BP_CSV: &str = "\
Conta;X2022;X2023
Caixa e Equivalentes de Caixa;500,00;550,00
Contas a Receber;1.000,00;1.100,00
Imobilizado;2.000,00;2.100,00
Ativo Total;3.500,00;3.750,00
Fornecedores;600,00;650,00
Empréstimos e Financiamentos;400,00;420,00
Provisões;1.500,00;1.550,00
Capital Social;1.000,00;1.130,00
Passivo Total;3.500,00;3.750,00
";

const DRE_CSV: &str = "\
Conta;X2022;X2023
Receita Líquida de Vendas;10.000,00;11.000,00
Custo dos Produtos Vendidos;6.000,00;6.500,00
Lucro Bruto;4.000,00;4.500,00
Despesas Operacionais;2.500,00;2.700,00
Resultado Financeiro;(300,00);(350,00)
Lucro Líquido do Exercício;900,00;1.100,00
";

fn table_from_csv(data: &str) -> Result<DataTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .from_reader(data.as_bytes());

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut table = DataTable::new(columns);
    for record in reader.records() {
        let record = record?;
        table.push_row(record.iter().map(Cell::from).collect());
    }
    Ok(table)
}

#[test]
fn test_full_pipeline_from_csv() -> Result<()> {
    let bp = standardize_balance_sheet(&table_from_csv(BP_CSV)?)?;
    let dre = standardize_income_statement(&table_from_csv(DRE_CSV)?)?;

    // Total rows are not taxonomy entries: kept in the enriched table,
    // excluded from the aggregation.
    assert_eq!(bp.original.rows.len(), 9);
    assert_eq!(bp.aggregated.rows.len(), 7);
    assert_eq!(dre.aggregated.rows.len(), 6);

    let acf = lookup(Some(&bp.aggregated), "ACF", "X2022");
    assert_eq!(acf, Some(500.0));
    let financeiro = lookup(Some(&dre.aggregated), "RESULTADO_FINANCEIRO", "X2022");
    assert_eq!(financeiro, Some(-300.0));

    let report = compute_ratios(Some(&bp.aggregated), Some(&dre.aggregated))?;
    assert!(report.warnings.is_empty());

    let bp_ratios = report.bp_ratios.as_ref().unwrap();
    let lc = bp_ratios.get("Liquidez Corrente", "X2022").unwrap();
    assert!((lc - 1.5).abs() < 1e-9);
    let imob = bp_ratios.get("Imobilização do PL", "X2022").unwrap();
    assert!((imob - 2.0).abs() < 1e-9);

    let dre_ratios = report.dre_ratios.as_ref().unwrap();
    let operacional = dre_ratios.get("Margem Operacional", "X2022").unwrap();
    assert!((operacional - 0.12).abs() < 1e-9);

    let combined = report.combined_ratios.as_ref().unwrap();
    assert_eq!(combined.periods, vec!["X2022", "X2023"]);
    let roe = combined.get("ROE", "X2022").unwrap();
    assert!((roe - 0.9).abs() < 1e-9);
    let ebit_ativo = combined.get("EBIT/Ativo", "X2022").unwrap();
    assert!((ebit_ativo - 1200.0 / 3500.0).abs() < 1e-9);

    Ok(())
}

#[test]
fn test_aggregated_analysis_over_standardized_output() -> Result<()> {
    let bp = standardize_balance_sheet(&table_from_csv(BP_CSV)?)?;
    let analysis = analyze(&bp.aggregated, AnalysisMode::Aggregated)?;

    let av_index = analysis.av_ah.column_index("X2022_AV").unwrap();
    let asset_av_sum: f64 = analysis
        .av_ah
        .rows
        .iter()
        .filter(|row| {
            row[0]
                .as_text()
                .is_some_and(|c| ASSET_CATEGORIES.contains(&c))
        })
        .map(|row| row[av_index].as_number().unwrap())
        .sum();
    assert!((asset_av_sum - 1.0).abs() < 1e-9);

    let ah_index = analysis.av_ah.column_index("X2022_AH").unwrap();
    for row in &analysis.av_ah.rows {
        let base = row[ah_index].as_number().unwrap();
        assert!((base - 1.0).abs() < 1e-9);
    }

    assert_eq!(analysis.projection.rows.len(), 7);
    assert_eq!(
        analysis.projection.rows[0][0].as_text(),
        Some("Ano Seguinte_ACF")
    );

    Ok(())
}

#[test]
fn test_detailed_analysis_over_enriched_table() -> Result<()> {
    let bp = standardize_balance_sheet(&table_from_csv(BP_CSV)?)?;
    let analysis = analyze(&bp.original, AnalysisMode::Detailed)?;

    let av_index = analysis.av_ah.column_index("X2022_AV").unwrap();
    // Caixa / Ativo Total = 500 / 3500
    let caixa_av = analysis.av_ah.rows[0][av_index].as_number().unwrap();
    assert!((caixa_av - 500.0 / 3500.0).abs() < 1e-9);
    // Fornecedores / Passivo Total = 600 / 3500
    let fornecedores_av = analysis.av_ah.rows[4][av_index].as_number().unwrap();
    assert!((fornecedores_av - 600.0 / 3500.0).abs() < 1e-9);

    Ok(())
}

#[test]
fn test_ratio_report_with_missing_balance_sheet() -> Result<()> {
    let dre = standardize_income_statement(&table_from_csv(DRE_CSV)?)?;
    let report = compute_ratios(None, Some(&dre.aggregated))?;

    assert!(report.bp_ratios.is_none());
    assert!(report.combined_ratios.is_none());
    assert!(report.dre_ratios.is_some());

    let dre_ratios = report.dre_ratios.unwrap();
    let bruta = dre_ratios.get("Margem Bruta", "X2023").unwrap();
    assert!((bruta - 4500.0 / 11000.0).abs() < 1e-9);

    Ok(())
}

#[test]
fn test_report_serializes_to_json() -> Result<()> {
    let bp = standardize_balance_sheet(&table_from_csv(BP_CSV)?)?;
    let report = compute_ratios(Some(&bp.aggregated), None)?;

    let json = report.to_json()?;
    assert!(json.contains("Liquidez Corrente"));
    assert!(json.contains("bp_ratios"));

    Ok(())
}
