use crate::normalize::normalize;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Balance Sheet categories counted as assets when computing totals.
pub const ASSET_CATEGORIES: &[&str] = &["ACO", "ACF", "ANC"];

/// Balance Sheet categories counted as liabilities/equity when computing totals.
pub const LIABILITY_CATEGORIES: &[&str] = &["PCO", "PCF", "PNC", "PL"];

/// One taxonomy category: a short code and the set of canonical account names
/// (stored normalized) that map to it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TaxonomyEntry {
    pub code: String,
    pub accounts: HashSet<String>,
}

/// An ordered mapping from category codes to canonical account-name sets.
///
/// One taxonomy exists per statement type. Taxonomies are immutable
/// configuration: built once, then shared by reference with the stages that
/// classify accounts. Canonical sets are expected to be disjoint; if that is
/// ever violated, the first matching category wins.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Taxonomy {
    entries: Vec<TaxonomyEntry>,
}

impl Taxonomy {
    /// Builds a taxonomy from `(code, canonical names)` pairs, normalizing
    /// every canonical name so that lookups are accent- and case-insensitive.
    pub fn new<I, C, N>(entries: I) -> Self
    where
        I: IntoIterator<Item = (C, Vec<N>)>,
        C: Into<String>,
        N: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|(code, names)| TaxonomyEntry {
                code: code.into(),
                accounts: names.iter().map(|n| normalize(n.as_ref())).collect(),
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[TaxonomyEntry] {
        &self.entries
    }

    /// Maps an account name to its category code via exact match of the
    /// normalized name. Returns `None` for unmapped names, never an error.
    pub fn classify(&self, name: &str) -> Option<&str> {
        let key = normalize(name);
        self.entries
            .iter()
            .find(|entry| entry.accounts.contains(&key))
            .map(|entry| entry.code.as_str())
    }

    /// Built-in Balance Sheet taxonomy (Brazilian account names).
    pub fn balance_sheet() -> Self {
        Self::new([
            (
                "ACF",
                vec![
                    "caixa e equivalentes de caixa",
                    "caixa e bancos",
                    "aplicacoes financeiras",
                ],
            ),
            (
                "ACO",
                vec![
                    "contas a receber",
                    "clientes",
                    "estoques",
                    "tributos a recuperar",
                    "adiantamentos a fornecedores",
                    "despesas antecipadas",
                    "outros ativos circulantes",
                ],
            ),
            (
                "ANC",
                vec![
                    "realizavel a longo prazo",
                    "investimentos",
                    "imobilizado",
                    "intangivel",
                    "ativo nao circulante",
                ],
            ),
            (
                "PCF",
                vec![
                    "emprestimos e financiamentos",
                    "debentures",
                    "dividendos a pagar",
                ],
            ),
            (
                "PCO",
                vec![
                    "fornecedores",
                    "obrigacoes trabalhistas",
                    "obrigacoes tributarias",
                    "salarios a pagar",
                    "adiantamentos de clientes",
                    "outros passivos circulantes",
                ],
            ),
            (
                "PNC",
                vec![
                    "emprestimos e financiamentos de longo prazo",
                    "tributos diferidos",
                    "provisoes",
                    "passivo nao circulante",
                ],
            ),
            (
                "PL",
                vec![
                    "capital social",
                    "reservas de capital",
                    "reservas de lucros",
                    "lucros ou prejuizos acumulados",
                    "ajustes de avaliacao patrimonial",
                    "patrimonio liquido",
                ],
            ),
        ])
    }

    /// Built-in Income Statement taxonomy (Brazilian account names).
    pub fn income_statement() -> Self {
        Self::new([
            (
                "RECEITA_BRUTA",
                vec!["receita bruta de vendas", "receita operacional bruta"],
            ),
            (
                "DEDUCOES",
                vec![
                    "deducoes da receita bruta",
                    "impostos sobre vendas",
                    "devolucoes e abatimentos",
                ],
            ),
            (
                "RECEITA_LIQUIDA",
                vec!["receita liquida de vendas", "receita operacional liquida"],
            ),
            (
                "CUSTO_VENDAS",
                vec![
                    "custo dos bens e servicos vendidos",
                    "custo das mercadorias vendidas",
                    "custo dos produtos vendidos",
                ],
            ),
            ("LUCRO_BRUTO", vec!["lucro bruto", "resultado bruto"]),
            (
                "DESPESAS_OPERACIONAIS",
                vec![
                    "despesas operacionais",
                    "despesas com vendas",
                    "despesas gerais e administrativas",
                ],
            ),
            (
                "OUTRAS_RECEITAS",
                vec!["outras receitas operacionais", "outras receitas"],
            ),
            (
                "OUTRAS_DESPESAS",
                vec!["outras despesas operacionais", "outras despesas"],
            ),
            (
                "RESULTADO_FINANCEIRO",
                vec!["resultado financeiro", "resultado financeiro liquido"],
            ),
            (
                "RESULTADO_ANTES_IR",
                vec![
                    "resultado antes dos tributos sobre o lucro",
                    "lucro antes do imposto de renda",
                ],
            ),
            (
                "IMPOSTO_RENDA",
                vec![
                    "imposto de renda e contribuicao social",
                    "provisao para ir e csll",
                ],
            ),
            (
                "RESULTADO_LIQUIDO",
                vec![
                    "lucro liquido do exercicio",
                    "prejuizo liquido do exercicio",
                    "resultado liquido do exercicio",
                ],
            ),
        ])
    }
}
