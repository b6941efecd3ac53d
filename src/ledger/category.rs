use serde::{Deserialize, Serialize};

use super::transaction::TransactionKind;

pub const DEFAULT_INFLOW_CATEGORIES: [&str; 4] =
    ["Venda de Ovos", "Venda de Aves", "Venda de Esterco", "Outros"];

pub const DEFAULT_OUTFLOW_CATEGORIES: [&str; 8] = [
    "Ração",
    "Medicamentos",
    "Mão de Obra",
    "Energia Elétrica",
    "Água",
    "Manutenção",
    "Transporte",
    "Outros",
];

/// User-defined category labels, kept per transaction kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomCategories {
    #[serde(default, rename = "receita")]
    pub inflow: Vec<String>,
    #[serde(default, rename = "despesa")]
    pub outflow: Vec<String>,
}

impl CustomCategories {
    pub fn for_kind(&self, kind: TransactionKind) -> &[String] {
        match kind {
            TransactionKind::Inflow => &self.inflow,
            TransactionKind::Outflow => &self.outflow,
        }
    }

    pub fn for_kind_mut(&mut self, kind: TransactionKind) -> &mut Vec<String> {
        match kind {
            TransactionKind::Inflow => &mut self.inflow,
            TransactionKind::Outflow => &mut self.outflow,
        }
    }
}

pub fn default_categories(kind: TransactionKind) -> &'static [&'static str] {
    match kind {
        TransactionKind::Inflow => &DEFAULT_INFLOW_CATEGORIES,
        TransactionKind::Outflow => &DEFAULT_OUTFLOW_CATEGORIES,
    }
}
