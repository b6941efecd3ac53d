use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::date::IsoDate;

/// A bookkeeping entry. The total is always derived from quantity and unit
/// price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub date: IsoDate,
    pub kind: TransactionKind,
    pub item_name: String,
    pub qty: f64,
    pub unit_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Transaction {
    pub fn new(
        kind: TransactionKind,
        item_name: impl Into<String>,
        qty: f64,
        unit_price: f64,
        date: IsoDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            kind,
            item_name: item_name.into(),
            qty,
            unit_price,
            description: None,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description.filter(|text| !text.trim().is_empty());
        self
    }

    pub fn total(&self) -> f64 {
        self.qty * self.unit_price
    }

    /// Signed contribution to the balance.
    pub fn signed_total(&self) -> f64 {
        match self.kind {
            TransactionKind::Inflow => self.total(),
            TransactionKind::Outflow => -self.total(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    #[serde(rename = "receita", alias = "income", alias = "inflow")]
    Inflow,
    #[serde(rename = "despesa", alias = "expense", alias = "outflow")]
    Outflow,
}

impl TransactionKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "receita" | "income" | "inflow" | "in" => Some(TransactionKind::Inflow),
            "despesa" | "expense" | "outflow" | "out" => Some(TransactionKind::Outflow),
            _ => None,
        }
    }

    pub fn wire_name(self) -> &'static str {
        match self {
            TransactionKind::Inflow => "receita",
            TransactionKind::Outflow => "despesa",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransactionKind::Inflow => "Receita",
            TransactionKind::Outflow => "Despesa",
        })
    }
}

/// Tab selection used by transaction listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KindFilter {
    #[default]
    All,
    Only(TransactionKind),
}

impl KindFilter {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "todos" | "all" => Some(KindFilter::All),
            other => TransactionKind::parse(other).map(KindFilter::Only),
        }
    }

    pub fn accepts(self, kind: TransactionKind) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Only(expected) => expected == kind,
        }
    }
}

/// Raw user input for a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionForm {
    pub kind: TransactionKind,
    pub category: String,
    pub item_name: Option<String>,
    pub qty: Option<f64>,
    pub unit_price: f64,
    pub date: IsoDate,
    pub description: Option<String>,
}
