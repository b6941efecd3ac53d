use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::date::IsoDate;
use super::transaction::{Transaction, TransactionKind};

/// Reusable template from which transactions are instantiated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogItem {
    pub id: Uuid,
    pub name: String,
    pub unit: String,
    pub base_price: f64,
    pub kind: TransactionKind,
}

impl CatalogItem {
    pub fn new(
        name: impl Into<String>,
        unit: impl Into<String>,
        base_price: f64,
        kind: TransactionKind,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            unit: unit.into(),
            base_price,
            kind,
        }
    }

    /// Builds a transaction priced at the item's base price.
    pub fn instantiate(&self, qty: f64, date: IsoDate) -> Transaction {
        Transaction::new(self.kind, self.name.clone(), qty, self.base_price, date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instantiate_uses_base_price_and_fixed_kind() {
        let item = CatalogItem::new("Bandeja 30 ovos", "bandeja", 12.0, TransactionKind::Inflow);
        let txn = item.instantiate(3.0, IsoDate::parse("2024-06-15").unwrap());
        assert_eq!(txn.total(), 36.0);
        assert_eq!(txn.kind, TransactionKind::Inflow);
        assert_eq!(txn.item_name, "Bandeja 30 ovos");
    }
}
