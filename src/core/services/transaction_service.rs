//! Business logic helpers for bookkeeping entries.

use crate::core::services::{ServiceError, ServiceResult, SummaryService};
use crate::ledger::{
    CatalogItem, DatePeriod, FarmState, IsoDate, KindFilter, Transaction, TransactionForm,
    TransactionKind,
};

const DEFAULT_QTY: f64 = 1.0;

/// Builds and lists transactions.
pub struct TransactionService;

impl TransactionService {
    /// Validates a form and turns it into a transaction. The item name
    /// falls back to the category and quantity defaults to one.
    pub fn build(form: &TransactionForm) -> ServiceResult<Transaction> {
        let category = form.category.trim();
        let item_name = form
            .item_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(category);
        if item_name.is_empty() {
            return Err(ServiceError::Invalid("A category is required".into()));
        }
        let qty = form.qty.unwrap_or(DEFAULT_QTY);
        if !qty.is_finite() || qty <= 0.0 {
            return Err(ServiceError::Invalid(format!(
                "Quantity must be positive (got {qty})"
            )));
        }
        if !form.unit_price.is_finite() || form.unit_price < 0.0 {
            return Err(ServiceError::Invalid(format!(
                "Unit price must not be negative (got {})",
                form.unit_price
            )));
        }
        Ok(
            Transaction::new(form.kind, item_name, qty, form.unit_price, form.date.clone())
                .with_description(form.description.clone()),
        )
    }

    pub fn from_catalog(item: &CatalogItem, qty: f64, date: IsoDate) -> ServiceResult<Transaction> {
        if !qty.is_finite() || qty <= 0.0 {
            return Err(ServiceError::Invalid(format!(
                "Quantity must be positive (got {qty})"
            )));
        }
        Ok(item.instantiate(qty, date))
    }

    /// Transactions matching the kind tab and, optionally, a day or month.
    pub fn list<'a>(
        state: &'a FarmState,
        filter: KindFilter,
        period: Option<&DatePeriod>,
    ) -> Vec<&'a Transaction> {
        SummaryService::filter_by_kind(&state.transactions, filter)
            .into_iter()
            .filter(|txn| period.map_or(true, |period| period.matches(&txn.date)))
            .collect()
    }

    pub fn catalog_item(
        name: &str,
        unit: &str,
        base_price: f64,
        kind: TransactionKind,
    ) -> ServiceResult<CatalogItem> {
        if name.trim().is_empty() {
            return Err(ServiceError::Invalid("Catalog item name is required".into()));
        }
        if !base_price.is_finite() || base_price < 0.0 {
            return Err(ServiceError::Invalid(format!(
                "Base price must not be negative (got {base_price})"
            )));
        }
        let unit = if unit.trim().is_empty() { "un" } else { unit.trim() };
        Ok(CatalogItem::new(name.trim(), unit, base_price, kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(item_name: Option<&str>, qty: Option<f64>, price: f64) -> TransactionForm {
        TransactionForm {
            kind: TransactionKind::Outflow,
            category: "Ração".into(),
            item_name: item_name.map(str::to_string),
            qty,
            unit_price: price,
            date: IsoDate::parse("2024-06-01").unwrap(),
            description: Some("   ".into()),
        }
    }

    #[test]
    fn item_name_falls_back_to_category() {
        let txn = TransactionService::build(&form(Some(" "), None, 80.0)).unwrap();
        assert_eq!(txn.item_name, "Ração");
        assert_eq!(txn.qty, 1.0);
        assert_eq!(txn.total(), 80.0);
        assert!(txn.description.is_none());
    }

    #[test]
    fn negative_price_is_rejected() {
        let err = TransactionService::build(&form(None, Some(2.0), -1.0)).unwrap_err();
        assert!(matches!(err, ServiceError::Invalid(_)));
    }

    #[test]
    fn list_combines_kind_and_period() {
        let mut state = FarmState::default();
        let day = |d: &str| IsoDate::parse(d).unwrap();
        state.transactions = vec![
            Transaction::new(TransactionKind::Inflow, "Venda de Ovos", 1.0, 10.0, day("2024-06-01")),
            Transaction::new(TransactionKind::Outflow, "Ração", 1.0, 5.0, day("2024-06-01")),
            Transaction::new(TransactionKind::Inflow, "Venda de Aves", 1.0, 7.0, day("2024-05-30")),
        ];
        let june = DatePeriod::parse("2024-06").unwrap();
        let inflows = TransactionService::list(
            &state,
            KindFilter::Only(TransactionKind::Inflow),
            Some(&june),
        );
        assert_eq!(inflows.len(), 1);
        assert_eq!(inflows[0].item_name, "Venda de Ovos");
        assert_eq!(TransactionService::list(&state, KindFilter::All, None).len(), 3);
    }
}
