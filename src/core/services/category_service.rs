use crate::ledger::{default_categories, CustomCategories, TransactionKind};

use super::{ServiceError, ServiceResult};

pub struct CategoryService;

impl CategoryService {
    /// Defaults followed by custom labels, without repeating an exact
    /// string and keeping the first occurrence's position.
    pub fn all_categories(custom: &CustomCategories, kind: TransactionKind) -> Vec<String> {
        let mut merged: Vec<String> = Vec::new();
        let candidates = default_categories(kind)
            .iter()
            .map(|label| label.to_string())
            .chain(custom.for_kind(kind).iter().cloned());
        for label in candidates {
            if !merged.contains(&label) {
                merged.push(label);
            }
        }
        merged
    }

    /// Adds a custom label. Returns `false` when the trimmed name is already
    /// offered for this kind.
    pub fn add_custom(
        custom: &mut CustomCategories,
        kind: TransactionKind,
        name: &str,
    ) -> ServiceResult<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::Invalid("Category name is required".into()));
        }
        if Self::all_categories(custom, kind).iter().any(|label| label == name) {
            return Ok(false);
        }
        custom.for_kind_mut(kind).push(name.to_string());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{DEFAULT_INFLOW_CATEGORIES, DEFAULT_OUTFLOW_CATEGORIES};

    #[test]
    fn defaults_come_first_and_duplicates_are_dropped() {
        let custom = CustomCategories {
            inflow: vec!["Outros".into(), "Venda de Pintinhos".into(), "Venda de Pintinhos".into()],
            outflow: Vec::new(),
        };
        let merged = CategoryService::all_categories(&custom, TransactionKind::Inflow);
        assert_eq!(merged.len(), DEFAULT_INFLOW_CATEGORIES.len() + 1);
        assert_eq!(merged[0], "Venda de Ovos");
        assert_eq!(merged.last().map(String::as_str), Some("Venda de Pintinhos"));
    }

    #[test]
    fn dedup_is_case_sensitive() {
        let custom = CustomCategories {
            inflow: Vec::new(),
            outflow: vec!["ração".into()],
        };
        let merged = CategoryService::all_categories(&custom, TransactionKind::Outflow);
        assert_eq!(merged.len(), DEFAULT_OUTFLOW_CATEGORIES.len() + 1);
    }

    #[test]
    fn add_custom_trims_and_ignores_repeats() {
        let mut custom = CustomCategories::default();
        assert!(CategoryService::add_custom(&mut custom, TransactionKind::Outflow, "  Vacinas ").unwrap());
        assert!(!CategoryService::add_custom(&mut custom, TransactionKind::Outflow, "Vacinas").unwrap());
        assert!(!CategoryService::add_custom(&mut custom, TransactionKind::Outflow, "Água").unwrap());
        assert!(CategoryService::add_custom(&mut custom, TransactionKind::Outflow, " ").is_err());
        assert_eq!(custom.outflow, vec!["Vacinas".to_string()]);
    }
}
