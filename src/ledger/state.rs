use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    catalog::CatalogItem, category::CustomCategories, daily_note::DailyNote, flock::FlockEntry,
    ingredient::{default_ingredients, Ingredient},
    profile::Profile,
    transaction::Transaction,
};

/// Everything the controller holds for the session. Only the farm manager
/// and the services it calls mutate this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FarmState {
    #[serde(default)]
    pub profile: Option<Profile>,
    #[serde(default)]
    pub flocks: Vec<FlockEntry>,
    #[serde(default)]
    pub notes: Vec<DailyNote>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default = "default_ingredients")]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub custom_categories: CustomCategories,
    #[serde(default)]
    pub catalog: Vec<CatalogItem>,
}

impl Default for FarmState {
    fn default() -> Self {
        Self {
            profile: None,
            flocks: Vec::new(),
            notes: Vec::new(),
            transactions: Vec::new(),
            ingredients: default_ingredients(),
            custom_categories: CustomCategories::default(),
            catalog: Vec::new(),
        }
    }
}

impl FarmState {
    pub fn email(&self) -> Option<&str> {
        self.profile.as_ref().map(|profile| profile.email.as_str())
    }

    pub fn flock(&self, id: Uuid) -> Option<&FlockEntry> {
        self.flocks.iter().find(|flock| flock.id == id)
    }

    pub fn flock_mut(&mut self, id: Uuid) -> Option<&mut FlockEntry> {
        self.flocks.iter_mut().find(|flock| flock.id == id)
    }

    /// Finds a flock by exact id text or case-insensitive name.
    pub fn find_flock(&self, reference: &str) -> Option<&FlockEntry> {
        let needle = reference.trim();
        if let Ok(id) = Uuid::parse_str(needle) {
            return self.flock(id);
        }
        let lowered = needle.to_lowercase();
        self.flocks
            .iter()
            .find(|flock| flock.name.to_lowercase() == lowered)
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn catalog_item(&self, id: Uuid) -> Option<&CatalogItem> {
        self.catalog.iter().find(|item| item.id == id)
    }

    pub fn find_catalog_item(&self, reference: &str) -> Option<&CatalogItem> {
        let needle = reference.trim();
        if let Ok(id) = Uuid::parse_str(needle) {
            return self.catalog_item(id);
        }
        let lowered = needle.to_lowercase();
        self.catalog
            .iter()
            .find(|item| item.name.to_lowercase() == lowered)
    }

    pub fn live_birds(&self) -> u64 {
        self.flocks.iter().map(|flock| u64::from(flock.quantity)).sum()
    }

    /// Replaces the store-backed collections wholesale. Local-only data
    /// (ingredients, categories, catalog) is kept.
    pub fn replace_records(
        &mut self,
        profile: Option<Profile>,
        flocks: Vec<FlockEntry>,
        transactions: Vec<Transaction>,
        notes: Vec<DailyNote>,
    ) {
        self.profile = profile;
        self.flocks = flocks;
        self.transactions = transactions;
        self.notes = notes;
    }

    pub fn clear_records(&mut self) {
        self.replace_records(None, Vec::new(), Vec::new(), Vec::new());
    }
}
