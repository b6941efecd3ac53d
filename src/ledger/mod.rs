//! Farm domain models: flocks, production notes, bookkeeping, and feed.

pub mod catalog;
pub mod category;
pub mod daily_note;
pub mod date;
pub mod flock;
pub mod ingredient;
pub mod profile;
pub mod state;
pub mod transaction;

pub use catalog::CatalogItem;
pub use category::{
    default_categories, CustomCategories, DEFAULT_INFLOW_CATEGORIES, DEFAULT_OUTFLOW_CATEGORIES,
};
pub use daily_note::{DailyNote, DailyNoteForm};
pub use date::{DatePeriod, IsoDate};
pub use flock::{AnimalPhase, FlockEntry, FlockStatus};
pub use ingredient::{default_ingredients, Ingredient};
pub use profile::{normalize_email, Profile, ProfileChanges, SubscriptionTier};
pub use state::FarmState;
pub use transaction::{KindFilter, Transaction, TransactionForm, TransactionKind};
