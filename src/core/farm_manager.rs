use std::collections::HashSet;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::advisory::{
    AdvisoryService, BiosecurityReport, BiosecurityRequest, FinanceAdvice, FinanceRequest,
    FlockPlan, FormulationResult, HandlingChecklist, HandlingRequest, InventoryReport,
    VetDiagnosis, VetRequest,
};
use crate::config::{Config, DEFAULT_FEED_GRAMS_PER_BIRD};
use crate::core::services::{
    CategoryService, Dashboard, FeedService, FinanceTotals, FlockForm, FlockService, NoteService,
    ProductionSummary, SummaryService, TransactionService,
};
use crate::errors::{FarmError, Result};
use crate::ledger::{
    normalize_email, AnimalPhase, CatalogItem, DailyNote, DailyNoteForm, DatePeriod, FarmState,
    FlockEntry, FlockStatus, IsoDate, KindFilter, Profile, ProfileChanges, SubscriptionTier,
    Transaction, TransactionForm, TransactionKind,
};
use crate::storage::{
    DailyNoteRow, FlockRow, ProfilePatch, ProfileRow, RecordStore, TransactionRow,
};

/// Everything a reload brings back from the store.
struct Records {
    profile: Profile,
    flocks: Vec<FlockEntry>,
    transactions: Vec<Transaction>,
    notes: Vec<DailyNote>,
}

/// Facade that owns the farm state and coordinates the store and advisory
/// collaborators. Every mutation of [`FarmState`] goes through here.
pub struct FarmManager {
    state: FarmState,
    session: Option<String>,
    store: Box<dyn RecordStore>,
    advisory: Option<Box<dyn AdvisoryService>>,
    admin_email: Option<String>,
    default_feed_grams: f64,
}

impl FarmManager {
    pub fn new(store: Box<dyn RecordStore>) -> Self {
        Self {
            state: FarmState::default(),
            session: None,
            store,
            advisory: None,
            admin_email: None,
            default_feed_grams: DEFAULT_FEED_GRAMS_PER_BIRD,
        }
    }

    pub fn with_advisory(mut self, advisory: Box<dyn AdvisoryService>) -> Self {
        self.advisory = Some(advisory);
        self
    }

    /// Swaps the advisory client, e.g. after its key changed.
    pub fn set_advisory(&mut self, advisory: Option<Box<dyn AdvisoryService>>) {
        self.advisory = advisory;
    }

    pub fn with_admin_email(mut self, email: Option<&str>) -> Self {
        self.admin_email = email
            .map(normalize_email)
            .filter(|email| !email.is_empty());
        self
    }

    /// Installs the locally kept lists (categories, catalog, ingredient
    /// prices) and settings from `config`.
    pub fn apply_config(&mut self, config: &Config) {
        self.state.custom_categories = config.custom_categories.clone();
        self.state.catalog = config.catalog.clone();
        self.state.ingredients = config.ingredients.clone();
        self.admin_email = config
            .admin_email
            .as_deref()
            .map(normalize_email)
            .filter(|email| !email.is_empty());
        if config.default_feed_grams_per_bird.is_finite() && config.default_feed_grams_per_bird > 0.0
        {
            self.default_feed_grams = config.default_feed_grams_per_bird;
        }
    }

    /// Copies the locally kept lists and the session email back into `config`.
    pub fn export_to_config(&self, config: &mut Config) {
        config.custom_categories = self.state.custom_categories.clone();
        config.catalog = self.state.catalog.clone();
        config.ingredients = self.state.ingredients.clone();
        config.last_email = self.session.clone();
    }

    pub fn state(&self) -> &FarmState {
        &self.state
    }

    pub fn session(&self) -> Option<&str> {
        self.session.as_deref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    pub fn has_advisory(&self) -> bool {
        self.advisory.is_some()
    }

    pub fn store_label(&self) -> String {
        self.store.describe()
    }

    pub fn default_feed_grams(&self) -> f64 {
        self.default_feed_grams
    }

    fn require_session(&self) -> Result<String> {
        self.session.clone().ok_or(FarmError::NotLoggedIn)
    }

    fn advisory(&self) -> Result<&dyn AdvisoryService> {
        self.advisory.as_deref().ok_or(FarmError::AdvisoryUnavailable)
    }

    /// Opens a session for `email`. The tier is Admin for the configured
    /// admin address, else whatever the stored profile says, else Free.
    pub async fn login(&mut self, email: &str) -> Result<()> {
        let email = normalize_email(email);
        if email.is_empty() || !email.contains('@') {
            return Err(FarmError::InvalidInput(format!(
                "`{email}` is not an email address"
            )));
        }

        let tier = if self.admin_email.as_deref() == Some(email.as_str()) {
            SubscriptionTier::Admin
        } else {
            self.store
                .fetch_profile(&email)
                .await?
                .map(|row| row.tier)
                .unwrap_or_default()
        };
        self.store
            .upsert_profile(&ProfileRow::access(&email, tier))
            .await?;

        let records = self.fetch_records(&email).await?;
        self.session = Some(email.clone());
        self.install(records);
        info!(email = %email, tier = %tier, "session opened");
        Ok(())
    }

    pub fn logout(&mut self) {
        if let Some(email) = self.session.take() {
            info!(email = %email, "session closed");
        }
        self.state.clear_records();
    }

    /// Fetches every table again and replaces the collections wholesale.
    /// On failure nothing is replaced.
    pub async fn reload(&mut self) -> Result<()> {
        let email = self.require_session()?;
        let records = self.fetch_records(&email).await?;
        self.install(records);
        debug!(
            flocks = self.state.flocks.len(),
            transactions = self.state.transactions.len(),
            notes = self.state.notes.len(),
            "records reloaded"
        );
        Ok(())
    }

    async fn fetch_records(&self, email: &str) -> Result<Records> {
        debug!(store = %self.store.describe(), email, "fetching records");
        let mut profile = match self.store.fetch_profile(email).await? {
            Some(row) => row.into_profile(),
            None => Profile::new(email, SubscriptionTier::Free),
        };
        if self.admin_email.as_deref() == Some(email) {
            profile.tier = SubscriptionTier::Admin;
        }
        let flocks = self
            .store
            .list_flocks(email)
            .await?
            .into_iter()
            .map(FlockRow::into_entry)
            .collect();
        let transactions = self
            .store
            .list_transactions(email)
            .await?
            .into_iter()
            .map(TransactionRow::into_transaction)
            .collect();
        let notes = self
            .store
            .list_notes(email)
            .await?
            .into_iter()
            .map(DailyNoteRow::into_note)
            .collect();
        Ok(Records {
            profile,
            flocks,
            transactions,
            notes,
        })
    }

    fn install(&mut self, records: Records) {
        // Alerts live only in the session; keep them for flocks that survive.
        let alerted: HashSet<Uuid> = self
            .state
            .flocks
            .iter()
            .filter(|flock| flock.is_alert())
            .map(|flock| flock.id)
            .collect();
        let mut flocks = records.flocks;
        for flock in flocks.iter_mut().filter(|flock| alerted.contains(&flock.id)) {
            flock.status = FlockStatus::Alert;
        }
        self.state.replace_records(
            Some(records.profile),
            flocks,
            records.transactions,
            records.notes,
        );
    }

    /// Registers a flock, attaching an advisory nutrition plan when one can
    /// be produced. Returns the new flock id.
    pub async fn add_flock(&mut self, form: FlockForm) -> Result<Uuid> {
        let email = self.require_session()?;
        FlockService::validate(&form)?;

        let plan = self.request_plan(&form).await;
        let entry = FlockService::build(&form, plan);
        let id = entry.id;
        self.store
            .insert_flock(&FlockRow::from_entry(&entry, &email))
            .await?;
        info!(flock = %entry.name, quantity = entry.quantity, "flock registered");
        self.reload().await?;
        Ok(id)
    }

    async fn request_plan(&self, form: &FlockForm) -> Option<FlockPlan> {
        let Some(advisory) = self.advisory.as_deref() else {
            warn!(flock = %form.name, "advisory not configured; flock saved without a plan");
            return None;
        };
        match advisory.flock_plan(&FlockService::plan_request(form)).await {
            Ok(plan) => Some(plan),
            Err(err) => {
                warn!(flock = %form.name, "nutrition plan unavailable: {err}");
                None
            }
        }
    }

    pub async fn remove_flock(&mut self, id: Uuid) -> Result<FlockEntry> {
        self.require_session()?;
        let removed = self
            .state
            .flock(id)
            .cloned()
            .ok_or_else(|| FarmError::FlockNotFound(id.to_string()))?;
        self.store.delete_flock(id).await?;
        info!(flock = %removed.name, "flock removed");
        self.reload().await?;
        Ok(removed)
    }

    /// Records a day's production for one flock and applies its losses.
    ///
    /// The note insert and the quantity update are separate store calls.
    /// When the second fails the note stays recorded, the local count is
    /// already decremented, and the store error is returned.
    pub async fn record_daily_note(&mut self, form: DailyNoteForm) -> Result<DailyNote> {
        let email = self.require_session()?;
        let flock = self
            .state
            .flock(form.flock_id)
            .ok_or_else(|| FarmError::FlockNotFound(form.flock_id.to_string()))?;
        let note = NoteService::build(flock, &form, self.default_feed_grams)?;

        self.store
            .insert_note(&DailyNoteRow::from_note(&note, &email))
            .await?;
        NoteService::insert(&mut self.state, note.clone());
        info!(
            flock = %note.flock_name,
            date = %note.date,
            eggs = note.eggs_collected,
            mortality = note.mortality,
            "daily note recorded"
        );

        if note.mortality > 0 {
            let remaining = FlockService::record_losses(&mut self.state, note.flock_id, note.mortality)?;
            if self
                .state
                .flock(note.flock_id)
                .is_some_and(FlockEntry::is_alert)
            {
                warn!(flock = %note.flock_name, mortality = note.mortality, "mortality alert raised");
            }
            if let Err(err) = self
                .store
                .update_flock_quantity(note.flock_id, remaining)
                .await
            {
                warn!(flock = %note.flock_name, "note kept but flock count not saved: {err}");
                return Err(err.into());
            }
        }
        Ok(note)
    }

    pub async fn add_transaction(&mut self, form: TransactionForm) -> Result<Uuid> {
        let txn = TransactionService::build(&form)?;
        self.persist_transaction(txn).await
    }

    pub async fn add_catalog_transaction(
        &mut self,
        item_id: Uuid,
        qty: f64,
        date: IsoDate,
    ) -> Result<Uuid> {
        let item = self
            .state
            .catalog_item(item_id)
            .ok_or_else(|| FarmError::CatalogItemNotFound(item_id.to_string()))?;
        let txn = TransactionService::from_catalog(item, qty, date)?;
        self.persist_transaction(txn).await
    }

    async fn persist_transaction(&mut self, txn: Transaction) -> Result<Uuid> {
        let email = self.require_session()?;
        let id = txn.id;
        self.store
            .insert_transaction(&TransactionRow::from_transaction(&txn, &email))
            .await?;
        info!(
            kind = txn.kind.wire_name(),
            item = %txn.item_name,
            total = txn.total(),
            "transaction recorded"
        );
        self.reload().await?;
        Ok(id)
    }

    pub async fn remove_transaction(&mut self, id: Uuid) -> Result<()> {
        self.require_session()?;
        self.store.delete_transaction(id).await?;
        info!(%id, "transaction removed");
        self.reload().await
    }

    /// Returns `false` when the category was already offered.
    pub fn add_custom_category(&mut self, kind: TransactionKind, name: &str) -> Result<bool> {
        let added = CategoryService::add_custom(&mut self.state.custom_categories, kind, name)?;
        if added {
            info!(kind = kind.wire_name(), category = name.trim(), "custom category added");
        }
        Ok(added)
    }

    pub fn categories(&self, kind: TransactionKind) -> Vec<String> {
        CategoryService::all_categories(&self.state.custom_categories, kind)
    }

    pub fn add_catalog_item(
        &mut self,
        name: &str,
        unit: &str,
        base_price: f64,
        kind: TransactionKind,
    ) -> Result<Uuid> {
        let item = TransactionService::catalog_item(name, unit, base_price, kind)?;
        let id = item.id;
        info!(item = %item.name, price = item.base_price, "catalog item added");
        self.state.catalog.push(item);
        Ok(id)
    }

    pub fn remove_catalog_item(&mut self, id: Uuid) -> Result<CatalogItem> {
        let index = self
            .state
            .catalog
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| FarmError::CatalogItemNotFound(id.to_string()))?;
        let removed = self.state.catalog.remove(index);
        info!(item = %removed.name, "catalog item removed");
        Ok(removed)
    }

    pub async fn update_profile(&mut self, changes: ProfileChanges) -> Result<()> {
        let email = self.require_session()?;
        if changes.is_empty() {
            return Err(FarmError::InvalidInput("nothing to update".into()));
        }
        self.store
            .update_profile(&email, &ProfilePatch::from(&changes))
            .await?;
        if let Some(profile) = self.state.profile.as_mut() {
            changes.apply(profile);
        }
        info!(email = %email, "profile updated");
        Ok(())
    }

    pub fn set_ingredient_price(&mut self, name: &str, price_per_kg: f64) -> Result<()> {
        FeedService::set_price(&mut self.state.ingredients, name, price_per_kg)?;
        debug!(ingredient = name.trim(), price_per_kg, "ingredient price set");
        Ok(())
    }

    /// Returns how many pasted lines were applied.
    pub fn apply_quick_input(&mut self, input: &str) -> usize {
        let applied = FeedService::apply_quick_input(&mut self.state.ingredients, input);
        debug!(applied, "quick price input processed");
        applied
    }

    pub fn reset_ingredients(&mut self) {
        FeedService::reset(&mut self.state.ingredients);
        info!("ingredient prices reset to defaults");
    }

    pub async fn formulate_feed(&self, phase: AnimalPhase) -> Result<FormulationResult> {
        let request = FeedService::formulation_request(&self.state.ingredients, phase);
        debug!(phase = phase.key(), ingredients = request.ingredients.len(), "formulation requested");
        Ok(self.advisory()?.formulate_feed(&request).await?)
    }

    /// Request prefilled from the day's production: live birds, eggs
    /// collected and outflow recorded for `date`.
    pub fn finance_request(&self, date: &IsoDate, price_per_dozen: f64) -> FinanceRequest {
        let day = SummaryService::production_summary(&self.state, &DatePeriod::Day(date.clone()));
        FinanceRequest {
            bird_count: day.live_birds,
            egg_count: day.eggs,
            daily_cost: day.finance.outflow,
            price_per_dozen,
        }
    }

    pub async fn finance_advice(&self, request: &FinanceRequest) -> Result<FinanceAdvice> {
        if request.bird_count == 0 {
            return Err(FarmError::InvalidInput("bird count must be positive".into()));
        }
        Ok(self.advisory()?.finance_advice(request).await?)
    }

    pub async fn vet_triage(&self, request: &VetRequest) -> Result<VetDiagnosis> {
        if request.description.trim().is_empty() && request.images.is_empty() {
            return Err(FarmError::InvalidInput(
                "describe the symptoms or attach a photo".into(),
            ));
        }
        Ok(self.advisory()?.vet_triage(request).await?)
    }

    /// Builds a biosecurity request for a known flock. Earlier losses are
    /// summed from its recorded notes.
    pub fn biosecurity_request(&self, flock_ref: &str, lost_today: u32) -> Result<BiosecurityRequest> {
        let flock = self
            .state
            .find_flock(flock_ref)
            .ok_or_else(|| FarmError::FlockNotFound(flock_ref.to_string()))?;
        let previous_losses: u32 = self
            .state
            .notes
            .iter()
            .filter(|note| note.flock_id == flock.id)
            .map(|note| note.mortality)
            .sum();
        Ok(BiosecurityRequest {
            batch_name: flock.name.clone(),
            initial_count: flock.quantity.saturating_add(previous_losses),
            lost_today,
            previous_losses,
            bird_age: format!("{} semanas", flock.age_in_weeks),
        })
    }

    pub async fn biosecurity_check(&self, request: &BiosecurityRequest) -> Result<BiosecurityReport> {
        if request.initial_count == 0 {
            return Err(FarmError::InvalidInput("initial count must be positive".into()));
        }
        Ok(self.advisory()?.biosecurity_check(request).await?)
    }

    pub async fn handling_checklist(&self, request: &HandlingRequest) -> Result<HandlingChecklist> {
        if request.origin.trim().is_empty() || request.destination.trim().is_empty() {
            return Err(FarmError::InvalidInput(
                "origin and destination are required".into(),
            ));
        }
        Ok(self.advisory()?.handling_checklist(request).await?)
    }

    pub async fn inventory_report(&self) -> Result<InventoryReport> {
        let lines = FlockService::inventory_lines(&self.state.flocks);
        if lines.is_empty() {
            return Err(FarmError::InvalidInput("no live flocks to report".into()));
        }
        Ok(self.advisory()?.inventory_report(&lines).await?)
    }

    pub async fn egg_ad(&self, egg_type: &str) -> Result<String> {
        let egg_type = egg_type.trim();
        if egg_type.is_empty() {
            return Err(FarmError::InvalidInput("egg type is required".into()));
        }
        Ok(self.advisory()?.egg_ad(egg_type).await?)
    }

    pub fn finance_totals(&self) -> FinanceTotals {
        SummaryService::finance_totals(&self.state.transactions)
    }

    pub fn transactions_filtered(
        &self,
        filter: KindFilter,
        period: Option<&DatePeriod>,
    ) -> Vec<&Transaction> {
        TransactionService::list(&self.state, filter, period)
    }

    pub fn production_summary(&self, period: &DatePeriod) -> ProductionSummary {
        SummaryService::production_summary(&self.state, period)
    }

    pub fn dashboard(&self, today: &IsoDate) -> Dashboard {
        SummaryService::dashboard(&self.state, today, Utc::now())
    }
}
