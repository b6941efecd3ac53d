#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use coop_core::{
    advisory::{
        AdvisoryError, AdvisoryService, BiosecurityReport, BiosecurityRequest, FinanceAdvice,
        FinanceRequest, FlockPlan, FlockPlanRequest, FormulationRequest, FormulationResult,
        HandlingChecklist, HandlingRequest, InventoryLine, InventoryReport, VetDiagnosis,
        VetRequest,
    },
    core::{services::FlockForm, FarmManager},
    ledger::IsoDate,
    storage::{
        DailyNoteRow, FlockRow, JsonStore, ProfilePatch, ProfileRow, RecordStore, StoreError,
        StoreResult, TransactionRow,
    },
};
use once_cell::sync::Lazy;
use tempfile::TempDir;
use uuid::Uuid;

pub const EMAIL: &str = "granja@example.com";

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn temp_store() -> JsonStore {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().join("records.json");
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    JsonStore::open(path).expect("open json store")
}

/// Manager over a fresh local store, already logged in as [`EMAIL`].
pub async fn logged_in_manager() -> FarmManager {
    let mut manager = FarmManager::new(Box::new(temp_store()));
    manager.login(EMAIL).await.expect("login");
    manager
}

pub fn date(raw: &str) -> IsoDate {
    IsoDate::parse(raw).expect("valid date")
}

pub fn flock_form(name: &str, quantity: u32) -> FlockForm {
    FlockForm {
        name: name.into(),
        quantity,
        age_in_weeks: 20,
        lineage: "Hy-Line W36".into(),
        arrival_date: date("2024-03-01"),
    }
}

/// Advisory double: plans always fail, finance advice echoes the request.
#[derive(Default)]
pub struct StubAdvisory;

fn unsupported<T>() -> Result<T, AdvisoryError> {
    Err(AdvisoryError::Validation("not supported by the stub".into()))
}

#[async_trait]
impl AdvisoryService for StubAdvisory {
    async fn flock_plan(&self, _request: &FlockPlanRequest) -> Result<FlockPlan, AdvisoryError> {
        Err(AdvisoryError::Timeout)
    }

    async fn formulate_feed(
        &self,
        _request: &FormulationRequest,
    ) -> Result<FormulationResult, AdvisoryError> {
        unsupported()
    }

    async fn finance_advice(
        &self,
        request: &FinanceRequest,
    ) -> Result<FinanceAdvice, AdvisoryError> {
        let revenue = request.egg_count as f64 / 12.0 * request.price_per_dozen;
        Ok(FinanceAdvice {
            productivity_percentage: request.egg_count as f64 / request.bird_count as f64 * 100.0,
            cost_per_egg: request.daily_cost / request.egg_count.max(1) as f64,
            net_profit: revenue - request.daily_cost,
            revenue,
            analysis: "ok".into(),
            improvement_tips: Vec::new(),
        })
    }

    async fn vet_triage(&self, _request: &VetRequest) -> Result<VetDiagnosis, AdvisoryError> {
        unsupported()
    }

    async fn biosecurity_check(
        &self,
        _request: &BiosecurityRequest,
    ) -> Result<BiosecurityReport, AdvisoryError> {
        unsupported()
    }

    async fn handling_checklist(
        &self,
        _request: &HandlingRequest,
    ) -> Result<HandlingChecklist, AdvisoryError> {
        unsupported()
    }

    async fn inventory_report(
        &self,
        _flocks: &[InventoryLine],
    ) -> Result<InventoryReport, AdvisoryError> {
        unsupported()
    }

    async fn egg_ad(&self, egg_type: &str) -> Result<String, AdvisoryError> {
        Ok(format!("Ovos {egg_type} fresquinhos!"))
    }
}

/// Handles that make a [`FlakyStore`] fail after it moved into a manager.
#[derive(Clone, Default)]
pub struct Faults {
    pub listing: Arc<AtomicBool>,
    pub quantity: Arc<AtomicBool>,
}

impl Faults {
    pub fn fail_listing(&self, fail: bool) {
        self.listing.store(fail, Ordering::SeqCst);
    }

    pub fn fail_quantity(&self, fail: bool) {
        self.quantity.store(fail, Ordering::SeqCst);
    }
}

/// Local store whose listings or quantity updates can be made to fail.
pub struct FlakyStore {
    inner: JsonStore,
    faults: Faults,
}

impl FlakyStore {
    pub fn new() -> (Self, Faults) {
        let faults = Faults::default();
        let store = Self {
            inner: temp_store(),
            faults: faults.clone(),
        };
        (store, faults)
    }

    fn check(flag: &AtomicBool) -> StoreResult<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(StoreError::Transport("connection reset".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for FlakyStore {
    async fn fetch_profile(&self, email: &str) -> StoreResult<Option<ProfileRow>> {
        self.inner.fetch_profile(email).await
    }

    async fn upsert_profile(&self, row: &ProfileRow) -> StoreResult<()> {
        self.inner.upsert_profile(row).await
    }

    async fn update_profile(&self, email: &str, patch: &ProfilePatch) -> StoreResult<()> {
        self.inner.update_profile(email, patch).await
    }

    async fn list_flocks(&self, email: &str) -> StoreResult<Vec<FlockRow>> {
        Self::check(&self.faults.listing)?;
        self.inner.list_flocks(email).await
    }

    async fn insert_flock(&self, row: &FlockRow) -> StoreResult<()> {
        self.inner.insert_flock(row).await
    }

    async fn update_flock_quantity(&self, id: Uuid, quantity: u32) -> StoreResult<()> {
        Self::check(&self.faults.quantity)?;
        self.inner.update_flock_quantity(id, quantity).await
    }

    async fn delete_flock(&self, id: Uuid) -> StoreResult<()> {
        self.inner.delete_flock(id).await
    }

    async fn list_transactions(&self, email: &str) -> StoreResult<Vec<TransactionRow>> {
        Self::check(&self.faults.listing)?;
        self.inner.list_transactions(email).await
    }

    async fn insert_transaction(&self, row: &TransactionRow) -> StoreResult<()> {
        self.inner.insert_transaction(row).await
    }

    async fn delete_transaction(&self, id: Uuid) -> StoreResult<()> {
        self.inner.delete_transaction(id).await
    }

    async fn list_notes(&self, email: &str) -> StoreResult<Vec<DailyNoteRow>> {
        Self::check(&self.faults.listing)?;
        self.inner.list_notes(email).await
    }

    async fn insert_note(&self, row: &DailyNoteRow) -> StoreResult<()> {
        self.inner.insert_note(row).await
    }

    fn describe(&self) -> String {
        format!("flaky {}", self.inner.describe())
    }
}
