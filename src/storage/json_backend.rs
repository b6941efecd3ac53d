use std::{
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::utils::persistence::{read_json_if_exists, write_json_atomic};

use super::{
    DailyNoteRow, FlockRow, ProfilePatch, ProfileRow, RecordStore, StoreError, StoreResult, Table,
    TransactionRow,
};

/// All four tables in one document.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    profiles: Vec<ProfileRow>,
    #[serde(default)]
    flocks: Vec<FlockRow>,
    #[serde(default)]
    transactions: Vec<TransactionRow>,
    #[serde(default)]
    daily_notes: Vec<DailyNoteRow>,
}

/// Offline store keeping every table in a single JSON file. Each mutation
/// rewrites the file atomically before returning.
pub struct JsonStore {
    path: PathBuf,
    document: Mutex<StoreDocument>,
}

impl JsonStore {
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let document = read_json_if_exists::<StoreDocument, StoreError>(&path)?.unwrap_or_default();
        debug!(path = %path.display(), "opened local record store");
        Ok(Self {
            path,
            document: Mutex::new(document),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> MutexGuard<'_, StoreDocument> {
        // Rows are replaced whole, so a poisoned document is still consistent.
        self.document
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Applies a change to a copy of the document and swaps it in only once
    /// the file write succeeded.
    fn mutate<T>(&self, apply: impl FnOnce(&mut StoreDocument) -> StoreResult<T>) -> StoreResult<T> {
        let mut document = self.lock();
        let mut next = document.clone();
        let result = apply(&mut next)?;
        write_json_atomic::<_, StoreError>(&next, &self.path)?;
        *document = next;
        Ok(result)
    }
}

fn newest_first<T>(mut rows: Vec<T>, date: impl Fn(&T) -> &str) -> Vec<T> {
    rows.sort_by(|a, b| date(b).cmp(date(a)));
    rows
}

fn not_found(table: Table, key: impl ToString) -> StoreError {
    StoreError::NotFound {
        table: table.name(),
        key: key.to_string(),
    }
}

#[async_trait]
impl RecordStore for JsonStore {
    async fn fetch_profile(&self, email: &str) -> StoreResult<Option<ProfileRow>> {
        let document = self.lock();
        Ok(document
            .profiles
            .iter()
            .find(|row| row.email == email)
            .cloned())
    }

    async fn upsert_profile(&self, row: &ProfileRow) -> StoreResult<()> {
        self.mutate(|document| {
            match document.profiles.iter_mut().find(|existing| existing.email == row.email) {
                Some(existing) => {
                    existing.tier = row.tier;
                    let merge = ProfilePatch {
                        farm_name: row.farm_name.clone(),
                        farm_address: row.farm_address.clone(),
                        owner_name: row.owner_name.clone(),
                        document: row.document.clone(),
                        phone: row.phone.clone(),
                        updated_at: row.updated_at,
                    };
                    merge.apply_to(existing);
                }
                None => {
                    let mut fresh = row.clone();
                    if fresh.created_at.is_none() {
                        fresh.created_at = Some(chrono::Utc::now());
                    }
                    document.profiles.push(fresh);
                }
            }
            Ok(())
        })
    }

    async fn update_profile(&self, email: &str, patch: &ProfilePatch) -> StoreResult<()> {
        self.mutate(|document| {
            let row = document
                .profiles
                .iter_mut()
                .find(|row| row.email == email)
                .ok_or_else(|| not_found(Table::Profiles, email))?;
            patch.apply_to(row);
            Ok(())
        })
    }

    async fn list_flocks(&self, email: &str) -> StoreResult<Vec<FlockRow>> {
        let document = self.lock();
        Ok(document
            .flocks
            .iter()
            .filter(|row| row.user_email == email)
            .cloned()
            .collect())
    }

    async fn insert_flock(&self, row: &FlockRow) -> StoreResult<()> {
        self.mutate(|document| {
            document.flocks.push(row.clone());
            Ok(())
        })
    }

    async fn update_flock_quantity(&self, id: Uuid, quantity: u32) -> StoreResult<()> {
        self.mutate(|document| {
            let row = document
                .flocks
                .iter_mut()
                .find(|row| row.id == id)
                .ok_or_else(|| not_found(Table::Flocks, id))?;
            row.quantity = quantity;
            Ok(())
        })
    }

    async fn delete_flock(&self, id: Uuid) -> StoreResult<()> {
        self.mutate(|document| {
            document.flocks.retain(|row| row.id != id);
            Ok(())
        })
    }

    async fn list_transactions(&self, email: &str) -> StoreResult<Vec<TransactionRow>> {
        let rows = {
            let document = self.lock();
            document
                .transactions
                .iter()
                .filter(|row| row.user_email == email)
                .cloned()
                .collect()
        };
        Ok(newest_first(rows, |row: &TransactionRow| row.date.as_str()))
    }

    async fn insert_transaction(&self, row: &TransactionRow) -> StoreResult<()> {
        self.mutate(|document| {
            document.transactions.push(row.clone());
            Ok(())
        })
    }

    async fn delete_transaction(&self, id: Uuid) -> StoreResult<()> {
        self.mutate(|document| {
            document.transactions.retain(|row| row.id != id);
            Ok(())
        })
    }

    async fn list_notes(&self, email: &str) -> StoreResult<Vec<DailyNoteRow>> {
        let rows = {
            let document = self.lock();
            document
                .daily_notes
                .iter()
                .filter(|row| row.user_email == email)
                .cloned()
                .collect()
        };
        Ok(newest_first(rows, |row: &DailyNoteRow| row.date.as_str()))
    }

    async fn insert_note(&self, row: &DailyNoteRow) -> StoreResult<()> {
        self.mutate(|document| {
            document.daily_notes.push(row.clone());
            Ok(())
        })
    }

    fn describe(&self) -> String {
        format!("local file {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{IsoDate, SubscriptionTier, TransactionKind};

    fn txn(email: &str, date: &str) -> TransactionRow {
        TransactionRow {
            id: Uuid::new_v4(),
            user_email: email.into(),
            kind: TransactionKind::Outflow,
            item_name: "Ração".into(),
            qty: 1.0,
            price_per_unit: 10.0,
            total: 10.0,
            date: IsoDate::parse(date).unwrap(),
            description: None,
        }
    }

    #[tokio::test]
    async fn rows_are_scoped_by_email_and_sorted_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path().join("records.json")).unwrap();
        store.insert_transaction(&txn("a@farm.br", "2024-05-01")).await.unwrap();
        store.insert_transaction(&txn("a@farm.br", "2024-06-10")).await.unwrap();
        store.insert_transaction(&txn("b@farm.br", "2024-07-01")).await.unwrap();

        let rows = store.list_transactions("a@farm.br").await.unwrap();
        let dates: Vec<_> = rows.iter().map(|row| row.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-06-10", "2024-05-01"]);
    }

    #[tokio::test]
    async fn data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        {
            let store = JsonStore::open(&path).unwrap();
            store
                .upsert_profile(&ProfileRow::access("a@farm.br", SubscriptionTier::Free))
                .await
                .unwrap();
        }
        let reopened = JsonStore::open(&path).unwrap();
        let profile = reopened.fetch_profile("a@farm.br").await.unwrap().unwrap();
        assert!(profile.created_at.is_some());
    }

    #[tokio::test]
    async fn upsert_merges_without_clearing_details() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path().join("records.json")).unwrap();
        store
            .upsert_profile(&ProfileRow::access("a@farm.br", SubscriptionTier::Free))
            .await
            .unwrap();
        let patch = ProfilePatch {
            farm_name: Some("Sítio Boa Vista".into()),
            ..ProfilePatch::default()
        };
        store.update_profile("a@farm.br", &patch).await.unwrap();
        store
            .upsert_profile(&ProfileRow::access("a@farm.br", SubscriptionTier::Premium))
            .await
            .unwrap();

        let row = store.fetch_profile("a@farm.br").await.unwrap().unwrap();
        assert_eq!(row.tier, SubscriptionTier::Premium);
        assert_eq!(row.farm_name.as_deref(), Some("Sítio Boa Vista"));
    }

    #[tokio::test]
    async fn failed_write_leaves_rows_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.json");
        let store = JsonStore::open(&path).unwrap();
        store.insert_transaction(&txn("a@farm.br", "2024-06-01")).await.unwrap();

        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("occupied"), b"x").unwrap();

        let err = store.insert_transaction(&txn("a@farm.br", "2024-06-02")).await;
        assert!(err.is_err());
        let rows = store.list_transactions("a@farm.br").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date.as_str(), "2024-06-01");
    }

    #[tokio::test]
    async fn updating_a_missing_flock_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path().join("records.json")).unwrap();
        let err = store.update_flock_quantity(Uuid::new_v4(), 3).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { table: "flocks", .. }));
    }
}
