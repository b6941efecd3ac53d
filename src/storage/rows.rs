//! Row shapes of the hosted tables (`profiles`, `flocks`, `transactions`,
//! `daily_notes`) and their conversions to domain types. Column names are
//! snake_case as stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::advisory::FlockPlan;
use crate::ledger::{
    profile::{DEFAULT_FARM_NAME, DEFAULT_OWNER_NAME},
    DailyNote, FlockEntry, FlockStatus, IsoDate, Profile, ProfileChanges, SubscriptionTier,
    Transaction, TransactionKind,
};

/// Label used for notes whose flock is unknown.
pub const GENERAL_FLOCK_NAME: &str = "Geral";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Profiles,
    Flocks,
    Transactions,
    DailyNotes,
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Table::Profiles => "profiles",
            Table::Flocks => "flocks",
            Table::Transactions => "transactions",
            Table::DailyNotes => "daily_notes",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileRow {
    pub email: String,
    #[serde(default)]
    pub tier: SubscriptionTier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farm_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farm_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProfileRow {
    /// Row written on login: only the key and tier, so an upsert merges
    /// into any existing farm details.
    pub fn access(email: &str, tier: SubscriptionTier) -> Self {
        Self {
            email: email.to_string(),
            tier,
            farm_name: None,
            farm_address: None,
            owner_name: None,
            document: None,
            phone: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn into_profile(self) -> Profile {
        let mut profile = Profile::new(self.email, self.tier);
        profile.farm_name = non_empty(self.farm_name).unwrap_or_else(|| DEFAULT_FARM_NAME.into());
        profile.owner_name =
            non_empty(self.owner_name).unwrap_or_else(|| DEFAULT_OWNER_NAME.into());
        profile.farm_address = self.farm_address.unwrap_or_default();
        profile.document = self.document.unwrap_or_default();
        profile.phone = self.phone.unwrap_or_default();
        profile.created_at = self.created_at;
        profile
    }
}

/// Partial profile update sent as a PATCH body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ProfilePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farm_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farm_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&ProfileChanges> for ProfilePatch {
    fn from(changes: &ProfileChanges) -> Self {
        Self {
            farm_name: changes.farm_name.clone(),
            farm_address: changes.farm_address.clone(),
            owner_name: changes.owner_name.clone(),
            document: changes.document.clone(),
            phone: changes.phone.clone(),
            updated_at: Some(Utc::now()),
        }
    }
}

impl ProfilePatch {
    pub fn apply_to(&self, row: &mut ProfileRow) {
        let fields = [
            (&self.farm_name, &mut row.farm_name),
            (&self.farm_address, &mut row.farm_address),
            (&self.owner_name, &mut row.owner_name),
            (&self.document, &mut row.document),
            (&self.phone, &mut row.phone),
        ];
        for (patch, target) in fields {
            if patch.is_some() {
                target.clone_from(patch);
            }
        }
        if self.updated_at.is_some() {
            row.updated_at = self.updated_at;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlockRow {
    pub id: Uuid,
    pub user_email: String,
    pub name: String,
    pub quantity: u32,
    #[serde(default)]
    pub age_in_weeks: u32,
    pub arrival_date: IsoDate,
    #[serde(default)]
    pub lineage: String,
    /// Stored as loose JSON; a plan that no longer parses is dropped on read.
    #[serde(default)]
    pub nutrition_plan: Option<Value>,
}

impl FlockRow {
    pub fn from_entry(entry: &FlockEntry, user_email: &str) -> Self {
        Self {
            id: entry.id,
            user_email: user_email.to_string(),
            name: entry.name.clone(),
            quantity: entry.quantity,
            age_in_weeks: entry.age_in_weeks,
            arrival_date: entry.arrival_date.clone(),
            lineage: entry.lineage.clone(),
            nutrition_plan: entry
                .nutrition_plan
                .as_ref()
                .and_then(|plan| serde_json::to_value(plan).ok()),
        }
    }

    pub fn into_entry(self) -> FlockEntry {
        let plan = self.nutrition_plan.and_then(|raw| {
            if raw.is_null() {
                return None;
            }
            match serde_json::from_value::<FlockPlan>(raw) {
                Ok(plan) => Some(plan),
                Err(err) => {
                    warn!(flock = %self.name, "ignoring unreadable nutrition plan: {err}");
                    None
                }
            }
        });
        FlockEntry {
            id: self.id,
            name: self.name,
            quantity: self.quantity,
            age_in_weeks: self.age_in_weeks,
            lineage: self.lineage,
            arrival_date: self.arrival_date,
            // Alerts are raised per session from the day's mortality.
            status: FlockStatus::Normal,
            nutrition_plan: plan,
        }
    }
}

fn default_qty() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRow {
    pub id: Uuid,
    pub user_email: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub item_name: String,
    #[serde(default = "default_qty")]
    pub qty: f64,
    pub price_per_unit: f64,
    /// Written for the store's convenience; ignored on read.
    #[serde(default)]
    pub total: f64,
    pub date: IsoDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TransactionRow {
    pub fn from_transaction(txn: &Transaction, user_email: &str) -> Self {
        Self {
            id: txn.id,
            user_email: user_email.to_string(),
            kind: txn.kind,
            item_name: txn.item_name.clone(),
            qty: txn.qty,
            price_per_unit: txn.unit_price,
            total: txn.total(),
            date: txn.date.clone(),
            description: txn.description.clone(),
        }
    }

    pub fn into_transaction(self) -> Transaction {
        Transaction {
            id: self.id,
            date: self.date,
            kind: self.kind,
            item_name: self.item_name,
            qty: self.qty,
            unit_price: self.price_per_unit,
            description: self.description,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyNoteRow {
    pub id: Uuid,
    pub user_email: String,
    pub date: IsoDate,
    #[serde(default)]
    pub flock_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flock_name: Option<String>,
    #[serde(default)]
    pub eggs_collected: u32,
    #[serde(default)]
    pub mortality: u32,
    #[serde(default)]
    pub feed_consumed_kg: Option<f64>,
    #[serde(default)]
    pub laying_rate: Option<f64>,
    #[serde(default)]
    pub feed_conversion: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl DailyNoteRow {
    pub fn from_note(note: &DailyNote, user_email: &str) -> Self {
        Self {
            id: note.id,
            user_email: user_email.to_string(),
            date: note.date.clone(),
            flock_id: Some(note.flock_id),
            flock_name: Some(note.flock_name.clone()),
            eggs_collected: note.eggs_collected,
            mortality: note.mortality,
            feed_consumed_kg: Some(note.feed_consumed_kg),
            laying_rate: Some(note.laying_rate),
            feed_conversion: Some(note.feed_conversion),
            notes: Some(note.notes.clone()).filter(|text| !text.is_empty()),
        }
    }

    pub fn into_note(self) -> DailyNote {
        DailyNote {
            id: self.id,
            date: self.date,
            flock_id: self.flock_id.unwrap_or_else(Uuid::nil),
            flock_name: non_empty(self.flock_name).unwrap_or_else(|| GENERAL_FLOCK_NAME.into()),
            eggs_collected: self.eggs_collected,
            mortality: self.mortality,
            feed_consumed_kg: self.feed_consumed_kg.unwrap_or_default(),
            laying_rate: self.laying_rate.unwrap_or_default(),
            feed_conversion: self.feed_conversion.unwrap_or_default(),
            notes: self.notes.unwrap_or_default(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn transaction_total_column_is_ignored_on_read() {
        let row: TransactionRow = serde_json::from_value(json!({
            "id": Uuid::new_v4(),
            "user_email": "a@b.c",
            "type": "receita",
            "item_name": "Venda de Ovos",
            "qty": 2,
            "price_per_unit": 15.5,
            "total": 999,
            "date": "2024-06-01"
        }))
        .unwrap();
        let txn = row.into_transaction();
        assert_eq!(txn.total(), 31.0);
    }

    #[test]
    fn profile_defaults_fill_blank_columns() {
        let row: ProfileRow =
            serde_json::from_value(json!({ "email": "a@b.c", "farm_name": "" })).unwrap();
        let profile = row.into_profile();
        assert_eq!(profile.farm_name, DEFAULT_FARM_NAME);
        assert_eq!(profile.owner_name, DEFAULT_OWNER_NAME);
        assert_eq!(profile.tier, SubscriptionTier::Free);
    }

    #[test]
    fn note_without_flock_reads_as_general() {
        let row: DailyNoteRow = serde_json::from_value(json!({
            "id": Uuid::new_v4(),
            "user_email": "a@b.c",
            "date": "2024-06-01",
            "eggs_collected": 40,
            "mortality": 1
        }))
        .unwrap();
        let note = row.into_note();
        assert_eq!(note.flock_name, GENERAL_FLOCK_NAME);
        assert_eq!(note.feed_conversion, 0.0);
    }

    #[test]
    fn unreadable_plan_is_dropped() {
        let row = FlockRow {
            id: Uuid::new_v4(),
            user_email: "a@b.c".into(),
            name: "Lote A".into(),
            quantity: 10,
            age_in_weeks: 20,
            arrival_date: IsoDate::parse("2024-01-01").unwrap(),
            lineage: "Isa Brown".into(),
            nutrition_plan: Some(json!({ "summary": 3 })),
        };
        assert!(row.into_entry().nutrition_plan.is_none());
    }

    #[test]
    fn patch_only_touches_given_fields() {
        let mut row = ProfileRow::access("a@b.c", SubscriptionTier::Premium);
        row.phone = Some("555".into());
        let patch = ProfilePatch {
            farm_name: Some("Granja Sol".into()),
            ..ProfilePatch::default()
        };
        patch.apply_to(&mut row);
        assert_eq!(row.farm_name.as_deref(), Some("Granja Sol"));
        assert_eq!(row.phone.as_deref(), Some("555"));
    }
}
