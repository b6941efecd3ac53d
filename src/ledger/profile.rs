use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_FARM_NAME: &str = "Meu Criadouro";
pub const DEFAULT_OWNER_NAME: &str = "Produtor";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    #[default]
    Free,
    Premium,
    Admin,
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SubscriptionTier::Free => "free",
            SubscriptionTier::Premium => "premium",
            SubscriptionTier::Admin => "admin",
        })
    }
}

/// The logged-in producer and their farm details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub email: String,
    #[serde(default)]
    pub tier: SubscriptionTier,
    pub farm_name: String,
    #[serde(default)]
    pub farm_address: String,
    pub owner_name: String,
    #[serde(default)]
    pub document: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Profile {
    pub fn new(email: impl Into<String>, tier: SubscriptionTier) -> Self {
        Self {
            email: email.into(),
            tier,
            farm_name: DEFAULT_FARM_NAME.into(),
            farm_address: String::new(),
            owner_name: DEFAULT_OWNER_NAME.into(),
            document: String::new(),
            phone: String::new(),
            created_at: None,
        }
    }
}

/// Editable profile fields; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileChanges {
    pub farm_name: Option<String>,
    pub farm_address: Option<String>,
    pub owner_name: Option<String>,
    pub document: Option<String>,
    pub phone: Option<String>,
}

impl ProfileChanges {
    pub fn apply(&self, profile: &mut Profile) {
        if let Some(value) = &self.farm_name {
            profile.farm_name = value.clone();
        }
        if let Some(value) = &self.farm_address {
            profile.farm_address = value.clone();
        }
        if let Some(value) = &self.owner_name {
            profile.owner_name = value.clone();
        }
        if let Some(value) = &self.document {
            profile.document = value.clone();
        }
        if let Some(value) = &self.phone {
            profile.phone = value.clone();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.farm_name.is_none()
            && self.farm_address.is_none()
            && self.owner_name.is_none()
            && self.document.is_none()
            && self.phone.is_none()
    }
}

/// Normalises a login email the way the profile table stores it.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}
