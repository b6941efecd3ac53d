use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::date::IsoDate;
use crate::advisory::FlockPlan;

/// A batch of birds housed and managed together.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlockEntry {
    pub id: Uuid,
    pub name: String,
    /// Live bird count.
    pub quantity: u32,
    pub age_in_weeks: u32,
    pub lineage: String,
    pub arrival_date: IsoDate,
    #[serde(default)]
    pub status: FlockStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition_plan: Option<FlockPlan>,
}

impl FlockEntry {
    pub fn new(
        name: impl Into<String>,
        quantity: u32,
        age_in_weeks: u32,
        lineage: impl Into<String>,
        arrival_date: IsoDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            quantity,
            age_in_weeks,
            lineage: lineage.into(),
            arrival_date,
            status: FlockStatus::Normal,
            nutrition_plan: None,
        }
    }

    pub fn with_plan(mut self, plan: Option<FlockPlan>) -> Self {
        self.nutrition_plan = plan;
        self
    }

    /// Daily feed per bird in grams, when the nutrition plan states one.
    pub fn planned_daily_grams(&self) -> Option<f64> {
        self.nutrition_plan
            .as_ref()
            .map(|plan| plan.feed_consumption_info.daily_per_bird_grams)
            .filter(|grams| *grams > 0.0)
    }

    pub fn is_alert(&self) -> bool {
        self.status == FlockStatus::Alert
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FlockStatus {
    #[default]
    Normal,
    Alert,
}

/// Feeding phases offered to the formulation advisor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AnimalPhase {
    HensStarter,
    HensGrower,
    HensLayer,
    QuailStarter,
    QuailLayer,
}

impl AnimalPhase {
    pub const ALL: [AnimalPhase; 5] = [
        AnimalPhase::HensStarter,
        AnimalPhase::HensGrower,
        AnimalPhase::HensLayer,
        AnimalPhase::QuailStarter,
        AnimalPhase::QuailLayer,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AnimalPhase::HensStarter => "Galinhas (Pintinhos/Inicial)",
            AnimalPhase::HensGrower => "Galinhas (Recria/Crescimento)",
            AnimalPhase::HensLayer => "Galinhas (Postura/Produção)",
            AnimalPhase::QuailStarter => "Codornas (Inicial)",
            AnimalPhase::QuailLayer => "Codornas (Postura/Produção)",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            AnimalPhase::HensStarter => "hens-starter",
            AnimalPhase::HensGrower => "hens-grower",
            AnimalPhase::HensLayer => "hens-layer",
            AnimalPhase::QuailStarter => "quail-starter",
            AnimalPhase::QuailLayer => "quail-layer",
        }
    }

    pub fn from_key(raw: &str) -> Option<Self> {
        let needle = raw.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|phase| phase.key() == needle)
    }
}

impl Default for AnimalPhase {
    fn default() -> Self {
        AnimalPhase::HensLayer
    }
}
