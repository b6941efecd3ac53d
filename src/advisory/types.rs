//! Typed advisory payloads. Field names follow the camelCase JSON the
//! generative service is asked to produce.

use serde::{Deserialize, Serialize};

use crate::ledger::AnimalPhase;
use crate::ledger::Ingredient;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FormulationLine {
    pub ingredient: String,
    pub weight_kg: f64,
    pub cost: f64,
}

/// A 100 kg feed recipe with its cost.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FormulationResult {
    pub composition: Vec<FormulationLine>,
    pub total_cost: f64,
    pub protein_level: f64,
    pub energy_level: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedConsumptionInfo {
    pub daily_per_bird_grams: f64,
    pub monthly_total_kg: f64,
    pub current_feed_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedChange {
    pub week: f64,
    pub target_feed_type: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VaccinationEntry {
    pub week: f64,
    pub date: String,
    pub vaccine: String,
    pub method: String,
}

/// Nutrition and health plan attached to a flock when it is registered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlockPlan {
    pub summary: String,
    pub estimated_laying_date: String,
    pub feed_consumption_info: FeedConsumptionInfo,
    pub next_feed_change: FeedChange,
    pub vaccination_schedule: Vec<VaccinationEntry>,
    pub biosecurity_protocols: Vec<String>,
    pub health_alerts: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementTip {
    pub reason: String,
    pub solution: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FinanceAdvice {
    pub productivity_percentage: f64,
    pub cost_per_egg: f64,
    pub net_profit: f64,
    pub revenue: f64,
    pub analysis: String,
    pub improvement_tips: Vec<ImprovementTip>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VetDiagnosis {
    pub diagnosis: String,
    pub signs_observed: Vec<String>,
    pub first_aid_steps: Vec<String>,
    pub important_notice: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BiosecurityReport {
    pub cumulative_mortality_rate: f64,
    pub is_red_alert: bool,
    pub live_birds_remaining: f64,
    pub probable_causes: Vec<String>,
    pub analysis: String,
    pub emergency_procedures: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChecklistCategory {
    Bedding,
    Waterers,
    Lighting,
    Disinfection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub task: String,
    pub category: ChecklistCategory,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShedSpecs {
    pub bedding_type: String,
    pub lighting_hours: String,
}

/// Preparation list for moving a flock between sheds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HandlingChecklist {
    pub batch_name: String,
    pub checklist: Vec<ChecklistItem>,
    pub anti_stress_protocol: Vec<String>,
    pub shed_specs: ShedSpecs,
    pub expert_note: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LayingStats {
    pub laying_weeks: f64,
    pub remaining_productive_weeks: f64,
    pub replacement_urgency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryFlock {
    pub name: String,
    pub quantity: f64,
    pub age: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<LayingStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryCategory {
    pub category: String,
    pub total_count: f64,
    pub flocks: Vec<InventoryFlock>,
}

/// Farm census grouped by production stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryReport {
    pub total_birds: f64,
    pub categories: Vec<InventoryCategory>,
    pub manager_analysis: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlockPlanRequest {
    pub arrival_date: String,
    pub lineage: String,
    pub quantity: u32,
    pub age_in_weeks: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormulationRequest {
    pub ingredients: Vec<Ingredient>,
    pub phase: AnimalPhase,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FinanceRequest {
    pub bird_count: u64,
    pub egg_count: u64,
    pub daily_cost: f64,
    pub price_per_dozen: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VetRequest {
    /// Base64 JPEG payloads, with or without a `data:` URL prefix.
    pub images: Vec<String>,
    pub age: String,
    pub lineage: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BiosecurityRequest {
    pub batch_name: String,
    pub initial_count: u32,
    pub lost_today: u32,
    pub previous_losses: u32,
    pub bird_age: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HandlingRequest {
    pub batch_name: String,
    pub origin: String,
    pub destination: String,
    pub bird_count: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InventoryLine {
    pub name: String,
    pub quantity: u32,
    pub age_in_weeks: u32,
    pub lineage: String,
}
