//! Post-parse checks on advisory payloads. Serde already enforces field
//! presence and types; these cover what the schema cannot express.

use super::types::*;
use super::AdvisoryError;

pub trait Validate {
    fn validate(&self) -> Result<(), AdvisoryError>;
}

fn require_text(field: &str, value: &str) -> Result<(), AdvisoryError> {
    if value.trim().is_empty() {
        return Err(AdvisoryError::Validation(format!("`{}` is empty", field)));
    }
    Ok(())
}

fn require_finite(field: &str, value: f64) -> Result<(), AdvisoryError> {
    if !value.is_finite() {
        return Err(AdvisoryError::Validation(format!(
            "`{}` is not a finite number",
            field
        )));
    }
    Ok(())
}

fn require_non_negative(field: &str, value: f64) -> Result<(), AdvisoryError> {
    require_finite(field, value)?;
    if value < 0.0 {
        return Err(AdvisoryError::Validation(format!(
            "`{}` must not be negative (got {})",
            field, value
        )));
    }
    Ok(())
}

fn require_percentage(field: &str, value: f64) -> Result<(), AdvisoryError> {
    require_non_negative(field, value)?;
    if value > 100.0 {
        return Err(AdvisoryError::Validation(format!(
            "`{}` is above 100% (got {})",
            field, value
        )));
    }
    Ok(())
}

impl Validate for FormulationResult {
    fn validate(&self) -> Result<(), AdvisoryError> {
        if self.composition.is_empty() {
            return Err(AdvisoryError::Validation("`composition` is empty".into()));
        }
        for line in &self.composition {
            require_text("composition.ingredient", &line.ingredient)?;
            require_non_negative("composition.weightKg", line.weight_kg)?;
            require_non_negative("composition.cost", line.cost)?;
        }
        require_non_negative("totalCost", self.total_cost)?;
        require_percentage("proteinLevel", self.protein_level)?;
        require_text("energyLevel", &self.energy_level)
    }
}

impl Validate for FlockPlan {
    fn validate(&self) -> Result<(), AdvisoryError> {
        require_text("summary", &self.summary)?;
        let feed = &self.feed_consumption_info;
        require_non_negative("feedConsumptionInfo.dailyPerBirdGrams", feed.daily_per_bird_grams)?;
        require_non_negative("feedConsumptionInfo.monthlyTotalKg", feed.monthly_total_kg)?;
        require_non_negative("nextFeedChange.week", self.next_feed_change.week)?;
        for entry in &self.vaccination_schedule {
            require_non_negative("vaccinationSchedule.week", entry.week)?;
            require_text("vaccinationSchedule.vaccine", &entry.vaccine)?;
        }
        Ok(())
    }
}

impl Validate for FinanceAdvice {
    fn validate(&self) -> Result<(), AdvisoryError> {
        require_non_negative("productivityPercentage", self.productivity_percentage)?;
        require_non_negative("costPerEgg", self.cost_per_egg)?;
        require_non_negative("revenue", self.revenue)?;
        // A loss is a legitimate answer.
        require_finite("netProfit", self.net_profit)?;
        require_text("analysis", &self.analysis)
    }
}

impl Validate for VetDiagnosis {
    fn validate(&self) -> Result<(), AdvisoryError> {
        require_text("diagnosis", &self.diagnosis)?;
        require_text("importantNotice", &self.important_notice)
    }
}

impl Validate for BiosecurityReport {
    fn validate(&self) -> Result<(), AdvisoryError> {
        require_percentage("cumulativeMortalityRate", self.cumulative_mortality_rate)?;
        require_non_negative("liveBirdsRemaining", self.live_birds_remaining)?;
        require_text("analysis", &self.analysis)
    }
}

impl Validate for HandlingChecklist {
    fn validate(&self) -> Result<(), AdvisoryError> {
        if self.checklist.is_empty() {
            return Err(AdvisoryError::Validation("`checklist` is empty".into()));
        }
        for item in &self.checklist {
            require_text("checklist.task", &item.task)?;
        }
        require_text("shedSpecs.beddingType", &self.shed_specs.bedding_type)
    }
}

impl Validate for InventoryReport {
    fn validate(&self) -> Result<(), AdvisoryError> {
        require_non_negative("totalBirds", self.total_birds)?;
        for category in &self.categories {
            require_text("categories.category", &category.category)?;
            require_non_negative("categories.totalCount", category.total_count)?;
            for flock in &category.flocks {
                require_non_negative("categories.flocks.quantity", flock.quantity)?;
                require_non_negative("categories.flocks.age", flock.age)?;
            }
        }
        require_text("managerAnalysis", &self.manager_analysis)
    }
}
