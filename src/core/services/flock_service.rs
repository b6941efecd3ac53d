use uuid::Uuid;

use crate::advisory::{FlockPlan, FlockPlanRequest, InventoryLine};
use crate::ledger::{FarmState, FlockEntry, FlockStatus, IsoDate};

use super::{ServiceError, ServiceResult};

/// Share of the pre-loss flock that may die in one day before the flock is
/// flagged.
pub const MORTALITY_ALERT_RATIO: f64 = 0.02;

/// Raw user input for a new flock.
#[derive(Debug, Clone, PartialEq)]
pub struct FlockForm {
    pub name: String,
    pub quantity: u32,
    pub age_in_weeks: u32,
    pub lineage: String,
    pub arrival_date: IsoDate,
}

pub struct FlockService;

impl FlockService {
    pub fn validate(form: &FlockForm) -> ServiceResult<()> {
        if form.name.trim().is_empty() {
            return Err(ServiceError::Invalid("Flock name is required".into()));
        }
        if form.quantity == 0 {
            return Err(ServiceError::Invalid(
                "A flock needs at least one bird".into(),
            ));
        }
        Ok(())
    }

    pub fn plan_request(form: &FlockForm) -> FlockPlanRequest {
        FlockPlanRequest {
            arrival_date: form.arrival_date.to_string(),
            lineage: form.lineage.trim().to_string(),
            quantity: form.quantity,
            age_in_weeks: form.age_in_weeks,
        }
    }

    pub fn build(form: &FlockForm, plan: Option<FlockPlan>) -> FlockEntry {
        FlockEntry::new(
            form.name.trim(),
            form.quantity,
            form.age_in_weeks,
            form.lineage.trim(),
            form.arrival_date.clone(),
        )
        .with_plan(plan)
    }

    /// Removes up to `mortality` birds, never going below zero. Returns how
    /// many were actually removed.
    pub fn apply_mortality(flock: &mut FlockEntry, mortality: u32) -> u32 {
        let before = flock.quantity;
        flock.quantity = before.saturating_sub(mortality);
        before - flock.quantity
    }

    /// True when a day's losses exceed 2% of the birds alive before them.
    pub fn mortality_alert(live_before: u32, mortality: u32) -> bool {
        f64::from(mortality) > f64::from(live_before) * MORTALITY_ALERT_RATIO
    }

    /// Applies a day's losses to a flock in the state and raises its alert
    /// flag when warranted. Returns the new live count.
    pub fn record_losses(state: &mut FarmState, flock_id: Uuid, mortality: u32) -> ServiceResult<u32> {
        let flock = state
            .flock_mut(flock_id)
            .ok_or_else(|| ServiceError::not_found("flock", flock_id))?;
        let before = flock.quantity;
        Self::apply_mortality(flock, mortality);
        if Self::mortality_alert(before, mortality) {
            flock.status = FlockStatus::Alert;
        }
        Ok(flock.quantity)
    }

    pub fn inventory_lines(flocks: &[FlockEntry]) -> Vec<InventoryLine> {
        flocks
            .iter()
            .filter(|flock| flock.quantity > 0)
            .map(|flock| InventoryLine {
                name: flock.name.clone(),
                quantity: flock.quantity,
                age_in_weeks: flock.age_in_weeks,
                lineage: flock.lineage.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flock(quantity: u32) -> FlockEntry {
        FlockEntry::new(
            "Lote A",
            quantity,
            24,
            "Hy-Line",
            IsoDate::parse("2024-01-10").unwrap(),
        )
    }

    #[test]
    fn mortality_saturates_at_zero() {
        let mut entry = flock(3);
        assert_eq!(FlockService::apply_mortality(&mut entry, 5), 3);
        assert_eq!(entry.quantity, 0);
    }

    #[test]
    fn alert_threshold_is_two_percent_of_pre_loss_count() {
        assert!(!FlockService::mortality_alert(150, 3));
        assert!(FlockService::mortality_alert(150, 4));
        assert!(FlockService::mortality_alert(150, 5));
        assert!(!FlockService::mortality_alert(150, 0));
    }

    #[test]
    fn record_losses_flags_the_flock() {
        let mut state = FarmState::default();
        let entry = flock(150);
        let id = entry.id;
        state.flocks.push(entry);

        let live = FlockService::record_losses(&mut state, id, 5).unwrap();
        assert_eq!(live, 145);
        assert!(state.flock(id).unwrap().is_alert());
    }

    #[test]
    fn blank_name_is_rejected() {
        let form = FlockForm {
            name: "  ".into(),
            quantity: 10,
            age_in_weeks: 1,
            lineage: "Caipira".into(),
            arrival_date: IsoDate::parse("2024-02-01").unwrap(),
        };
        assert!(FlockService::validate(&form).is_err());
    }

    #[test]
    fn empty_flocks_are_left_out_of_inventory() {
        let flocks = vec![flock(0), flock(40)];
        let lines = FlockService::inventory_lines(&flocks);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 40);
    }
}
