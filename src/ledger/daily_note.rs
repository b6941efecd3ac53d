use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::date::IsoDate;

/// One day of production for a flock.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyNote {
    pub id: Uuid,
    pub date: IsoDate,
    pub flock_id: Uuid,
    pub flock_name: String,
    pub eggs_collected: u32,
    pub mortality: u32,
    /// Estimated from the live count and the per-bird ration.
    #[serde(default)]
    pub feed_consumed_kg: f64,
    /// Percentage of live birds that laid, one decimal.
    #[serde(default)]
    pub laying_rate: f64,
    /// Kilograms of feed per dozen eggs.
    #[serde(default)]
    pub feed_conversion: f64,
    #[serde(default)]
    pub notes: String,
}

/// Raw user input for a daily note; derived fields are filled in by the
/// note service.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyNoteForm {
    pub date: IsoDate,
    pub flock_id: Uuid,
    pub eggs_collected: u32,
    pub mortality: u32,
    pub notes: String,
}
