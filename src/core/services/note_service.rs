use uuid::Uuid;

use crate::ledger::{DailyNote, DailyNoteForm, FarmState, FlockEntry};

use super::{ServiceError, ServiceResult, SummaryService};

const GRAMS_PER_KG: f64 = 1000.0;

pub struct NoteService;

impl NoteService {
    /// Builds a note for `flock`, deriving feed, laying rate and feed
    /// conversion from the live count at entry time.
    ///
    /// Collecting more eggs than there are live birds is rejected.
    pub fn build(
        flock: &FlockEntry,
        form: &DailyNoteForm,
        default_grams_per_bird: f64,
    ) -> ServiceResult<DailyNote> {
        if form.flock_id != flock.id {
            return Err(ServiceError::Invalid(
                "Daily note refers to a different flock".into(),
            ));
        }
        if form.eggs_collected > flock.quantity {
            return Err(ServiceError::Invalid(format!(
                "{} eggs exceed the {} live birds of `{}`",
                form.eggs_collected, flock.quantity, flock.name
            )));
        }

        let live = u64::from(flock.quantity);
        let eggs = u64::from(form.eggs_collected);
        let grams = flock
            .planned_daily_grams()
            .unwrap_or(default_grams_per_bird);
        let feed_consumed_kg = live as f64 * grams / GRAMS_PER_KG;

        Ok(DailyNote {
            id: Uuid::new_v4(),
            date: form.date.clone(),
            flock_id: flock.id,
            flock_name: flock.name.clone(),
            eggs_collected: form.eggs_collected,
            mortality: form.mortality,
            feed_consumed_kg,
            laying_rate: SummaryService::round_one_decimal(SummaryService::laying_rate(eggs, live)),
            feed_conversion: SummaryService::feed_per_dozen(feed_consumed_kg, eggs),
            notes: form.notes.trim().to_string(),
        })
    }

    /// Inserts a note keeping the list newest first.
    pub fn insert(state: &mut FarmState, note: DailyNote) {
        let position = state
            .notes
            .iter()
            .position(|existing| existing.date <= note.date)
            .unwrap_or(state.notes.len());
        state.notes.insert(position, note);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::IsoDate;

    fn flock(quantity: u32) -> FlockEntry {
        FlockEntry::new(
            "Lote Postura",
            quantity,
            30,
            "Isa Brown",
            IsoDate::parse("2024-01-01").unwrap(),
        )
    }

    fn form(flock: &FlockEntry, date: &str, eggs: u32, mortality: u32) -> DailyNoteForm {
        DailyNoteForm {
            date: IsoDate::parse(date).unwrap(),
            flock_id: flock.id,
            eggs_collected: eggs,
            mortality,
            notes: String::new(),
        }
    }

    #[test]
    fn derives_rate_and_feed_from_entry_count() {
        let flock = flock(150);
        let note = NoteService::build(&flock, &form(&flock, "2024-06-01", 120, 5), 110.0).unwrap();
        assert_eq!(note.laying_rate, 80.0);
        assert_eq!(note.feed_consumed_kg, 16.5);
        assert_eq!(note.feed_conversion, 1.65);
        assert_eq!(note.flock_name, "Lote Postura");
    }

    #[test]
    fn eggs_above_live_count_are_rejected() {
        let flock = flock(10);
        let err = NoteService::build(&flock, &form(&flock, "2024-06-01", 11, 0), 110.0).unwrap_err();
        assert!(matches!(err, ServiceError::Invalid(_)));
    }

    #[test]
    fn notes_stay_newest_first() {
        let flock = flock(50);
        let mut state = FarmState::default();
        for date in ["2024-06-01", "2024-06-03", "2024-06-02"] {
            let note = NoteService::build(&flock, &form(&flock, date, 10, 0), 110.0).unwrap();
            NoteService::insert(&mut state, note);
        }
        let dates: Vec<_> = state.notes.iter().map(|note| note.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-06-03", "2024-06-02", "2024-06-01"]);
    }
}
