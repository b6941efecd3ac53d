use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::ledger::{
    DailyNote, DatePeriod, FarmState, IsoDate, KindFilter, SubscriptionTier, Transaction,
    TransactionKind,
};

const EGGS_PER_DOZEN: f64 = 12.0;
const CYCLE_DAYS: i64 = 30;

/// Inflow, outflow and their difference. No rounding is applied.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FinanceTotals {
    pub inflow: f64,
    pub outflow: f64,
    pub net: f64,
}

/// Production figures for a day or a month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionSummary {
    pub period: String,
    pub note_count: usize,
    pub eggs: u64,
    pub mortality: u64,
    pub feed_kg: f64,
    pub live_birds: u64,
    /// Eggs per live bird per recorded day, in percent.
    pub laying_rate: f64,
    pub feed_per_dozen: f64,
    pub cost_per_egg: f64,
    pub finance: FinanceTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub farm_name: String,
    pub tier: SubscriptionTier,
    pub cycle_day: u32,
    pub flock_count: usize,
    pub alert_flocks: Vec<String>,
    pub today: ProductionSummary,
    pub month: ProductionSummary,
    pub profit_margin: f64,
    pub revenue_share: f64,
}

pub struct SummaryService;

impl SummaryService {
    pub fn finance_totals<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> FinanceTotals {
        let mut totals = FinanceTotals::default();
        for txn in transactions {
            match txn.kind {
                TransactionKind::Inflow => totals.inflow += txn.total(),
                TransactionKind::Outflow => totals.outflow += txn.total(),
            }
        }
        totals.net = totals.inflow - totals.outflow;
        totals
    }

    pub fn filter_by_kind(transactions: &[Transaction], filter: KindFilter) -> Vec<&Transaction> {
        transactions
            .iter()
            .filter(|txn| filter.accepts(txn.kind))
            .collect()
    }

    pub fn filter_transactions_by_period<'a>(
        transactions: &'a [Transaction],
        period: &DatePeriod,
    ) -> Vec<&'a Transaction> {
        transactions
            .iter()
            .filter(|txn| period.matches(&txn.date))
            .collect()
    }

    pub fn filter_notes_by_period<'a>(
        notes: &'a [DailyNote],
        period: &DatePeriod,
    ) -> Vec<&'a DailyNote> {
        notes.iter().filter(|note| period.matches(&note.date)).collect()
    }

    /// `eggs / live * 100`, 0 when there are no live birds.
    pub fn laying_rate(eggs: u64, live_birds: u64) -> f64 {
        if live_birds == 0 {
            return 0.0;
        }
        eggs as f64 / live_birds as f64 * 100.0
    }

    pub fn round_one_decimal(value: f64) -> f64 {
        (value * 10.0).round() / 10.0
    }

    /// Kilograms of feed per dozen eggs, 0 without eggs.
    pub fn feed_per_dozen(feed_kg: f64, eggs: u64) -> f64 {
        if eggs == 0 {
            return 0.0;
        }
        feed_kg / (eggs as f64 / EGGS_PER_DOZEN)
    }

    pub fn cost_per_egg(cost: f64, eggs: u64) -> f64 {
        if eggs == 0 {
            return 0.0;
        }
        cost / eggs as f64
    }

    /// `(revenue - costs) / revenue * 100`, 0 without revenue.
    pub fn profit_margin(revenue: f64, costs: f64) -> f64 {
        if revenue == 0.0 {
            return 0.0;
        }
        (revenue - costs) / revenue * 100.0
    }

    /// Revenue as a share of all money moved, 0 when nothing moved.
    pub fn revenue_share(revenue: f64, costs: f64) -> f64 {
        let moved = revenue + costs;
        if moved == 0.0 {
            return 0.0;
        }
        revenue / moved * 100.0
    }

    /// Day of the 30-day subscription cycle, starting at 1.
    pub fn cycle_day(created_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> u32 {
        let Some(created_at) = created_at else {
            return 1;
        };
        let elapsed = (now - created_at).num_days().max(0);
        (elapsed % CYCLE_DAYS) as u32 + 1
    }

    pub fn production_summary(state: &FarmState, period: &DatePeriod) -> ProductionSummary {
        let notes = Self::filter_notes_by_period(&state.notes, period);
        let eggs: u64 = notes.iter().map(|note| u64::from(note.eggs_collected)).sum();
        let mortality: u64 = notes.iter().map(|note| u64::from(note.mortality)).sum();
        let feed_kg: f64 = notes.iter().map(|note| note.feed_consumed_kg).sum();
        let recorded_days = notes
            .iter()
            .map(|note| note.date.as_str())
            .collect::<BTreeSet<_>>()
            .len() as u64;
        let live_birds = state.live_birds();
        let finance =
            Self::finance_totals(Self::filter_transactions_by_period(&state.transactions, period));

        ProductionSummary {
            period: period.label().to_string(),
            note_count: notes.len(),
            eggs,
            mortality,
            feed_kg,
            live_birds,
            laying_rate: Self::round_one_decimal(Self::laying_rate(
                eggs,
                live_birds * recorded_days,
            )),
            feed_per_dozen: Self::feed_per_dozen(feed_kg, eggs),
            cost_per_egg: Self::cost_per_egg(finance.outflow, eggs),
            finance,
        }
    }

    pub fn dashboard(state: &FarmState, today: &IsoDate, now: DateTime<Utc>) -> Dashboard {
        let day = Self::production_summary(state, &DatePeriod::Day(today.clone()));
        let month = Self::production_summary(state, &DatePeriod::month_of(today));
        let (farm_name, tier, created_at) = match &state.profile {
            Some(profile) => (profile.farm_name.clone(), profile.tier, profile.created_at),
            None => (String::new(), SubscriptionTier::Free, None),
        };
        Dashboard {
            farm_name,
            tier,
            cycle_day: Self::cycle_day(created_at, now),
            flock_count: state.flocks.len(),
            alert_flocks: state
                .flocks
                .iter()
                .filter(|flock| flock.is_alert())
                .map(|flock| flock.name.clone())
                .collect(),
            profit_margin: Self::profit_margin(month.finance.inflow, month.finance.outflow),
            revenue_share: Self::revenue_share(month.finance.inflow, month.finance.outflow),
            today: day,
            month,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn txn(kind: TransactionKind, qty: f64, price: f64, date: &str) -> Transaction {
        Transaction::new(kind, "Item", qty, price, IsoDate::parse(date).unwrap())
    }

    fn note(date: &str, eggs: u32, feed: f64) -> DailyNote {
        DailyNote {
            id: Uuid::new_v4(),
            date: IsoDate::parse(date).unwrap(),
            flock_id: Uuid::nil(),
            flock_name: "Lote".into(),
            eggs_collected: eggs,
            mortality: 0,
            feed_consumed_kg: feed,
            laying_rate: 0.0,
            feed_conversion: 0.0,
            notes: String::new(),
        }
    }

    #[test]
    fn kind_filter_keeps_order_and_all_passes_everything() {
        let txns = vec![
            txn(TransactionKind::Outflow, 1.0, 5.0, "2024-06-03"),
            txn(TransactionKind::Inflow, 2.0, 10.0, "2024-06-02"),
            txn(TransactionKind::Inflow, 1.0, 7.0, "2024-06-01"),
        ];
        let inflows = SummaryService::filter_by_kind(&txns, KindFilter::Only(TransactionKind::Inflow));
        let totals: Vec<f64> = inflows.iter().map(|txn| txn.total()).collect();
        assert_eq!(totals, vec![20.0, 7.0]);
        assert_eq!(SummaryService::filter_by_kind(&txns, KindFilter::All).len(), 3);
    }

    #[test]
    fn finance_totals_partition_by_kind() {
        let txns = vec![
            txn(TransactionKind::Inflow, 10.0, 15.0, "2024-06-01"),
            txn(TransactionKind::Outflow, 2.0, 40.0, "2024-06-02"),
            txn(TransactionKind::Inflow, 1.0, 5.5, "2024-06-03"),
        ];
        let totals = SummaryService::finance_totals(&txns);
        assert_eq!(totals.inflow, 155.5);
        assert_eq!(totals.outflow, 80.0);
        assert_eq!(totals.net, 75.5);
    }

    #[test]
    fn ratios_guard_zero_denominators() {
        assert_eq!(SummaryService::laying_rate(10, 0), 0.0);
        assert_eq!(SummaryService::cost_per_egg(10.0, 0), 0.0);
        assert_eq!(SummaryService::feed_per_dozen(10.0, 0), 0.0);
        assert_eq!(SummaryService::profit_margin(0.0, 10.0), 0.0);
        assert_eq!(SummaryService::revenue_share(0.0, 0.0), 0.0);
    }

    #[test]
    fn margin_and_share() {
        assert_eq!(SummaryService::profit_margin(200.0, 50.0), 75.0);
        assert_eq!(SummaryService::revenue_share(300.0, 100.0), 75.0);
        assert_eq!(SummaryService::feed_per_dozen(16.5, 120), 1.65);
    }

    #[test]
    fn rounding_to_one_decimal() {
        assert_eq!(SummaryService::round_one_decimal(66.666), 66.7);
        assert_eq!(SummaryService::round_one_decimal(80.0), 80.0);
    }

    #[test]
    fn cycle_day_wraps_every_thirty_days() {
        let joined = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 1, 31, 9, 0, 0).unwrap();
        assert_eq!(SummaryService::cycle_day(Some(joined), now), 1);
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
        assert_eq!(SummaryService::cycle_day(Some(joined), now), 15);
        assert_eq!(SummaryService::cycle_day(None, now), 1);
    }

    #[test]
    fn monthly_summary_spreads_rate_over_recorded_days() {
        let mut state = FarmState::default();
        let mut flock = crate::ledger::FlockEntry::new(
            "Lote A",
            100,
            30,
            "Isa Brown",
            IsoDate::parse("2024-01-01").unwrap(),
        );
        flock.id = Uuid::nil();
        state.flocks.push(flock);
        state.notes = vec![
            note("2024-06-01", 90, 11.0),
            note("2024-06-02", 70, 11.0),
            note("2024-07-01", 95, 11.0),
        ];
        state.transactions = vec![txn(TransactionKind::Outflow, 1.0, 32.0, "2024-06-10")];

        let summary =
            SummaryService::production_summary(&state, &DatePeriod::parse("2024-06").unwrap());
        assert_eq!(summary.note_count, 2);
        assert_eq!(summary.eggs, 160);
        assert_eq!(summary.laying_rate, 80.0);
        assert_eq!(summary.cost_per_egg, 0.2);
        assert_eq!(summary.feed_kg, 22.0);
    }
}
