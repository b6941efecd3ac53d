use crate::cli::core::{
    parse_count, parse_date, split_options, usage, CommandResult, ShellContext,
};
use crate::cli::io;
use crate::cli::output::{section as output_section, table};
use crate::cli::registry::CommandEntry;
use crate::core::services::SummaryService;
use crate::ledger::{DailyNoteForm, DatePeriod};
use crate::currency::format_number;

use super::flock::resolve_flock;

const ADD_USAGE: &str = "note add <flock> <eggs> [mortality] [date=YYYY-MM-DD] [notes=<text>]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "note",
        "Record and list daily production notes",
        "note [list [YYYY-MM|YYYY-MM-DD]|add <flock> <eggs> [mortality] [date=YYYY-MM-DD] [notes=<text>]]",
        cmd_note,
    )]
}

fn cmd_note(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    context.require_session()?;
    match args.first().map(|action| action.to_lowercase()).as_deref() {
        None | Some("list") => list_notes(context, args.get(1).copied()),
        Some("add") => add_note(context, &args[1..]),
        Some(other) => Err(usage(&format!("note [list|add] (unknown action `{other}`)"))),
    }
}

fn add_note(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (positional, options) = split_options(args, &["date", "notes"]);
    if positional.len() < 2 {
        return Err(usage(ADD_USAGE));
    }
    let flock_id = resolve_flock(context, positional[0])?.id;
    let form = DailyNoteForm {
        date: parse_date(options.get("date").copied())?,
        flock_id,
        eggs_collected: parse_count(positional[1], "eggs")?,
        mortality: match positional.get(2) {
            Some(value) => parse_count(value, "mortality")?,
            None => 0,
        },
        notes: options.get("notes").copied().unwrap_or_default().to_string(),
    };

    let note = context
        .runtime
        .block_on(context.manager.record_daily_note(form))?;
    io::print_success(format!(
        "Note saved for {}: {} eggs, laying rate {}.",
        note.flock_name,
        note.eggs_collected,
        context.percent(note.laying_rate)
    ));
    if let Some(flock) = context.manager.state().flock(note.flock_id) {
        if note.mortality > 0 {
            io::print_info(format!("{} birds remain in {}.", flock.quantity, flock.name));
        }
        if flock.is_alert() {
            io::print_warning(format!(
                "Mortality alert for {}: losses above 2% of the flock today.",
                flock.name
            ));
            io::print_hint(format!("Run `advise biosecurity \"{}\" {}` for a protocol.", flock.name, note.mortality));
        }
    }
    Ok(())
}

fn list_notes(context: &ShellContext, period: Option<&str>) -> CommandResult {
    let state = context.manager.state();
    let notes = match period {
        Some(raw) => SummaryService::filter_notes_by_period(&state.notes, &DatePeriod::parse(raw)?),
        None => state.notes.iter().collect(),
    };
    if notes.is_empty() {
        io::print_info("No daily notes recorded.");
        return Ok(());
    }
    let locale = context.locale();
    let rows: Vec<Vec<String>> = notes
        .iter()
        .map(|note| {
            vec![
                context.date_label(&note.date),
                note.flock_name.clone(),
                note.eggs_collected.to_string(),
                note.mortality.to_string(),
                format_number(&locale, note.feed_consumed_kg, 2),
                context.percent(note.laying_rate),
                format_number(&locale, note.feed_conversion, 2),
                note.notes.clone(),
            ]
        })
        .collect();
    output_section("Daily notes");
    table(
        &["Date", "Flock", "Eggs", "Losses", "Feed kg", "Laying", "kg/dz", "Notes"],
        &rows,
    );
    Ok(())
}
