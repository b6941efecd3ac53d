use crate::cli::core::{parse_count, parse_date, split_options, usage, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{section as output_section, table};
use crate::cli::registry::CommandEntry;
use crate::core::services::FlockForm;
use crate::errors::FarmError;
use crate::ledger::FlockEntry;

const ADD_USAGE: &str = "flock add <name> <quantity> <age_weeks> <lineage> [arrival=YYYY-MM-DD]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "flock",
        "Register, inspect and remove flocks",
        "flock [list|show <flock>|add <name> <quantity> <age_weeks> <lineage> [arrival=YYYY-MM-DD]|remove <flock>]",
        cmd_flock,
    )]
}

fn cmd_flock(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    context.require_session()?;
    match args.first().map(|action| action.to_lowercase()).as_deref() {
        None | Some("list") => list_flocks(context),
        Some("add") => add_flock(context, &args[1..]),
        Some("show") => show_flock(context, &args[1..]),
        Some("remove") | Some("rm") => remove_flock(context, &args[1..]),
        Some(other) => Err(usage(&format!(
            "flock [list|show|add|remove] (unknown action `{other}`)"
        ))),
    }
}

pub(crate) fn resolve_flock<'a>(
    context: &'a ShellContext,
    reference: &str,
) -> Result<&'a FlockEntry, CommandError> {
    context
        .manager
        .state()
        .find_flock(reference)
        .ok_or_else(|| FarmError::FlockNotFound(reference.to_string()).into())
}

fn add_flock(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (positional, options) = split_options(args, &["arrival"]);
    if positional.len() < 4 {
        return Err(usage(ADD_USAGE));
    }
    let form = FlockForm {
        name: positional[0].to_string(),
        quantity: parse_count(positional[1], "quantity")?,
        age_in_weeks: parse_count(positional[2], "age in weeks")?,
        lineage: positional[3..].join(" "),
        arrival_date: parse_date(options.get("arrival").copied())?,
    };
    if !context.manager.has_advisory() {
        io::print_hint("Advisory service not configured; the flock is saved without a plan.");
    }

    let id = context.runtime.block_on(context.manager.add_flock(form))?;
    let planned = context
        .manager
        .state()
        .flock(id)
        .map(|flock| flock.nutrition_plan.is_some())
        .unwrap_or(false);
    io::print_success(format!(
        "Flock registered{}.",
        if planned { " with a nutrition plan" } else { "" }
    ));
    Ok(())
}

fn list_flocks(context: &ShellContext) -> CommandResult {
    let state = context.manager.state();
    if state.flocks.is_empty() {
        io::print_info("No flocks registered. Use `flock add` to create one.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = state
        .flocks
        .iter()
        .map(|flock| {
            vec![
                flock.name.clone(),
                flock.quantity.to_string(),
                flock.age_in_weeks.to_string(),
                flock.lineage.clone(),
                context.date_label(&flock.arrival_date),
                if flock.is_alert() { "ALERT" } else { "normal" }.to_string(),
            ]
        })
        .collect();
    output_section("Flocks");
    table(
        &["Flock", "Birds", "Weeks", "Lineage", "Arrival", "Status"],
        &rows,
    );
    io::print_info(format!("Live birds: {}", state.live_birds()));
    Ok(())
}

fn show_flock(context: &ShellContext, args: &[&str]) -> CommandResult {
    let reference = args.first().ok_or_else(|| usage("flock show <flock>"))?;
    let flock = resolve_flock(context, reference)?;
    output_section(format!("Flock {}", flock.name));
    io::print_info(format!("  Id           : {}", flock.id));
    io::print_info(format!("  Birds        : {}", flock.quantity));
    io::print_info(format!("  Age          : {} weeks", flock.age_in_weeks));
    io::print_info(format!("  Lineage      : {}", flock.lineage));
    io::print_info(format!("  Arrival      : {}", context.date_label(&flock.arrival_date)));
    if flock.is_alert() {
        io::print_warning("Mortality above 2% recorded in this session.");
    }

    let Some(plan) = flock.nutrition_plan.as_ref() else {
        io::print_info("  No nutrition plan attached.");
        return Ok(());
    };
    output_section("Nutrition plan");
    io::print_info(format!("  {}", plan.summary));
    io::print_info(format!("  Laying expected : {}", plan.estimated_laying_date));
    io::print_info(format!(
        "  Feed           : {} g/bird/day, {} kg/month ({})",
        plan.feed_consumption_info.daily_per_bird_grams,
        plan.feed_consumption_info.monthly_total_kg,
        plan.feed_consumption_info.current_feed_type
    ));
    io::print_info(format!(
        "  Next change    : week {} -> {} ({})",
        plan.next_feed_change.week,
        plan.next_feed_change.target_feed_type,
        plan.next_feed_change.description
    ));
    if !plan.vaccination_schedule.is_empty() {
        let rows: Vec<Vec<String>> = plan
            .vaccination_schedule
            .iter()
            .map(|entry| {
                vec![
                    entry.week.to_string(),
                    entry.date.clone(),
                    entry.vaccine.clone(),
                    entry.method.clone(),
                ]
            })
            .collect();
        table(&["Week", "Date", "Vaccine", "Route"], &rows);
    }
    for protocol in &plan.biosecurity_protocols {
        io::print_info(format!("  - {protocol}"));
    }
    for alert in &plan.health_alerts {
        io::print_warning(alert);
    }
    Ok(())
}

fn remove_flock(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let reference = args.first().ok_or_else(|| usage("flock remove <flock>"))?;
    let id = resolve_flock(context, reference)?.id;
    let removed = context.runtime.block_on(context.manager.remove_flock(id))?;
    io::print_success(format!("Flock `{}` removed.", removed.name));
    Ok(())
}
