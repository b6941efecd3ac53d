use crate::advisory::{
    BiosecurityReport, ChecklistCategory, FinanceAdvice, HandlingRequest, VetRequest,
};
use crate::cli::commands::flock::resolve_flock;
use crate::cli::core::{
    parse_amount, parse_count, parse_date, split_options, usage, CommandError, CommandResult,
    ShellContext,
};
use crate::cli::io;
use crate::cli::output::{section as output_section, table};
use crate::cli::registry::CommandEntry;
use crate::currency::format_number;
use crate::ledger::AnimalPhase;

const USAGE: &str = "advise [formulate <phase>|finance <price_per_dozen>|vet <age> <lineage> <description...>|biosecurity <flock> <lost_today>|handling <flock> <origin> <destination>|inventory|ad <egg type>]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "advise",
        "Ask the farm advisor for feed, finance, health and marketing help",
        USAGE,
        cmd_advise,
    )]
}

fn cmd_advise(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    context.require_session()?;
    let rest = args.get(1..).unwrap_or_default();
    match args.first().map(|action| action.to_lowercase()).as_deref() {
        Some("formulate") | Some("feed") => formulate(context, rest),
        Some("finance") => finance(context, rest),
        Some("vet") => vet(context, rest),
        Some("biosecurity") | Some("bio") => biosecurity(context, rest),
        Some("handling") | Some("move") => handling(context, rest),
        Some("inventory") => inventory(context),
        Some("ad") => advertise(context, rest),
        _ => Err(usage(USAGE)),
    }
}

fn formulate(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let phase = match args.first() {
        Some(raw) => AnimalPhase::from_key(raw).ok_or_else(|| {
            let keys: Vec<&str> = AnimalPhase::ALL.iter().map(|phase| phase.key()).collect();
            CommandError::InvalidArguments(format!(
                "unknown phase `{raw}`; expected one of {}",
                keys.join(", ")
            ))
        })?,
        None => AnimalPhase::default(),
    };

    let result = context.block_on(context.manager.formulate_feed(phase))?;
    let locale = context.locale();
    let rows: Vec<Vec<String>> = result
        .composition
        .iter()
        .map(|line| {
            vec![
                line.ingredient.clone(),
                format_number(&locale, line.weight_kg, 2),
                context.money(line.cost),
            ]
        })
        .collect();
    output_section(format!("Feed batch 100 kg · {}", phase.label()));
    table(&["Ingredient", "kg", "Cost"], &rows);
    io::print_info(format!("Total: {}", context.money(result.total_cost)));
    io::print_info(format!(
        "Protein {} · Energy {}",
        context.percent(result.protein_level),
        result.energy_level
    ));
    for suggestion in &result.suggestions {
        io::print_hint(suggestion);
    }
    Ok(())
}

fn finance(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (positional, options) = split_options(args, &["date", "birds", "eggs", "cost"]);
    let price = positional
        .first()
        .ok_or_else(|| usage("advise finance <price_per_dozen> [date=] [birds=] [eggs=] [cost=]"))?;
    let price_per_dozen = parse_amount(price, "price per dozen")?;
    let date = parse_date(options.get("date").copied())?;

    let mut request = context.manager.finance_request(&date, price_per_dozen);
    if let Some(birds) = options.get("birds") {
        request.bird_count = u64::from(parse_count(birds, "birds")?);
    }
    if let Some(eggs) = options.get("eggs") {
        request.egg_count = u64::from(parse_count(eggs, "eggs")?);
    }
    if let Some(cost) = options.get("cost") {
        request.daily_cost = parse_amount(cost, "cost")?;
    }

    let advice = context.block_on(context.manager.finance_advice(&request))?;
    print_finance(context, &advice);
    Ok(())
}

fn print_finance(context: &ShellContext, advice: &FinanceAdvice) {
    output_section("Finance");
    io::print_info(format!(
        "  Productivity : {}",
        context.percent(advice.productivity_percentage)
    ));
    io::print_info(format!("  Cost/egg     : {}", context.money(advice.cost_per_egg)));
    io::print_info(format!("  Revenue      : {}", context.money(advice.revenue)));
    io::print_info(format!("  Net profit   : {}", context.money(advice.net_profit)));
    io::print_info(&advice.analysis);
    for tip in &advice.improvement_tips {
        io::print_hint(format!("{}: {}", tip.reason, tip.solution));
    }
}

fn vet(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (positional, options) = split_options(args, &["image"]);
    if positional.len() < 2 {
        return Err(usage(
            "advise vet <age> <lineage> <description...> [image=<base64>]",
        ));
    }
    let request = VetRequest {
        images: options
            .get("image")
            .map(|image| vec![image.to_string()])
            .unwrap_or_default(),
        age: positional[0].to_string(),
        lineage: positional[1].to_string(),
        description: positional[2..].join(" "),
    };

    let diagnosis = context.block_on(context.manager.vet_triage(&request))?;
    output_section("Triage");
    io::print_info(&diagnosis.diagnosis);
    if !diagnosis.signs_observed.is_empty() {
        io::print_info("Signs observed:");
        for sign in &diagnosis.signs_observed {
            io::print_info(format!("  - {sign}"));
        }
    }
    io::print_info("First aid:");
    for (index, step) in diagnosis.first_aid_steps.iter().enumerate() {
        io::print_info(format!("  {}. {step}", index + 1));
    }
    io::print_warning(&diagnosis.important_notice);
    Ok(())
}

fn biosecurity(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 2 {
        return Err(usage("advise biosecurity <flock> <lost_today>"));
    }
    let lost_today = parse_count(args[1], "lost today")?;
    let request = context.manager.biosecurity_request(args[0], lost_today)?;
    let report = context.block_on(context.manager.biosecurity_check(&request))?;
    print_biosecurity(context, &request.batch_name, &report);
    Ok(())
}

fn print_biosecurity(context: &ShellContext, batch: &str, report: &BiosecurityReport) {
    output_section(format!("Biosecurity · {batch}"));
    io::print_info(format!(
        "  Cumulative mortality: {}",
        context.percent(report.cumulative_mortality_rate)
    ));
    io::print_info(format!(
        "  Live birds remaining: {}",
        format_number(&context.locale(), report.live_birds_remaining, 0)
    ));
    if report.is_red_alert {
        io::print_error("RED ALERT: isolate the flock and call a veterinarian.");
    }
    io::print_info(&report.analysis);
    for cause in &report.probable_causes {
        io::print_info(format!("  ? {cause}"));
    }
    for step in &report.emergency_procedures {
        io::print_warning(step);
    }
}

fn handling(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 3 {
        return Err(usage("advise handling <flock> <origin> <destination>"));
    }
    let flock = resolve_flock(context, args[0])?;
    let request = HandlingRequest {
        batch_name: flock.name.clone(),
        origin: args[1].to_string(),
        destination: args[2..].join(" "),
        bird_count: flock.quantity,
    };

    let checklist = context.block_on(context.manager.handling_checklist(&request))?;
    output_section(format!("Transfer · {}", checklist.batch_name));
    let rows: Vec<Vec<String>> = checklist
        .checklist
        .iter()
        .map(|item| {
            vec![
                checklist_label(item.category).to_string(),
                item.task.clone(),
                item.description.clone(),
            ]
        })
        .collect();
    table(&["Area", "Task", "Detail"], &rows);
    io::print_info("Anti-stress:");
    for step in &checklist.anti_stress_protocol {
        io::print_info(format!("  - {step}"));
    }
    io::print_info(format!(
        "Bedding {} · Light {}",
        checklist.shed_specs.bedding_type, checklist.shed_specs.lighting_hours
    ));
    io::print_hint(&checklist.expert_note);
    Ok(())
}

fn checklist_label(category: ChecklistCategory) -> &'static str {
    match category {
        ChecklistCategory::Bedding => "bedding",
        ChecklistCategory::Waterers => "waterers",
        ChecklistCategory::Lighting => "lighting",
        ChecklistCategory::Disinfection => "disinfection",
    }
}

fn inventory(context: &mut ShellContext) -> CommandResult {
    let report = context.block_on(context.manager.inventory_report())?;
    let locale = context.locale();
    output_section(format!(
        "Inventory · {} birds",
        format_number(&locale, report.total_birds, 0)
    ));
    for category in &report.categories {
        io::print_info(format!(
            "{} ({})",
            category.category,
            format_number(&locale, category.total_count, 0)
        ));
        for flock in &category.flocks {
            let mut line = format!(
                "  {} · {} birds · {} weeks",
                flock.name,
                format_number(&locale, flock.quantity, 0),
                format_number(&locale, flock.age, 0)
            );
            if let Some(stats) = &flock.stats {
                line.push_str(&format!(
                    " · {} weeks left · {}",
                    format_number(&locale, stats.remaining_productive_weeks, 0),
                    stats.replacement_urgency
                ));
            }
            io::print_info(line);
        }
    }
    io::print_hint(&report.manager_analysis);
    Ok(())
}

fn advertise(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(usage("advise ad <egg type>"));
    }
    let egg_type = args.join(" ");
    let text = context.block_on(context.manager.egg_ad(&egg_type))?;
    output_section("Ad");
    io::print_info(text);
    Ok(())
}
