use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::core::services::ProductionSummary;
use crate::currency::format_number;
use crate::ledger::{DatePeriod, IsoDate};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "summary",
            "Production and finance figures for a day or a month",
            "summary [YYYY-MM-DD|YYYY-MM]",
            cmd_summary,
        ),
        CommandEntry::new(
            "dashboard",
            "Today and this month at a glance",
            "dashboard",
            cmd_dashboard,
        ),
    ]
}

fn cmd_summary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    context.require_session()?;
    let period = match args.first() {
        Some(raw) => DatePeriod::parse(raw)?,
        None => DatePeriod::month_of(&IsoDate::today()),
    };
    let summary = context.manager.production_summary(&period);
    output_section(format!("Summary {}", summary.period));
    print_summary(context, &summary);
    Ok(())
}

fn cmd_dashboard(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.require_session()?;
    let dashboard = context.manager.dashboard(&IsoDate::today());
    output_section(format!("{} · plan {}", dashboard.farm_name, dashboard.tier));
    io::print_info(format!("  Cycle day    : {}/30", dashboard.cycle_day));
    io::print_info(format!("  Flocks       : {}", dashboard.flock_count));
    for name in &dashboard.alert_flocks {
        io::print_warning(format!("Mortality alert: {name}"));
    }

    output_section(format!("Today {}", dashboard.today.period));
    print_summary(context, &dashboard.today);
    output_section(format!("Month {}", dashboard.month.period));
    print_summary(context, &dashboard.month);
    io::print_info(format!(
        "  Margin       : {}",
        context.percent(dashboard.profit_margin)
    ));
    io::print_info(format!(
        "  Revenue share: {}",
        context.percent(dashboard.revenue_share)
    ));
    Ok(())
}

fn print_summary(context: &ShellContext, summary: &ProductionSummary) {
    let locale = context.locale();
    io::print_info(format!("  Notes        : {}", summary.note_count));
    io::print_info(format!("  Live birds   : {}", summary.live_birds));
    io::print_info(format!("  Eggs         : {}", summary.eggs));
    io::print_info(format!("  Mortality    : {}", summary.mortality));
    io::print_info(format!("  Laying rate  : {}", context.percent(summary.laying_rate)));
    io::print_info(format!(
        "  Feed         : {} kg",
        format_number(&locale, summary.feed_kg, 2)
    ));
    io::print_info(format!(
        "  Feed/dozen   : {} kg",
        format_number(&locale, summary.feed_per_dozen, 2)
    ));
    io::print_info(format!("  Cost/egg     : {}", context.money(summary.cost_per_egg)));
    io::print_info(format!("  Income       : {}", context.money(summary.finance.inflow)));
    io::print_info(format!("  Expenses     : {}", context.money(summary.finance.outflow)));
    io::print_info(format!("  Balance      : {}", context.money(summary.finance.net)));
}
