use uuid::Uuid;

use crate::cli::core::{
    parse_amount, parse_date, parse_kind, split_options, usage, CommandError, CommandResult,
    ShellContext,
};
use crate::cli::io;
use crate::cli::output::{section as output_section, table};
use crate::cli::registry::CommandEntry;
use crate::core::services::SummaryService;
use crate::ledger::{DatePeriod, KindFilter, TransactionForm};

const ADD_USAGE: &str =
    "txn add <receita|despesa> <category> <unit_price> [qty=N] [item=<name>] [date=YYYY-MM-DD] [desc=<text>]";

/// Shortest id prefix accepted by `txn remove`.
const MIN_ID_PREFIX: usize = 4;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "txn",
        "Record, list and remove income and expenses",
        "txn [list [todos|receita|despesa] [YYYY-MM|YYYY-MM-DD]|add <receita|despesa> <category> <unit_price> [qty=N] [item=<name>] [date=YYYY-MM-DD] [desc=<text>]|remove <id>]",
        cmd_txn,
    )]
}

fn cmd_txn(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    context.require_session()?;
    match args.first().map(|action| action.to_lowercase()).as_deref() {
        None | Some("list") => list_transactions(context, args.get(1..).unwrap_or_default()),
        Some("add") => add_transaction(context, &args[1..]),
        Some("remove") | Some("rm") => remove_transaction(context, &args[1..]),
        Some(other) => Err(usage(&format!(
            "txn [list|add|remove] (unknown action `{other}`)"
        ))),
    }
}

fn add_transaction(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (positional, options) = split_options(args, &["qty", "item", "date", "desc"]);
    if positional.len() < 3 {
        return Err(usage(ADD_USAGE));
    }
    let kind = parse_kind(positional[0])?;
    let category = positional[1].trim().to_string();
    if !context.manager.categories(kind).contains(&category) {
        io::print_hint(format!(
            "`{category}` is not a known category; add it with `category add {} \"{category}\"`.",
            kind.wire_name()
        ));
    }
    let form = TransactionForm {
        kind,
        category,
        item_name: options.get("item").map(|item| item.to_string()),
        qty: options
            .get("qty")
            .map(|qty| parse_amount(qty, "qty"))
            .transpose()?,
        unit_price: parse_amount(positional[2], "unit price")?,
        date: parse_date(options.get("date").copied())?,
        description: options.get("desc").map(|desc| desc.to_string()),
    };

    let id = context
        .runtime
        .block_on(context.manager.add_transaction(form))?;
    let total = context
        .manager
        .state()
        .transaction(id)
        .map(|txn| txn.total())
        .unwrap_or_default();
    io::print_success(format!("{} recorded: {}.", kind, context.money(total)));
    Ok(())
}

fn list_transactions(context: &ShellContext, args: &[&str]) -> CommandResult {
    let mut filter = KindFilter::All;
    let mut period = None;
    for arg in args {
        if let Some(parsed) = KindFilter::parse(arg) {
            filter = parsed;
        } else {
            period = Some(DatePeriod::parse(arg)?);
        }
    }

    let transactions = context.manager.transactions_filtered(filter, period.as_ref());
    let totals = SummaryService::finance_totals(transactions.iter().copied());
    if transactions.is_empty() {
        io::print_info("No transactions match.");
    } else {
        let rows: Vec<Vec<String>> = transactions
            .iter()
            .map(|txn| {
                vec![
                    short_id(txn.id),
                    context.date_label(&txn.date),
                    txn.kind.to_string(),
                    txn.item_name.clone(),
                    format!("{}", txn.qty),
                    context.money(txn.unit_price),
                    context.money(txn.signed_total()),
                    txn.description.clone().unwrap_or_default(),
                ]
            })
            .collect();
        output_section("Transactions");
        table(
            &["Id", "Date", "Kind", "Item", "Qty", "Unit", "Total", "Description"],
            &rows,
        );
    }
    io::print_info(format!(
        "Receitas {} · Despesas {} · Saldo {}",
        context.money(totals.inflow),
        context.money(totals.outflow),
        context.money(totals.net)
    ));
    Ok(())
}

fn remove_transaction(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let reference = args.first().ok_or_else(|| usage("txn remove <id>"))?;
    let id = resolve_transaction_id(context, reference)?;
    context
        .runtime
        .block_on(context.manager.remove_transaction(id))?;
    io::print_success("Transaction removed.");
    Ok(())
}

fn short_id(id: Uuid) -> String {
    id.to_string().chars().take(8).collect()
}

/// Full id, or an unambiguous prefix of one listed by `txn list`.
fn resolve_transaction_id(context: &ShellContext, reference: &str) -> Result<Uuid, CommandError> {
    let needle = reference.trim().to_lowercase();
    if let Ok(id) = Uuid::parse_str(&needle) {
        return Ok(id);
    }
    if needle.len() < MIN_ID_PREFIX {
        return Err(CommandError::InvalidArguments(format!(
            "use at least {MIN_ID_PREFIX} characters of the transaction id"
        )));
    }
    let mut matches = context
        .manager
        .state()
        .transactions
        .iter()
        .filter(|txn| txn.id.to_string().starts_with(&needle))
        .map(|txn| txn.id);
    match (matches.next(), matches.next()) {
        (Some(id), None) => Ok(id),
        (None, _) => Err(CommandError::InvalidArguments(format!(
            "no transaction id starts with `{reference}`"
        ))),
        (Some(_), Some(_)) => Err(CommandError::InvalidArguments(format!(
            "`{reference}` matches more than one transaction"
        ))),
    }
}
