use crate::cli::core::{
    parse_amount, parse_date, parse_kind, split_options, usage, CommandError, CommandResult,
    ShellContext,
};
use crate::cli::io;
use crate::cli::output::{section as output_section, table};
use crate::cli::registry::CommandEntry;
use crate::errors::FarmError;
use crate::ledger::CatalogItem;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "catalog",
        "Manage reusable products and record them as transactions",
        "catalog [list|add <receita|despesa> <name> <base_price> [unit=<unit>]|remove <item>|use <item> <qty> [date=YYYY-MM-DD]]",
        cmd_catalog,
    )]
}

fn cmd_catalog(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|action| action.to_lowercase()).as_deref() {
        None | Some("list") => list_items(context),
        Some("add") => add_item(context, &args[1..]),
        Some("remove") | Some("rm") => remove_item(context, &args[1..]),
        Some("use") => use_item(context, &args[1..]),
        Some(other) => Err(usage(&format!(
            "catalog [list|add|remove|use] (unknown action `{other}`)"
        ))),
    }
}

fn resolve_item<'a>(
    context: &'a ShellContext,
    reference: &str,
) -> Result<&'a CatalogItem, CommandError> {
    context
        .manager
        .state()
        .find_catalog_item(reference)
        .ok_or_else(|| FarmError::CatalogItemNotFound(reference.to_string()).into())
}

fn list_items(context: &ShellContext) -> CommandResult {
    let catalog = &context.manager.state().catalog;
    if catalog.is_empty() {
        io::print_info("The catalog is empty. Use `catalog add` to create an item.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = catalog
        .iter()
        .map(|item| {
            vec![
                item.name.clone(),
                item.unit.clone(),
                context.money(item.base_price),
                item.kind.to_string(),
            ]
        })
        .collect();
    output_section("Catalog");
    table(&["Item", "Unit", "Base price", "Kind"], &rows);
    Ok(())
}

fn add_item(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (positional, options) = split_options(args, &["unit"]);
    if positional.len() < 3 {
        return Err(usage(
            "catalog add <receita|despesa> <name> <base_price> [unit=<unit>]",
        ));
    }
    let kind = parse_kind(positional[0])?;
    let price = parse_amount(positional[2], "base price")?;
    let unit = options.get("unit").copied().unwrap_or_default();
    context
        .manager
        .add_catalog_item(positional[1], unit, price, kind)?;
    context.persist_config()?;
    io::print_success(format!("`{}` added to the catalog.", positional[1].trim()));
    Ok(())
}

fn remove_item(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let reference = args.first().ok_or_else(|| usage("catalog remove <item>"))?;
    let id = resolve_item(context, reference)?.id;
    let removed = context.manager.remove_catalog_item(id)?;
    context.persist_config()?;
    io::print_success(format!("`{}` removed from the catalog.", removed.name));
    Ok(())
}

fn use_item(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    context.require_session()?;
    let (positional, options) = split_options(args, &["date"]);
    if positional.len() < 2 {
        return Err(usage("catalog use <item> <qty> [date=YYYY-MM-DD]"));
    }
    let id = resolve_item(context, positional[0])?.id;
    let qty = parse_amount(positional[1], "qty")?;
    let date = parse_date(options.get("date").copied())?;
    let txn_id = context
        .runtime
        .block_on(context.manager.add_catalog_transaction(id, qty, date))?;
    let total = context
        .manager
        .state()
        .transaction(txn_id)
        .map(|txn| txn.total())
        .unwrap_or_default();
    io::print_success(format!("Recorded {} from the catalog.", context.money(total)));
    Ok(())
}
