use crate::cli::core::{parse_kind, usage, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::ledger::TransactionKind;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "category",
        "List categories or add a custom one",
        "category [list [receita|despesa]|add <receita|despesa> <name>]",
        cmd_category,
    )]
}

fn cmd_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|action| action.to_lowercase()).as_deref() {
        None | Some("list") => {
            let kinds = match args.get(1) {
                Some(kind) => vec![parse_kind(kind)?],
                None => vec![TransactionKind::Inflow, TransactionKind::Outflow],
            };
            for kind in kinds {
                output_section(kind);
                for label in context.manager.categories(kind) {
                    io::print_info(format!("  {label}"));
                }
            }
            Ok(())
        }
        Some("add") => {
            if args.len() < 3 {
                return Err(usage("category add <receita|despesa> <name>"));
            }
            let kind = parse_kind(args[1])?;
            let name = args[2..].join(" ");
            if context.manager.add_custom_category(kind, &name)? {
                context.persist_config()?;
                io::print_success(format!("Category `{}` added to {}.", name.trim(), kind));
            } else {
                io::print_info(format!("`{}` is already a {} category.", name.trim(), kind));
            }
            Ok(())
        }
        Some(other) => Err(usage(&format!(
            "category [list|add] (unknown action `{other}`)"
        ))),
    }
}
