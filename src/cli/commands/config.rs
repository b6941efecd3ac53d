use crate::cli::core::{usage, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::config::SETTABLE_KEYS;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and change local settings",
        "config [show|path|set <key> <value>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        return show_config(context);
    }

    match args[0].to_lowercase().as_str() {
        "set" => {
            if args.len() < 2 {
                return Err(usage(&format!(
                    "config set <{}> <value>",
                    SETTABLE_KEYS.join("|")
                )));
            }
            let key = args[1].to_lowercase();
            let value = args[2..].join(" ");
            context.set_config_value(&key, value.trim())?;
            io::print_success(format!("`{key}` updated."));
            Ok(())
        }
        "path" => {
            io::print_info(context.config_manager.config_path().display());
            Ok(())
        }
        other => Err(usage(&format!(
            "config [show|path|set <key> <value>] (unknown action `{other}`)"
        ))),
    }
}

fn show_config(context: &ShellContext) -> CommandResult {
    output_section("Configuration");
    for (key, value) in context.config.display_entries() {
        io::print_info(format!("  {key:<28} {value}"));
    }
    io::print_info(format!("  {:<28} {}", "store", context.manager.store_label()));
    io::print_info(format!(
        "  {:<28} {}",
        "advisory",
        if context.manager.has_advisory() {
            "ready"
        } else {
            "not configured"
        }
    ));
    Ok(())
}
