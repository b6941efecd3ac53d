use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "version",
            "Build banner and where farm records are kept",
            "version",
            cmd_version,
        ),
        CommandEntry::new(
            "help",
            "List commands or explain one",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("exit", "Leave the shell", "exit", cmd_exit),
    ]
}

fn cmd_version(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    io::print_info(build_info::current().summary());
    output_section("Farm data");
    io::print_info(format!(
        "  Data dir     : {}",
        context.config_manager.base_dir().display()
    ));
    io::print_info(format!("  Records      : {}", context.manager.store_label()));
    let advisor = if context.manager.has_advisory() {
        format!("ready ({})", context.config.advisory_model)
    } else {
        "not configured (set advisory_api_key)".to_string()
    };
    io::print_info(format!("  Advisor      : {advisor}"));
    io::print_info(format!(
        "  Session      : {}",
        context.manager.session().unwrap_or("none")
    ));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(name) = args.first() else {
        help::print_overview(&context.registry);
        return Ok(());
    };
    match context.command(&name.to_lowercase()) {
        Some(command) => help::print_command(command),
        None => context.suggest_command(name),
    }
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
