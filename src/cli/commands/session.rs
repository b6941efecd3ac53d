use crate::cli::core::{usage, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::ledger::ProfileChanges;

const PROFILE_FIELDS: &[&str] = &["farm_name", "farm_address", "owner_name", "document", "phone"];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "login",
            "Open the farm of a registered email",
            "login <email>",
            cmd_login,
        ),
        CommandEntry::new("logout", "Close the current farm session", "logout", cmd_logout),
        CommandEntry::new(
            "reload",
            "Fetch flocks, notes and transactions again",
            "reload",
            cmd_reload,
        ),
        CommandEntry::new(
            "profile",
            "Show or edit the farm profile",
            "profile [show|set <farm_name|farm_address|owner_name|document|phone> <value>]",
            cmd_profile,
        ),
    ]
}

fn cmd_login(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let email = args.first().ok_or_else(|| usage("login <email>"))?;
    context.runtime.block_on(context.manager.login(email))?;
    context.persist_config()?;
    if let Some(profile) = context.manager.state().profile.as_ref() {
        io::print_success(format!(
            "Welcome, {} ({}) · plan {}",
            profile.owner_name, profile.farm_name, profile.tier
        ));
    }
    Ok(())
}

fn cmd_logout(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.manager.is_logged_in() {
        io::print_info("No session is open.");
        return Ok(());
    }
    context.manager.logout();
    context.persist_config()?;
    io::print_success("Session closed.");
    Ok(())
}

fn cmd_reload(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.require_session()?;
    context.runtime.block_on(context.manager.reload())?;
    let state = context.manager.state();
    io::print_success(format!(
        "Reloaded {} flocks, {} notes and {} transactions.",
        state.flocks.len(),
        state.notes.len(),
        state.transactions.len()
    ));
    Ok(())
}

fn cmd_profile(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    context.require_session()?;
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        return show_profile(context);
    }
    if !args[0].eq_ignore_ascii_case("set") || args.len() < 3 {
        return Err(usage(
            "profile set <farm_name|farm_address|owner_name|document|phone> <value>",
        ));
    }

    let field = args[1].to_lowercase();
    let value = Some(args[2..].join(" ").trim().to_string());
    let mut changes = ProfileChanges::default();
    match field.as_str() {
        "farm_name" => changes.farm_name = value,
        "farm_address" => changes.farm_address = value,
        "owner_name" => changes.owner_name = value,
        "document" => changes.document = value,
        "phone" => changes.phone = value,
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown profile field `{other}`; expected one of {}",
                PROFILE_FIELDS.join(", ")
            )))
        }
    }
    context.runtime.block_on(context.manager.update_profile(changes))?;
    io::print_success("Profile updated.");
    Ok(())
}

fn show_profile(context: &ShellContext) -> CommandResult {
    let Some(profile) = context.manager.state().profile.as_ref() else {
        return Err(CommandError::NotLoggedIn);
    };
    let blank = |value: &str| if value.is_empty() { "-".to_string() } else { value.to_string() };
    output_section("Profile");
    io::print_info(format!("  Email        : {}", profile.email));
    io::print_info(format!("  Plan         : {}", profile.tier));
    io::print_info(format!("  Farm         : {}", profile.farm_name));
    io::print_info(format!("  Address      : {}", blank(&profile.farm_address)));
    io::print_info(format!("  Owner        : {}", profile.owner_name));
    io::print_info(format!("  Document     : {}", blank(&profile.document)));
    io::print_info(format!("  Phone        : {}", blank(&profile.phone)));
    Ok(())
}
