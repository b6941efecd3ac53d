use crate::cli::io;
use crate::cli::output::{section as output_section, table};
use crate::cli::registry::{CommandEntry, CommandRegistry};

pub fn print_overview(registry: &CommandRegistry) {
    output_section("Commands");
    let rows: Vec<Vec<String>> = registry
        .list()
        .into_iter()
        .map(|entry| vec![entry.name.to_string(), entry.description.to_string()])
        .collect();
    table(&["Command", "What it does"], &rows);
    io::print_hint("Start with `login <email>`; `help <command>` shows the arguments.");
}

pub fn print_command(entry: &CommandEntry) {
    output_section(entry.name);
    io::print_info(entry.description);
    io::print_info(format!("Usage: {}", entry.usage));
}
