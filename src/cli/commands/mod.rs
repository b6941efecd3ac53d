pub mod advise;
pub mod catalog;
pub mod category;
pub mod config;
pub mod feed;
pub mod flock;
pub mod note;
pub mod report;
pub mod session;
pub mod system;
pub mod transaction;

use crate::cli::registry::CommandEntry;

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(system::definitions());
    commands.extend(config::definitions());
    commands.extend(session::definitions());
    commands.extend(flock::definitions());
    commands.extend(note::definitions());
    commands.extend(transaction::definitions());
    commands.extend(category::definitions());
    commands.extend(catalog::definitions());
    commands.extend(report::definitions());
    commands.extend(feed::definitions());
    commands.extend(advise::definitions());
    commands
}
