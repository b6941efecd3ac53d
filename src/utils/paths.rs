use dirs::home_dir;
use std::{env, path::PathBuf};

pub const HOME_ENV: &str = "COOP_CORE_HOME";
const DEFAULT_DIR_NAME: &str = ".coop_core";
const CONFIG_FILE: &str = "config.json";
const STORE_FILE: &str = "records.json";
const HISTORY_FILE: &str = "history.txt";

/// Returns the application data directory, defaulting to `~/.coop_core`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub fn config_file_in(root: &std::path::Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Local record document used when no hosted store is configured.
pub fn store_file_in(root: &std::path::Path) -> PathBuf {
    root.join(STORE_FILE)
}

pub fn history_file_in(root: &std::path::Path) -> PathBuf {
    root.join(HISTORY_FILE)
}
