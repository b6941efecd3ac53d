//! Shared runtime state for CLI interactions and command execution.

use std::future::Future;

use dialoguer::theme::ColorfulTheme;
use tokio::runtime::{Builder, Runtime};
use tracing::{info, warn};

use crate::advisory::{AdvisoryService, GenerativeClient};
use crate::config::{Config, ConfigManager};
use crate::core::FarmManager;
use crate::currency::{format_currency, format_percent, LocaleFormat};
use crate::ledger::IsoDate;
use crate::storage::{JsonStore, RecordStore, RestStore};
use crate::utils::paths;

use super::commands;
use super::core::{CliError, CommandError, CommandResult};
use super::io as cli_io;
use super::output::{self, OutputPreferences};
use super::registry::{CommandEntry, CommandRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub manager: FarmManager,
    pub runtime: Runtime,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    /// Effective settings: the file plus environment overrides.
    pub config: Config,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        if mode == CliMode::Script {
            output::set_preferences(OutputPreferences {
                plain_mode: true,
                quiet_mode: false,
            });
        }

        let config_manager = ConfigManager::new()?;
        let config = config_manager.load_effective()?;
        let runtime = Builder::new_current_thread().enable_all().build()?;

        let store = build_store(&config, &config_manager)?;
        let mut manager = FarmManager::new(store);
        manager.apply_config(&config);
        manager.set_advisory(build_advisory(&config));

        let mut context = Self {
            mode,
            registry: CommandRegistry::with_entries(commands::all_definitions()),
            manager,
            runtime,
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            last_command: None,
            running: true,
        };
        context.restore_session();
        Ok(context)
    }

    fn restore_session(&mut self) {
        let Some(email) = self.config.last_email.clone() else {
            return;
        };
        let result = self.runtime.block_on(self.manager.login(&email));
        match result {
            Ok(()) => info!(email = %email, "previous session restored"),
            Err(err) => {
                warn!(email = %email, "could not restore session: {err}");
                cli_io::print_warning(format!("Could not restore the session for {email}: {err}"));
            }
        }
    }

    /// Runs a collaborator call to completion on the shell's runtime.
    pub(crate) fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn prompt(&self) -> String {
        match self.manager.state().profile.as_ref() {
            Some(profile) => format!("coop[{}]> ", profile.farm_name),
            None => "coop> ".into(),
        }
    }

    pub(crate) fn locale(&self) -> LocaleFormat {
        LocaleFormat::from_tag(&self.config.locale)
    }

    pub(crate) fn money(&self, amount: f64) -> String {
        format_currency(amount, &self.config.currency, &self.locale())
    }

    pub(crate) fn percent(&self, value: f64) -> String {
        format_percent(value, &self.locale())
    }

    pub(crate) fn date_label(&self, date: &IsoDate) -> String {
        date.to_naive()
            .map(|day| crate::currency::format_date(&self.locale(), day))
            .unwrap_or_else(|| date.to_string())
    }

    pub(crate) fn require_session(&self) -> CommandResult {
        if self.manager.is_logged_in() {
            Ok(())
        } else {
            Err(CommandError::NotLoggedIn)
        }
    }

    /// Writes the locally kept lists and session into the config file.
    /// Environment overrides are not written back.
    pub(crate) fn persist_config(&mut self) -> CommandResult {
        let mut stored = self.config_manager.load()?;
        self.manager.export_to_config(&mut stored);
        self.config_manager.save(&stored)?;
        self.manager.export_to_config(&mut self.config);
        Ok(())
    }

    /// Updates one setting in the file and reapplies the effective config.
    pub(crate) fn set_config_value(&mut self, key: &str, value: &str) -> CommandResult {
        let mut stored = self.config_manager.load()?;
        stored.set(key, value)?;
        self.manager.export_to_config(&mut stored);
        self.config_manager.save(&stored)?;

        self.config = self.config_manager.load_effective()?;
        self.manager.apply_config(&self.config);
        if key.starts_with("advisory_") || key == "request_timeout_secs" {
            self.manager.set_advisory(build_advisory(&self.config));
        }
        if key.starts_with("store_") {
            cli_io::print_hint("Store settings take effect the next time the shell starts.");
        }
        Ok(())
    }
}

/// Hosted REST tables when a store URL is configured, else the local
/// JSON document under the data directory.
fn build_store(
    config: &Config,
    config_manager: &ConfigManager,
) -> Result<Box<dyn RecordStore>, CliError> {
    if let Some(url) = config.store_url.as_deref() {
        let key = config.store_api_key.as_deref().unwrap_or_default();
        let store = RestStore::new(url, key, config.request_timeout())
            .map_err(|err| CliError::Input(format!("store configuration: {err}")))?;
        info!(store = %store.describe(), "using hosted store");
        return Ok(Box::new(store));
    }
    let path = paths::store_file_in(config_manager.base_dir());
    let store = JsonStore::open(path)
        .map_err(|err| CliError::Command(format!("local store: {err}")))?;
    info!(store = %store.describe(), "using local store");
    Ok(Box::new(store))
}

fn build_advisory(config: &Config) -> Option<Box<dyn AdvisoryService>> {
    let key = config.advisory_api_key.as_deref()?;
    match GenerativeClient::new(
        key,
        config.advisory_base_url.as_deref(),
        Some(&config.advisory_model),
        config.request_timeout(),
    ) {
        Ok(client) => Some(Box::new(client)),
        Err(err) => {
            warn!("advisory disabled: {err}");
            None
        }
    }
}
