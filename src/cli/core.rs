//! Core CLI dispatch, errors, and argument helpers shared by the commands.

use std::{collections::BTreeMap, io};

use rustyline::error::ReadlineError;
use strsim::levenshtein;
use thiserror::Error;

use crate::config::ConfigError;
use crate::errors::FarmError;
use crate::ledger::{IsoDate, TransactionKind};

use super::io as cli_io;
pub use super::shell_context::{CliMode, ShellContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Farm(#[from] FarmError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::Farm(FarmError::Config(err))
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("No farm session. Use `login <email>` first.")]
    NotLoggedIn,
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Farm(FarmError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<FarmError> for CommandError {
    fn from(err: FarmError) -> Self {
        match err {
            FarmError::NotLoggedIn => CommandError::NotLoggedIn,
            FarmError::InvalidInput(message) => CommandError::InvalidArguments(message),
            other => CommandError::Farm(other),
        }
    }
}

impl ShellContext {
    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                cli_io::print_warning(err.to_string());
                return Ok(LoopControl::Continue);
            }
        };

        if tokens.is_empty() {
            return Ok(LoopControl::Continue);
        }

        let raw = &tokens[0];
        let command = raw.to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.last_command = Some(line.trim().to_string());

        match self.dispatch(&command, raw, &args) {
            Ok(LoopControl::Exit) => {
                self.running = false;
                Ok(LoopControl::Exit)
            }
            other => other,
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let lowered = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|key| (levenshtein(key, &lowered), key))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = best {
            if distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit shell?", true)
            .map_err(|err| CliError::Command(err.to_string()))
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(&message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::NotLoggedIn => {
                cli_io::print_error("No farm session. Use `login <email>` first.");
                cli_io::print_hint("Try `login produtor@exemplo.com` to get started.");
                Ok(())
            }
            CommandError::Farm(FarmError::AdvisoryUnavailable) => {
                cli_io::print_error("Advisory service is not configured.");
                cli_io::print_hint(
                    "Set it with `config set advisory_api_key <key>` or COOP_CORE_ADVISORY_KEY.",
                );
                Ok(())
            }
            other => {
                cli_io::print_error(other.to_string());
                Ok(())
            }
        }
    }
}

pub(crate) fn usage(text: &str) -> CommandError {
    CommandError::InvalidArguments(format!("usage: {text}"))
}

/// Splits `key=value` options from positional arguments. Only the listed
/// keys are treated as options, so free text may still contain `=`.
pub(crate) fn split_options<'a>(
    args: &[&'a str],
    keys: &[&str],
) -> (Vec<&'a str>, BTreeMap<String, &'a str>) {
    let mut positional = Vec::new();
    let mut options = BTreeMap::new();
    for arg in args {
        match arg.split_once('=') {
            Some((key, value)) if keys.contains(&key.to_ascii_lowercase().as_str()) => {
                options.insert(key.to_ascii_lowercase(), value);
            }
            _ => positional.push(*arg),
        }
    }
    (positional, options)
}

/// Accepts both `1.50` and `1,50`.
pub(crate) fn parse_amount(value: &str, label: &str) -> Result<f64, CommandError> {
    let normalized = value.trim().replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(amount),
        _ => Err(CommandError::InvalidArguments(format!(
            "{label} must be a number (got `{value}`)"
        ))),
    }
}

pub(crate) fn parse_count(value: &str, label: &str) -> Result<u32, CommandError> {
    value.trim().parse::<u32>().map_err(|_| {
        CommandError::InvalidArguments(format!(
            "{label} must be a whole number (got `{value}`)"
        ))
    })
}

/// `today`/`hoje` or `YYYY-MM-DD`.
pub(crate) fn parse_date(value: Option<&str>) -> Result<IsoDate, CommandError> {
    match value.map(str::trim) {
        None | Some("") => Ok(IsoDate::today()),
        Some(text) if text.eq_ignore_ascii_case("today") || text.eq_ignore_ascii_case("hoje") => {
            Ok(IsoDate::today())
        }
        Some(text) => Ok(IsoDate::parse(text)?),
    }
}

pub(crate) fn parse_kind(value: &str) -> Result<TransactionKind, CommandError> {
    TransactionKind::parse(value).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "`{value}` is not a transaction kind; use receita or despesa"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_are_split_from_positionals() {
        let args = ["Ração", "80", "qty=2", "desc=a=b", "x=1"];
        let (positional, options) = split_options(&args, &["qty", "desc"]);
        assert_eq!(positional, vec!["Ração", "80", "x=1"]);
        assert_eq!(options.get("qty"), Some(&"2"));
        assert_eq!(options.get("desc"), Some(&"a=b"));
    }

    #[test]
    fn amounts_accept_decimal_comma() {
        assert_eq!(parse_amount("1,50", "price").unwrap(), 1.5);
        assert!(parse_amount("abc", "price").is_err());
    }

    #[test]
    fn not_logged_in_maps_to_its_own_variant() {
        let err: CommandError = FarmError::NotLoggedIn.into();
        assert!(matches!(err, CommandError::NotLoggedIn));
    }
}
