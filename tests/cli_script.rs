use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn script_command(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("coop_core_cli").unwrap();
    cmd.env("COOP_CORE_CLI_SCRIPT", "1")
        .env("COOP_CORE_HOME", home.path())
        .env_remove("COOP_CORE_STORE_URL")
        .env_remove("COOP_CORE_STORE_KEY")
        .env_remove("COOP_CORE_ADVISORY_KEY");
    cmd
}

#[test]
fn script_mode_runs_a_production_day() {
    let home = TempDir::new().unwrap();
    let input = "\
# one day on the farm
login granja@example.com
flock add \"Lote A\" 150 20 Hy-Line W36 arrival=2024-03-01
note add \"Lote A\" 120 5 date=2024-03-10
txn add receita \"Venda de Ovos\" 12 qty=10 date=2024-03-10
txn list receita 2024-03
exit
";

    script_command(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Welcome"))
        .stdout(contains("Flock registered."))
        .stdout(contains("Note saved for Lote A: 120 eggs, laying rate 80,0%."))
        .stdout(contains("Receita recorded: R$"))
        .stdout(contains("Description"));

    assert!(home.path().join("records.json").exists());
    let config = std::fs::read_to_string(home.path().join("config.json")).unwrap();
    assert!(config.contains("granja@example.com"));
}

#[test]
fn session_is_restored_on_the_next_run() {
    let home = TempDir::new().unwrap();
    script_command(&home)
        .write_stdin("login granja@example.com\nflock add Galpao1 40 18 Embrapa\n")
        .assert()
        .success();

    script_command(&home)
        .write_stdin("flock list\n")
        .assert()
        .success()
        .stdout(contains("Galpao1"));
}

#[test]
fn commands_need_a_session_and_typos_get_suggestions() {
    let home = TempDir::new().unwrap();
    script_command(&home)
        .write_stdin("flock list\nflok\nadvise inventory\n")
        .assert()
        .success()
        .stdout(contains("login <email>"))
        .stdout(contains("Suggestion: `flock`?"))
        .stdout(contains("Advisory service").not());
}

#[test]
fn version_reports_where_records_live() {
    let home = TempDir::new().unwrap();
    script_command(&home)
        .write_stdin("login granja@example.com\nversion\n")
        .assert()
        .success()
        .stdout(contains("coop_core "))
        .stdout(contains("Records      : local file"))
        .stdout(contains("records.json"))
        .stdout(contains("Advisor      : not configured"))
        .stdout(contains("Session      : granja@example.com"));
}
