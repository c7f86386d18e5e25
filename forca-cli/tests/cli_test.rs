use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

/// The binary with service settings taken from the config file only
fn forca() -> Command {
    let mut cmd = Command::cargo_bin("forca").unwrap();
    cmd.env_remove("FORCA_SUPABASE_URL")
        .env_remove("FORCA_SUPABASE_ANON_KEY")
        .env_remove("FORCA_API_URL")
        .env_remove("FORCA_CONFIG")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_help_command() {
    let mut cmd = forca();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Terminal client for the FORCA training app"))
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("questionnaire"))
        .stdout(predicate::str::contains("dashboard"));
}

#[test]
fn test_version_command() {
    let mut cmd = forca();
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_completions_command() {
    let mut cmd = forca();
    cmd.arg("completions").arg("bash");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("_forca"));
}

#[test]
fn test_config_path_and_init() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("config.toml");

    forca()
        .arg("--config")
        .arg(&file)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(file.to_string_lossy().to_string()));

    forca()
        .arg("--config")
        .arg(&file)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration initialized"));

    let contents = std::fs::read_to_string(&file).unwrap();
    assert!(contents.contains("[backend]"));
    assert!(contents.contains("gerar-plano"));

    forca()
        .arg("--config")
        .arg(&file)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_whoami_when_logged_out() {
    let dir = tempdir().unwrap();

    forca()
        .arg("--config")
        .arg(dir.path().join("config.toml"))
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("You are not logged in."));
}

#[test]
fn test_history_needs_service_settings() {
    let dir = tempdir().unwrap();

    forca()
        .arg("--config")
        .arg(dir.path().join("config.toml"))
        .arg("history")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not configured"));
}

#[test]
fn test_invalid_status_is_rejected() {
    forca()
        .args(["history", "--status", "bogus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown session status"));
}

#[test]
fn test_sleep_log_validates_before_connecting() {
    let dir = tempdir().unwrap();

    forca()
        .arg("--config")
        .arg(dir.path().join("config.toml"))
        .args(["sleep", "log", "--deep=-1", "--rem", "2", "--light", "4"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Sleep hours must be zero or more"))
        .stderr(predicate::str::contains("Error:").not());
}

#[test]
fn test_errors_are_printed_once() {
    let dir = tempdir().unwrap();

    forca()
        .arg("--config")
        .arg(dir.path().join("config.toml"))
        .args(["sleep", "show", "--from", "2024-03-14", "--to", "2024-03-10"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("--to must not be before --from").count(1))
        .stderr(predicate::str::contains("--to must not be before --from").not());

    // errors that were not shown inline still reach stderr
    forca()
        .arg("--config")
        .arg(dir.path().join("config.toml"))
        .args(["sleep", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_stats_set_needs_a_value() {
    let dir = tempdir().unwrap();

    forca()
        .arg("--config")
        .arg(dir.path().join("config.toml"))
        .args(["stats", "set"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Nothing to update"));
}

#[test]
fn test_connection_diagnostic_without_settings() {
    let dir = tempdir().unwrap();

    forca()
        .arg("--config")
        .arg(dir.path().join("config.toml"))
        .args(["settings", "connection"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Service URL and public key are missing"));
}

#[test]
fn test_dashboard_needs_a_terminal() {
    let dir = tempdir().unwrap();

    forca()
        .arg("--config")
        .arg(dir.path().join("config.toml"))
        .arg("dashboard")
        .assert()
        .failure()
        .stderr(predicate::str::contains("needs an interactive terminal"));
}
