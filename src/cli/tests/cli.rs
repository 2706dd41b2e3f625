use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;

fn pipeline_lens() -> Command {
    let mut cmd = Command::cargo_bin("pipeline-lens").unwrap();
    cmd.env_remove("PIPELINE_LENS_NAME");
    cmd
}

#[test]
fn help_lists_flags() {
    pipeline_lens()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("--name"))
        .stdout(contains("--run"))
        .stdout(contains("--execution-id"))
        .stdout(contains("--no-follow"));
}

#[test]
fn version_is_printed() {
    pipeline_lens()
        .arg("--version")
        .assert()
        .success()
        .stdout(contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn name_is_required() {
    pipeline_lens()
        .assert()
        .failure()
        .code(2)
        .stderr(contains("--name"));
}

#[test]
fn run_and_execution_id_conflict() {
    pipeline_lens()
        .args(["--name", "api", "--run", "--execution-id", "exec-1"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("cannot be used with"));
}

#[test]
fn missing_config_file_is_a_tool_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");

    pipeline_lens()
        .args(["--name", "api", "--config"])
        .arg(&missing)
        .assert()
        .failure()
        .code(2)
        .stderr(contains("[ERROR]").and(contains("absent.toml")));
}

#[test]
fn piped_output_has_no_color_codes() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");

    pipeline_lens()
        .env_remove("NO_COLOR")
        .env_remove("CLICOLOR_FORCE")
        .args(["--name", "api", "--config"])
        .arg(&missing)
        .assert()
        .failure()
        .stderr(contains("[ERROR]").and(contains("\u{1b}[").not()));
}
