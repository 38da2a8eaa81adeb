use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("mindmood")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("logout"))
        .stdout(predicate::str::contains("whoami"))
        .stdout(predicate::str::contains("reset-password"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_login_help_shows_flags() {
    cargo_bin_cmd!("mindmood")
        .args(["login", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--email"))
        .stdout(predicate::str::contains("--password"))
        .stdout(predicate::str::contains("--sign-up"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("mindmood")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mindmood"));
}

#[test]
fn test_unknown_subcommand_fails() {
    cargo_bin_cmd!("mindmood")
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}
