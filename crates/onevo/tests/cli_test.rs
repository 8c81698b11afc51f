//! Black-box tests for the `onevo` binary surface.
//!
//! These exercise argument parsing and help output only; nothing here
//! talks to a network.

#![allow(clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn onevo() -> Command {
    let mut cmd = Command::cargo_bin("onevo").unwrap();
    // Keep host config/env out of the picture.
    cmd.env_remove("ONEVO_PROFILE")
        .env_remove("ONEVO_TOKEN")
        .env_remove("ONEVO_API_URL");
    cmd
}

#[test]
fn no_args_shows_help() {
    onevo()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn help_lists_top_level_commands() {
    onevo()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("clients"))
        .stdout(predicate::str::contains("billing"))
        .stdout(predicate::str::contains("webhooks"))
        .stdout(predicate::str::contains("posts"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn clients_help_lists_subcommands() {
    onevo()
        .args(["clients", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("update"))
        .stdout(predicate::str::contains("delete"))
        .stdout(predicate::str::contains("select"));
}

#[test]
fn billing_help_lists_subcommands() {
    onevo()
        .args(["billing", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("plans"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("checkout"))
        .stdout(predicate::str::contains("set-accounts"))
        .stdout(predicate::str::contains("payment-methods"));
}

#[test]
fn webhook_create_requires_platform_and_url() {
    onevo()
        .args(["webhooks", "create"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--platform"));
}

#[test]
fn client_select_id_conflicts_with_clear() {
    onevo()
        .args(["clients", "select", "c-1", "--clear"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn version_flag_works() {
    onevo()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("onevo"));
}

#[test]
fn completions_emit_to_stdout() {
    onevo()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("onevo"));
}

#[test]
fn unknown_command_fails_with_usage() {
    onevo()
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn invalid_output_format_is_rejected() {
    onevo()
        .args(["--output", "xml", "clients", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
