//! `kiractl` top-level help/usage output.

use crate::prelude::*;

#[test]
fn no_args_shows_usage_and_fails() {
    cli().fails().stderr_has("Usage:");
}

#[test]
fn help_flag_shows_usage() {
    cli().args(&["--help"]).passes().stdout_has("Usage:");
}

#[test]
fn task_help_lists_subcommands() {
    cli().args(&["task", "--help"]).passes().stdout_has("create").stdout_has("delete").stdout_has("list");
}

#[test]
fn backup_help_lists_subcommands() {
    cli().args(&["backup", "--help"]).passes().stdout_has("create").stdout_has("restore");
}
