//! CLI tests for the `nadm` launcher.
//!
//! Spawns the launcher binary against a `core.sh` supplied through
//! `NADM_CORE_PATH` (or the workspace copy) and verifies argument forwarding
//! and exit codes. The checked-in launcher is unbuilt, so an on-disk script is
//! always used.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use nadm::exit_codes;
use nadm::process::ARGS_VAR;
use nadm::script::{CHECKOUT_CORE_SH, CORE_PATH_VAR};

fn write_core(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("core.sh");
    fs::write(&path, body).expect("write core.sh");
    path
}

fn nadm(core: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_nadm"))
        .env(CORE_PATH_VAR, core)
        .env_remove(ARGS_VAR)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("run nadm")
}

#[test]
fn forwards_joined_args_and_exit_code() {
    let temp = tempfile::tempdir().expect("tempdir");
    let core = write_core(
        temp.path(),
        "main() {\n  printf '%s\\n' \"$NADM_ARGS\"\n  exit 7\n}\n",
    );

    let output = nadm(&core, &["install", "rip grep", "--dry-run"]);

    assert_eq!(output.status.code(), Some(7));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "install rip grep --dry-run\n"
    );
}

#[test]
fn no_args_sets_empty_variable() {
    let temp = tempfile::tempdir().expect("tempdir");
    let core = write_core(
        temp.path(),
        "main() {\n  [ \"${NADM_ARGS+set}\" = set ] && [ -z \"$NADM_ARGS\" ]\n}\n",
    );

    let output = nadm(&core, &[]);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
}

#[test]
fn inherits_ambient_environment() {
    let temp = tempfile::tempdir().expect("tempdir");
    let core = write_core(temp.path(), "main() { printf '%s' \"$NADM_TEST_MARKER\"; }\n");

    let output = Command::new(env!("CARGO_BIN_EXE_nadm"))
        .env(CORE_PATH_VAR, &core)
        .env("NADM_TEST_MARKER", "kept")
        .output()
        .expect("run nadm");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "kept");
}

#[test]
fn signalled_script_exits_ok() {
    let temp = tempfile::tempdir().expect("tempdir");
    let core = write_core(temp.path(), "main() { kill -KILL $$; }\n");

    let output = nadm(&core, &[]);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
}

#[test]
fn missing_script_fails_without_spawning() {
    let temp = tempfile::tempdir().expect("tempdir");
    let missing = temp.path().join("core.sh");

    let output = nadm(&missing, &["anything"]);

    assert_eq!(output.status.code(), Some(exit_codes::FAILURE));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("could not load core.sh"), "stderr: {stderr}");
    assert_eq!(stderr.lines().count(), 1, "stderr: {stderr}");
}

#[test]
fn unbuilt_binary_runs_workspace_core_sh() {
    let output = Command::new(env!("CARGO_BIN_EXE_nadm"))
        .env_remove(CORE_PATH_VAR)
        .env_remove("RUST_LOG")
        .arg("help")
        .output()
        .expect("run nadm");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(exit_codes::OK), "stderr: {stderr}");
    assert!(fs::read_to_string(CHECKOUT_CORE_SH)
        .expect("read workspace core.sh")
        .contains("usage: nadm"));
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("usage: nadm"));
}
