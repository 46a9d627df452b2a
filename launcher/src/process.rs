//! Running the resolved script through the shell.
//!
//! The child shares the launcher's stdin, stdout and stderr; nothing is
//! captured or buffered here.

use std::ffi::OsStr;
use std::process::{Command, ExitStatus, Stdio};

use anyhow::{Context, Result};
use tracing::{debug, error, instrument};

use crate::exit_codes;

/// Interpreter used for the inline script.
pub const SHELL: &str = "bash";
/// Function the script must define; called after the body is loaded.
pub const ENTRY_POINT: &str = "main";
/// Environment variable carrying every launcher argument.
pub const ARGS_VAR: &str = "NADM_ARGS";

/// Join arguments with single spaces.
///
/// Arguments are not quoted, so one containing a space is indistinguishable
/// from two. `core.sh` parses `NADM_ARGS` itself and relies on this shape.
pub fn join_args<I, S>(args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    args.into_iter()
        .map(|arg| arg.as_ref().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Script body followed by the entry point call on its own line.
pub fn inline_program(body: &str) -> String {
    format!("{body}\n{ENTRY_POINT}")
}

/// `bash -c <body>\nmain` with `NADM_ARGS` layered over the inherited environment.
pub fn shell_command(body: &str, joined_args: &str) -> Command {
    let mut cmd = Command::new(SHELL);
    cmd.arg("-c")
        .arg(inline_program(body))
        .env(ARGS_VAR, joined_args);
    cmd
}

/// Spawn `cmd` with inherited stdio and block until it exits.
#[instrument(skip_all)]
pub fn run_inherited(mut cmd: Command) -> Result<ExitStatus> {
    cmd.stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    debug!("spawning child process");
    let mut child = match cmd.spawn() {
        Ok(c) => c,
        Err(e) => {
            error!(err = %e, "failed to spawn command");
            return Err(e).context(format!("spawn {SHELL}"));
        }
    };
    let status = child.wait().with_context(|| format!("wait for {SHELL}"))?;
    debug!(exit_code = ?status.code(), "command finished");
    Ok(status)
}

/// The child's exit code, or success when it reported none (killed by a signal).
pub fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(exit_codes::OK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    #[test]
    fn join_args_uses_single_spaces() {
        assert_eq!(join_args(["install", "rip grep", "--yes"]), "install rip grep --yes");
    }

    #[test]
    fn join_args_empty_is_empty_string() {
        assert_eq!(join_args(Vec::<OsString>::new()), "");
    }

    #[test]
    fn inline_program_appends_entry_point() {
        assert_eq!(inline_program("main() { :; }"), "main() { :; }\nmain");
    }

    #[test]
    fn shell_command_passes_program_and_args_var() {
        let cmd = shell_command("echo hi", "a b");
        assert_eq!(cmd.get_program(), OsStr::new(SHELL));
        let args: Vec<&OsStr> = cmd.get_args().collect();
        assert_eq!(args, vec![OsStr::new("-c"), OsStr::new("echo hi\nmain")]);
        let envs: Vec<(&OsStr, Option<&OsStr>)> = cmd.get_envs().collect();
        assert_eq!(envs, vec![(OsStr::new(ARGS_VAR), Some(OsStr::new("a b")))]);
    }

    #[cfg(unix)]
    #[test]
    fn exit_code_passes_through_status() {
        use std::os::unix::process::ExitStatusExt;
        assert_eq!(exit_code(ExitStatus::from_raw(3 << 8)), 3);
        assert_eq!(exit_code(ExitStatus::from_raw(0)), exit_codes::OK);
    }

    #[cfg(unix)]
    #[test]
    fn exit_code_defaults_to_ok_when_signalled() {
        use std::os::unix::process::ExitStatusExt;
        // Raw wait status 9: terminated by SIGKILL, no exit code.
        let status = ExitStatus::from_raw(9);
        assert_eq!(status.code(), None);
        assert_eq!(exit_code(status), exit_codes::OK);
    }

    #[cfg(unix)]
    #[test]
    fn run_inherited_reports_child_status() {
        let status = run_inherited(shell_command("main() { exit 4; }", "")).expect("run bash");
        assert_eq!(exit_code(status), 4);
    }
}
