//! Launcher for the `core.sh` package manager script.
//!
//! `nadm` resolves a script body ([`script`]), appends a call to its `main`
//! function and runs it under bash ([`process`]), relaying the exit status.
//! The body is normally compiled in ([`embedded`], written by `nadm-build`);
//! unbuilt development binaries read `core.sh` from disk instead.

pub mod embedded;
pub mod exit_codes;
pub mod logging;
pub mod process;
pub mod script;

use std::ffi::OsStr;

use anyhow::Result;
use tracing::info;

/// Run `core.sh` with `args` and return the exit code to terminate with.
///
/// Errors cover load and spawn failures only; a failing script is reported
/// through the returned code.
pub fn launch<I, S>(args: I) -> Result<i32>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let resolved = script::resolve(&script::default_providers())?;
    info!(provider = %resolved.provider, "launching core.sh");
    let cmd = process::shell_command(&resolved.body, &process::join_args(args));
    let status = process::run_inherited(cmd)?;
    Ok(process::exit_code(status))
}
