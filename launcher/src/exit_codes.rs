//! Stable exit codes for the nadm binaries.
//!
//! Any other code returned by `nadm` is the launched script's own status.

/// Command succeeded, or the script exited without reporting a status.
pub const OK: i32 = 0;
/// Script could not be loaded or spawned, or `nadm-build` failed.
pub const FAILURE: i32 = 1;
