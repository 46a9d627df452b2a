//! Script body baked in by `nadm-build embed`.
//!
//! Checked in unbuilt: `CORE_SH` holds the bare placeholder until the build
//! step rewrites it, and the launcher then reads `core.sh` from disk instead.

/// Embedded `core.sh`, or the unsubstituted placeholder.
pub const CORE_SH: &str = "{{CORE_SH}}";

/// The unsubstituted placeholder, split so the build step never matches it.
pub const UNBUILT: &str = concat!("{{", "CORE_SH}}");
