//! Build step that bakes `core.sh` into the nadm launchers.
//!
//! - **[`literal`]**: Pure encoding of script text as a quoted literal for a
//!   given target [`literal::Syntax`], and its inverse.
//! - **[`template`]**: Pure placeholder substitution over launcher text.
//! - **[`target`]**: Filesystem side: read, render, atomically rewrite, check.
//! - **[`config`]**: `nadm-build.toml` loading and validation.

pub mod config;
pub mod literal;
pub mod target;
pub mod template;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
