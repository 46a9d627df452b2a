//! Script body resolution.
//!
//! Providers are tried in order and the first one that yields a body wins:
//! the literal compiled into the binary, then `core.sh` beside the install,
//! then `core.sh` in the source checkout the binary was built from.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::{debug, instrument, warn};

use crate::embedded;

/// Environment variable overriding the on-disk script location.
pub const CORE_PATH_VAR: &str = "NADM_CORE_PATH";

/// `core.sh` at the root of the workspace this binary was compiled in.
pub const CHECKOUT_CORE_SH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../core.sh");

/// Source of a script body.
pub trait ScriptProvider {
    /// Short label used in diagnostics.
    fn name(&self) -> &str;

    /// Load the script body.
    ///
    /// Returns `Ok(None)` when this provider has nothing to offer, so the
    /// next provider should be tried.
    fn load(&self) -> Result<Option<String>>;
}

/// Script literal compiled into the binary.
#[derive(Debug, Clone, Copy)]
pub struct Embedded {
    body: &'static str,
}

impl Embedded {
    pub fn new(body: &'static str) -> Self {
        Self { body }
    }

    /// The literal baked into this build.
    pub fn compiled() -> Self {
        Self::new(embedded::CORE_SH)
    }
}

impl ScriptProvider for Embedded {
    fn name(&self) -> &str {
        "embedded"
    }

    fn load(&self) -> Result<Option<String>> {
        if self.body == embedded::UNBUILT {
            return Ok(None);
        }
        Ok(Some(self.body.to_string()))
    }
}

/// `core.sh` read from disk, used by unbuilt binaries.
#[derive(Debug, Clone)]
pub struct FallbackFile {
    name: &'static str,
    path: PathBuf,
}

impl FallbackFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            name: "fallback",
            path: path.into(),
        }
    }

    /// The workspace `core.sh`, for binaries run from `target/`.
    pub fn checkout() -> Self {
        Self {
            name: "checkout",
            path: PathBuf::from(CHECKOUT_CORE_SH),
        }
    }
}

impl ScriptProvider for FallbackFile {
    fn name(&self) -> &str {
        self.name
    }

    fn load(&self) -> Result<Option<String>> {
        let body = fs::read_to_string(&self.path)
            .with_context(|| format!("read {}", self.path.display()))?;
        Ok(Some(body))
    }
}

/// A script body together with the provider that supplied it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedScript {
    pub provider: String,
    pub body: String,
}

/// Try each provider in order and return the first body found.
///
/// Provider errors are logged and the search continues; if nothing yields a
/// body, the last error (if any) is returned as a load failure.
#[instrument(skip_all, fields(providers = providers.len()))]
pub fn resolve(providers: &[Box<dyn ScriptProvider + '_>]) -> Result<ResolvedScript> {
    let mut last_err = None;
    for provider in providers {
        match provider.load() {
            Ok(Some(body)) => {
                debug!(provider = provider.name(), bytes = body.len(), "script resolved");
                return Ok(ResolvedScript {
                    provider: provider.name().to_string(),
                    body,
                });
            }
            Ok(None) => debug!(provider = provider.name(), "provider has no script"),
            Err(err) => {
                debug!(provider = provider.name(), err = %format!("{err:#}"), "provider failed");
                last_err = Some(err);
            }
        }
    }
    Err(match last_err {
        Some(err) => err.context("could not load core.sh"),
        None => anyhow!("could not load core.sh: no provider has a script"),
    })
}

/// Providers for this process, honouring `NADM_CORE_PATH`.
pub fn default_providers() -> Vec<Box<dyn ScriptProvider>> {
    let exe = match std::env::current_exe() {
        Ok(exe) => Some(exe),
        Err(err) => {
            warn!(err = %err, "cannot locate current executable");
            None
        }
    };
    providers_for(std::env::var_os(CORE_PATH_VAR).map(PathBuf::from), exe)
}

/// Embedded literal first, then `core.sh` on disk.
///
/// An override path replaces every disk location. Otherwise the file beside
/// the install is tried before the checkout copy.
pub fn providers_for(
    override_path: Option<PathBuf>,
    exe: Option<PathBuf>,
) -> Vec<Box<dyn ScriptProvider>> {
    let mut providers: Vec<Box<dyn ScriptProvider>> = vec![Box::new(Embedded::compiled())];
    if let Some(path) = override_path {
        providers.push(Box::new(FallbackFile::new(path)));
        return providers;
    }
    if let Some(exe) = exe {
        providers.push(Box::new(FallbackFile::new(fallback_path(&exe))));
    }
    providers.push(Box::new(FallbackFile::checkout()));
    providers
}

/// `<exe dir>/../core.sh`, mirroring the `bin/` + `core.sh` package layout.
pub fn fallback_path(exe: &Path) -> PathBuf {
    let exe_dir = exe.parent().unwrap_or_else(|| Path::new("."));
    exe_dir.join("..").join("core.sh")
}
