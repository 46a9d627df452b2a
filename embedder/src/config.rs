//! Build configuration stored in `nadm-build.toml`.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use crate::literal::Syntax;

/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "nadm-build.toml";

/// Build configuration (TOML).
///
/// Paths are relative to the directory `nadm-build` runs in. Missing fields
/// default to the repository layout.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BuildConfig {
    /// Script whose contents get embedded.
    pub source: PathBuf,

    /// Launcher files carrying the placeholder.
    pub targets: Vec<TargetConfig>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TargetConfig {
    pub path: PathBuf,
    pub syntax: Syntax,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("core.sh"),
            targets: vec![TargetConfig {
                path: PathBuf::from("launcher/src/embedded.rs"),
                syntax: Syntax::Rust,
            }],
        }
    }
}

impl BuildConfig {
    pub fn validate(&self) -> Result<()> {
        if self.source.as_os_str().is_empty() {
            return Err(anyhow!("source must be a non-empty path"));
        }
        if self.targets.is_empty() {
            return Err(anyhow!("targets must list at least one launcher"));
        }
        let mut seen = HashSet::new();
        for target in &self.targets {
            if target.path.as_os_str().is_empty() {
                return Err(anyhow!("target path must be non-empty"));
            }
            if !seen.insert(&target.path) {
                return Err(anyhow!("duplicate target {}", target.path.display()));
            }
            if target.path == self.source {
                return Err(anyhow!(
                    "target {} is also the source",
                    target.path.display()
                ));
            }
        }
        Ok(())
    }

    /// Apply command-line overrides; a `target` replaces the configured list.
    pub fn with_overrides(mut self, source: Option<PathBuf>, target: Option<TargetConfig>) -> Self {
        if let Some(source) = source {
            self.source = source;
        }
        if let Some(target) = target {
            self.targets = vec![target];
        }
        self
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `BuildConfig::default()`.
pub fn load_config(path: &Path) -> Result<BuildConfig> {
    if !path.exists() {
        let cfg = BuildConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: BuildConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, BuildConfig::default());
    }

    #[test]
    fn load_parses_targets() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(
            &path,
            r#"
source = "scripts/core.sh"

[[targets]]
path = "bin/nadm.js"
syntax = "js"

[[targets]]
path = "launcher/src/embedded.rs"
syntax = "rust"
"#,
        )
        .expect("write config");

        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.source, PathBuf::from("scripts/core.sh"));
        assert_eq!(cfg.targets.len(), 2);
        assert_eq!(cfg.targets[0].syntax, Syntax::Js);
        assert_eq!(cfg.targets[1].path, PathBuf::from("launcher/src/embedded.rs"));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: BuildConfig = toml::from_str("source = \"other.sh\"\n").expect("parse");
        assert_eq!(cfg.source, PathBuf::from("other.sh"));
        assert_eq!(cfg.targets, BuildConfig::default().targets);
    }

    #[test]
    fn unknown_syntax_is_rejected() {
        let err = toml::from_str::<BuildConfig>(
            "[[targets]]\npath = \"bin/nadm.py\"\nsyntax = \"python\"\n",
        );
        assert!(err.is_err());
    }

    #[test]
    fn validate_rejects_duplicates_and_empty() {
        let mut cfg = BuildConfig::default();
        cfg.targets.push(cfg.targets[0].clone());
        assert!(cfg.validate().is_err());

        let cfg = BuildConfig {
            targets: Vec::new(),
            ..BuildConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn overrides_replace_targets() {
        let cfg = BuildConfig::default().with_overrides(
            Some(PathBuf::from("alt.sh")),
            Some(TargetConfig {
                path: PathBuf::from("bin/nadm.js"),
                syntax: Syntax::Js,
            }),
        );
        assert_eq!(cfg.source, PathBuf::from("alt.sh"));
        assert_eq!(cfg.targets.len(), 1);
        assert_eq!(cfg.targets[0].syntax, Syntax::Js);
    }
}
