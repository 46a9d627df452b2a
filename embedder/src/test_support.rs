//! Test-only fixtures: launcher templates and scratch build directories.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tempfile::TempDir;

use crate::config::{BuildConfig, TargetConfig};
use crate::literal::Syntax;

/// Unbuilt JavaScript launcher.
pub const JS_TEMPLATE: &str = r#"#!/usr/bin/env node
const { spawnSync } = require('child_process');
const { readFileSync } = require('fs');
const { join } = require('path');

let script;
try {
    script = '{{CORE_SH}}';
    if (script === '{{' + 'CORE_SH}}') {
        script = readFileSync(join(__dirname, '..', 'core.sh'), 'utf8');
    }
} catch (e) {
    console.error('Error: Could not load core.sh');
    process.exit(1);
}

const result = spawnSync('bash', ['-c', script + '\nmain'], {
    stdio: 'inherit',
    env: { ...process.env, NADM_ARGS: process.argv.slice(2).join(' ') }
});

process.exit(result.status || 0);
"#;

/// Unbuilt Rust launcher module.
pub const RUST_TEMPLATE: &str = r#"/// Embedded `core.sh`, or the unsubstituted placeholder.
pub const CORE_SH: &str = "{{CORE_SH}}";

pub const UNBUILT: &str = concat!("{{", "CORE_SH}}");
"#;

/// A scratch package directory with `core.sh` and launcher targets.
pub struct BuildDir {
    temp: TempDir,
}

impl BuildDir {
    pub fn new() -> Result<Self> {
        let temp = tempfile::tempdir().context("create tempdir")?;
        Ok(Self { temp })
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Write `contents` to `rel`, creating parent directories.
    pub fn write(&self, rel: &str, contents: &str) -> Result<PathBuf> {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }

    pub fn read(&self, rel: &str) -> Result<String> {
        let path = self.path().join(rel);
        fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))
    }

    /// `core.sh` plus unbuilt `bin/nadm.js` and `src/embedded.rs`.
    pub fn with_launchers(core_sh: &str) -> Result<Self> {
        let dir = Self::new()?;
        dir.write("core.sh", core_sh)?;
        dir.write("bin/nadm.js", JS_TEMPLATE)?;
        dir.write("src/embedded.rs", RUST_TEMPLATE)?;
        Ok(dir)
    }

    /// Config embedding `core.sh` into both launchers.
    pub fn config(&self) -> BuildConfig {
        BuildConfig {
            source: PathBuf::from("core.sh"),
            targets: vec![
                TargetConfig {
                    path: PathBuf::from("bin/nadm.js"),
                    syntax: Syntax::Js,
                },
                TargetConfig {
                    path: PathBuf::from("src/embedded.rs"),
                    syntax: Syntax::Rust,
                },
            ],
        }
    }
}

/// Hex SHA-256 of a file's contents.
pub fn file_sha256(path: &Path) -> Result<String> {
    let contents = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let mut hasher = Sha256::new();
    hasher.update(contents);
    let digest = hasher.finalize();
    Ok(hex::encode(digest))
}
