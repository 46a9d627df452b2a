//! Reading, rewriting and inspecting launcher files on disk.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{debug, info, instrument, warn};

use crate::config::BuildConfig;
use crate::literal::Syntax;
use crate::template::{embed, placeholder_count};

/// Whether a launcher still needs the build step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    /// Placeholder present; the launcher reads `core.sh` from disk.
    Unbuilt,
    /// Placeholder replaced by the embedded script.
    Built,
}

impl fmt::Display for TargetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbuilt => f.write_str("unbuilt"),
            Self::Built => f.write_str("built"),
        }
    }
}

/// Embed `source_path` into the single launcher at `target_path`.
#[instrument(skip_all, fields(source = %source_path.display(), target = %target_path.display(), %syntax))]
pub fn embed_file(source_path: &Path, target_path: &Path, syntax: Syntax) -> Result<()> {
    let source = read_source(source_path)?;
    let rendered = render(&source, target_path, syntax)?;
    write_atomic(target_path, &rendered)?;
    info!("script embedded");
    Ok(())
}

/// Embed the configured source into every configured target under `root`.
///
/// Every target is read and rendered before the first write, so a missing
/// placeholder in any of them leaves all of them untouched.
#[instrument(skip_all, fields(root = %root.display(), targets = config.targets.len()))]
pub fn embed_all(root: &Path, config: &BuildConfig) -> Result<Vec<PathBuf>> {
    let source = read_source(&root.join(&config.source))?;

    let mut rendered = Vec::with_capacity(config.targets.len());
    for target in &config.targets {
        let path = root.join(&target.path);
        let contents = render(&source, &path, target.syntax)?;
        rendered.push((path, contents));
    }

    let mut written = Vec::with_capacity(rendered.len());
    for (path, contents) in rendered {
        write_atomic(&path, &contents)?;
        debug!(target = %path.display(), "target written");
        written.push(path);
    }
    info!(count = written.len(), "script embedded");
    Ok(written)
}

/// Classify a launcher by its placeholder count.
pub fn check_file(path: &Path, syntax: Syntax) -> Result<TargetState> {
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    match placeholder_count(&contents, syntax)? {
        0 => Ok(TargetState::Built),
        1 => Ok(TargetState::Unbuilt),
        count => bail!(
            "{} has {count} placeholders, expected at most one",
            path.display()
        ),
    }
}

/// State of every configured target under `root`.
pub fn check_all(root: &Path, config: &BuildConfig) -> Result<Vec<(PathBuf, TargetState)>> {
    config
        .targets
        .iter()
        .map(|target| {
            let state = check_file(&root.join(&target.path), target.syntax)?;
            Ok((target.path.clone(), state))
        })
        .collect()
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read source {}", path.display()))
}

fn render(source: &str, target_path: &Path, syntax: Syntax) -> Result<String> {
    let template = fs::read_to_string(target_path)
        .with_context(|| format!("read target {}", target_path.display()))?;
    embed(source, &template, syntax)
        .with_context(|| format!("embed into {}", target_path.display()))
}

/// Replace `path` through a sibling temp file so readers never see half a file.
///
/// Permissions of the existing file (the executable bit on `bin/nadm.js`)
/// carry over to the replacement.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let file_name = path
        .file_name()
        .with_context(|| format!("target path missing file name {}", path.display()))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    if let Err(err) = replace_via(&tmp_path, path, contents) {
        if let Err(cleanup) = fs::remove_file(&tmp_path)
            && cleanup.kind() != std::io::ErrorKind::NotFound
        {
            warn!(tmp = %tmp_path.display(), err = %cleanup, "failed to remove temp file");
        }
        return Err(err);
    }
    Ok(())
}

fn replace_via(tmp_path: &Path, path: &Path, contents: &str) -> Result<()> {
    fs::write(tmp_path, contents)
        .with_context(|| format!("write temp file {}", tmp_path.display()))?;
    if let Ok(meta) = fs::metadata(path) {
        fs::set_permissions(tmp_path, meta.permissions())
            .with_context(|| format!("copy permissions to {}", tmp_path.display()))?;
    }
    fs::rename(tmp_path, path).with_context(|| format!("replace {}", path.display()))
}
