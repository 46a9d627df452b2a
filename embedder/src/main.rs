//! `nadm-build`: embed `core.sh` into the launcher sources.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use nadm::{exit_codes, logging};
use nadm_build::config::{BuildConfig, DEFAULT_CONFIG_FILE, TargetConfig, load_config};
use nadm_build::literal::Syntax;
use nadm_build::target::{check_all, embed_all};

#[derive(Parser)]
#[command(
    name = "nadm-build",
    version,
    about = "Embed core.sh into the nadm launchers"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replace the placeholder in each launcher with the escaped script.
    Embed {
        /// Build config (defaults apply if the file is missing).
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
        /// Script to embed, overriding the config.
        #[arg(long)]
        source: Option<PathBuf>,
        /// Single launcher to embed into, replacing the configured targets.
        #[arg(long)]
        target: Option<PathBuf>,
        /// Literal syntax of `--target`; inferred from its extension if omitted.
        #[arg(long, value_enum, requires = "target")]
        syntax: Option<Syntax>,
    },
    /// Report whether each launcher is built or still carries the placeholder.
    Check {
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
    },
}

fn main() {
    logging::init();
    if let Err(err) = run() {
        eprintln!("Build failed: {:#}", err);
        std::process::exit(exit_codes::FAILURE);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let root = std::env::current_dir()?;
    match cli.command {
        Command::Embed {
            config,
            source,
            target,
            syntax,
        } => {
            let target = match target {
                Some(path) => {
                    let syntax = match syntax {
                        Some(syntax) => syntax,
                        None => Syntax::for_path(&path)?,
                    };
                    Some(TargetConfig { path, syntax })
                }
                None => None,
            };
            let config = load_config(&config)?.with_overrides(source, target);
            config.validate()?;
            cmd_embed(&root, &config)
        }
        Command::Check { config } => cmd_check(&root, &load_config(&config)?),
    }
}

fn cmd_embed(root: &Path, config: &BuildConfig) -> Result<()> {
    embed_all(root, config)?;
    for target in &config.targets {
        println!(
            "Build complete: {} embedded into {}",
            config.source.display(),
            target.path.display()
        );
    }
    Ok(())
}

fn cmd_check(root: &Path, config: &BuildConfig) -> Result<()> {
    for (path, state) in check_all(root, config)? {
        println!("{}: {}", path.display(), state);
    }
    Ok(())
}
