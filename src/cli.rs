// CLI module - command-line argument parsing and handlers
//
// Subcommands:
// - run <deck>: Paginate a deck file in the terminal
// - config --show: Display effective configuration
// - config --reset: Regenerate config file with defaults
// - config --edit: Open config file in $EDITOR
// - config --path: Show config file path

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use reaction_pager::config::{Config, VERSION};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Reaction-driven pagination for chat messages
#[derive(Parser)]
#[command(name = "reaction-pager")]
#[command(version = VERSION)]
#[command(about = "Reaction-driven pagination for chat messages", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Paginate a deck file in the terminal
    Run {
        /// Deck file (TOML, or JSON with a .json extension)
        deck: PathBuf,

        /// Viewer identity (defaults to PAGER_VIEWER, then $USER)
        #[arg(long)]
        viewer: Option<String>,

        /// Wrap around at the first and last page
        #[arg(long)]
        circular: bool,

        /// Idle timeout in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// 1-based page to start on (overrides the deck)
        #[arg(long)]
        start: Option<usize>,
    },

    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Open config file in $EDITOR
        #[arg(long)]
        edit: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

pub fn handle_config(show: bool, reset: bool, edit: bool, path: bool) {
    if path {
        handle_config_path();
    } else if show {
        handle_config_show();
    } else if reset {
        handle_config_reset();
    } else if edit {
        handle_config_edit();
    } else {
        // No flag provided, show help
        println!("Usage: reaction-pager config [--show|--reset|--edit|--path]");
        println!();
        println!("Options:");
        println!("  --show    Display effective configuration");
        println!("  --reset   Reset config file to defaults");
        println!("  --edit    Open config file in $EDITOR");
        println!("  --path    Show config file path");
    }
}

fn config_path_or_exit() -> PathBuf {
    match Config::config_path() {
        Some(path) => path,
        None => {
            eprintln!("Error: Could not determine config path");
            std::process::exit(1);
        }
    }
}

fn handle_config_path() {
    println!("{}", config_path_or_exit().display());
}

fn handle_config_show() {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    println!("# Effective configuration (env > file > defaults)");
    if let Some(viewer) = &config.viewer {
        println!("# viewer = {:?} (PAGER_VIEWER)", viewer);
    }
    println!();
    print!("{}", config.to_toml());

    // Show source info
    println!();
    let path = config_path_or_exit();
    if path.exists() {
        println!("# Source: {}", path.display());
    } else {
        println!("# Source: defaults (no config file)");
    }
}

fn handle_config_reset() {
    let path = config_path_or_exit();

    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        let _ = std::io::stderr().flush();

        let mut input = String::new();
        if std::io::stdin().read_line(&mut input).is_err() || !is_yes(&input) {
            println!("Aborted.");
            return;
        }
    }

    match write_default_config(&path) {
        Ok(()) => println!("Config reset to defaults: {}", path.display()),
        Err(e) => exit_with(e),
    }
}

fn handle_config_edit() {
    let path = config_path_or_exit();

    if !path.exists() {
        if let Err(e) = write_default_config(&path) {
            exit_with(e);
        }
        println!("Created new config file: {}", path.display());
    }

    let editor = pick_editor(|key| std::env::var(key).ok());
    println!("Opening {} with {}", path.display(), editor);

    let status = Command::new(&editor)
        .arg(&path)
        .status()
        .with_context(|| format!("Failed to launch editor '{}' (set $EDITOR)", editor));
    match status {
        Ok(s) if s.success() => {}
        Ok(s) => exit_with(anyhow!("Editor exited with status: {}", s)),
        Err(e) => exit_with(e),
    }
}

fn exit_with(err: anyhow::Error) -> ! {
    eprintln!("Error: {:#}", err);
    std::process::exit(1);
}

/// Only an explicit "y" confirms an overwrite
fn is_yes(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case("y")
}

/// Write the default template, creating the config directory
fn write_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create {}", parent.display()))?;
    }
    std::fs::write(path, Config::default().to_toml())
        .with_context(|| format!("Cannot write {}", path.display()))
}

/// $EDITOR, then $VISUAL, then a platform default
fn pick_editor(env: impl Fn(&str) -> Option<String>) -> String {
    env("EDITOR")
        .or_else(|| env("VISUAL"))
        .filter(|editor| !editor.trim().is_empty())
        .unwrap_or_else(|| {
            if cfg!(windows) {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        })
}
