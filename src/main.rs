// reaction-pager - paginate a deck of pages in the terminal
//
// The library does the pagination; this binary wires it to the console:
// - Config: ~/.config/reaction-pager/config.toml plus PAGER_* env vars
// - Deck: TOML/JSON file with pages and an optional template
// - Console transport: prints the message, reads controls from stdin
// - Lifecycle events: logged through tracing as JSON payloads

mod cli;
mod console;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use console::ConsoleTransport;
use reaction_pager::config::Config;
use reaction_pager::deck::Deck;
use reaction_pager::{logging, ChannelId, Notifier, Paginator, SessionOutcome, UserId};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Options of the `run` subcommand
struct RunArgs {
    deck: PathBuf,
    viewer: Option<String>,
    circular: bool,
    timeout_secs: Option<u64>,
    start: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = match cli.command {
        Commands::Config {
            show,
            reset,
            edit,
            path,
        } => {
            cli::handle_config(show, reset, edit, path);
            return Ok(());
        }
        Commands::Run {
            deck,
            viewer,
            circular,
            timeout_secs,
            start,
        } => RunArgs {
            deck,
            viewer,
            circular,
            timeout_secs,
            start,
        },
    };

    let code = match run(args).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };
    // The stdin reader is a blocking read that would hold up runtime shutdown
    std::process::exit(code);
}

async fn run(args: RunArgs) -> Result<()> {
    // Create default config file on first run
    Config::ensure_config_exists();
    let mut config = Config::load()?;

    // CLI flags beat env and file
    if args.circular {
        config.circular = true;
    }
    if let Some(timeout) = args.timeout_secs {
        config.timeout_secs = timeout;
    }

    // Guard must live until exit so buffered file logs are flushed
    let _log_guard = logging::init(&config.logging);

    let deck = Deck::load(&args.deck)?;
    let controls = config
        .control_map()
        .context("Invalid [controls] configuration")?;

    let viewer = args
        .viewer
        .or_else(|| config.viewer.clone())
        .or_else(|| std::env::var("USER").ok())
        .unwrap_or_else(|| "console".to_string());
    let viewer = UserId::new(viewer);

    let mut options = config.session_options(Some(viewer.clone()), ChannelId::new("console"));
    if let Some(page) = args.start.or(deck.starting_page) {
        options.starting_page = page;
    }

    let transport = Arc::new(ConsoleTransport::new(viewer, controls.clone()));
    transport.spawn_input();

    let (notifier, mut lifecycle) = Notifier::channel();
    let mut paginator = Paginator::new(Arc::clone(&transport), deck.pages.clone(), options)
        .with_controls(controls)
        .with_notifier(notifier);
    if let Some(template) = deck.template() {
        paginator = paginator.with_template(template);
    }

    // Ctrl-C ends the session cleanly
    let destroy = paginator.destroy_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Ctrl-C received");
            destroy.destroy();
        }
    });

    let printer = tokio::spawn(async move {
        while let Some(event) = lifecycle.recv().await {
            match serde_json::to_string(&event) {
                Ok(json) => info!(event = %json, "Lifecycle event"),
                Err(e) => debug!("Unserializable lifecycle event {:?}: {}", event, e),
            }
        }
    });

    info!(deck = %args.deck.display(), pages = deck.pages.len(), "Starting session");
    let outcome = paginator.run().await.context("Pagination failed")?;

    // Dropping the paginator closes the lifecycle channel
    drop(paginator);
    let _ = printer.await;

    match outcome {
        SessionOutcome::Ended(reason) => {
            eprintln!("Session ended: {}", reason);
            Ok(())
        }
        SessionOutcome::Rejected(e) => {
            Err(e).with_context(|| format!("Deck {} rejected", args.deck.display()))
        }
    }
}
