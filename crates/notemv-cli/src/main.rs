//! notemv CLI: move notes with inline commands and keep file names in step
//! with headings.
//!
//! Commands: exec, watch, migrate, sanitize, completions

use std::future;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::Level;

use notemv_core::config::{CollisionCheck, Config};
use notemv_core::sanitize::sanitize_file_name;
use notemv_vault::{
    CollectingNotifier, FsVault, NoteStore, Notifier, OpenNote, TracingNotifier, VaultEvent,
    VaultWatcher,
};
use notemv_sync::{migrate_folder, CommandDispatcher, Dispatch, SyncDecision, TitleSynchronizer};

#[derive(Parser)]
#[command(name = "notemv")]
#[command(version)]
#[command(about = "Move markdown notes with inline commands and keep names in sync with headings")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Vault root directory
    #[arg(long, global = true, default_value = ".")]
    vault: PathBuf,

    /// How a move detects an existing destination (overrides config)
    #[arg(long, global = true, value_enum)]
    collision: Option<CollisionArg>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log only errors (stdout is reserved for results)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the command written on one line of a note
    Exec {
        /// Vault-relative path of the note
        #[arg(long)]
        file: String,
        /// Line holding the command (1-based)
        #[arg(long, default_value_t = 1)]
        line: usize,
    },
    /// Rename notes whenever their first-line heading changes
    Watch {
        /// Stop after this many seconds instead of running until Ctrl-C
        #[arg(long)]
        for_secs: Option<u64>,
    },
    /// Move every note from one folder into another
    Migrate {
        /// Source folder (defaults to the configured one)
        #[arg(long)]
        from: Option<String>,
        /// Target folder (defaults to the configured one)
        #[arg(long)]
        to: Option<String>,
    },
    /// Print a name with path-hostile characters replaced
    Sanitize {
        name: String,
    },
    /// Generate shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CollisionArg {
    LinkResolution,
    LiteralPath,
}

impl From<CollisionArg> for CollisionCheck {
    fn from(arg: CollisionArg) -> Self {
        match arg {
            CollisionArg::LinkResolution => CollisionCheck::LinkResolution,
            CollisionArg::LiteralPath => CollisionCheck::LiteralPath,
        }
    }
}

#[derive(Serialize)]
struct ExecOutput {
    file: String,
    #[serde(flatten)]
    dispatch: Dispatch,
    notices: Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Sanitize { name } => {
            println!("{}", sanitize_file_name(&name));
            Ok(())
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "notemv", &mut io::stdout());
            Ok(())
        }
        Commands::Exec { file, line } => {
            let (vault, config) = open_vault(&cli.vault, cli.collision)?;
            exec(&vault, &config, &file, line).await
        }
        Commands::Watch { for_secs } => {
            let (vault, config) = open_vault(&cli.vault, cli.collision)?;
            watch(&vault, &config, for_secs.map(Duration::from_secs)).await
        }
        Commands::Migrate { from, to } => {
            let (vault, config) = open_vault(&cli.vault, cli.collision)?;
            let from = from.unwrap_or(config.migration.from);
            let to = to.unwrap_or(config.migration.to);
            let report = migrate_folder(&vault, &from, &to, &TracingNotifier).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.failed.is_empty() {
                bail!("{}", report.summary());
            }
            Ok(())
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        Level::DEBUG
    } else if quiet {
        Level::ERROR
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn open_vault(root: &Path, collision: Option<CollisionArg>) -> Result<(FsVault, Config)> {
    let vault = FsVault::open(root)
        .with_context(|| format!("Cannot open vault at {}", root.display()))?;
    let mut config = Config::load(vault.root()).context("Cannot load vault config")?;
    if let Some(collision) = collision {
        config.collision = collision.into();
    }
    tracing::debug!(root = %vault.root().display(), ?config, "vault opened");
    Ok((vault, config))
}

/// Open `file` in a scratch editor with the cursor on `line`, process that
/// line, and save the editor back to wherever the note ended up.
async fn exec(vault: &FsVault, config: &Config, file: &str, line: usize) -> Result<()> {
    let content = vault
        .read_file(file)
        .await
        .with_context(|| format!("Cannot read {file}"))?;
    let mut workspace = OpenNote::open(file, &content);
    workspace
        .buffer_mut()
        .set_cursor_line(line.saturating_sub(1));

    let notifier = CollectingNotifier::new();
    let dispatch = CommandDispatcher::new(vault, &mut workspace, &notifier)
        .with_collision(config.collision)
        .process_current_line()
        .await;

    let final_path = workspace.path().unwrap_or(file).to_string();
    if workspace.buffer().is_modified() {
        vault
            .write_file(&final_path, &workspace.buffer().text())
            .await
            .with_context(|| format!("Cannot save {final_path}"))?;
    }

    let failed = matches!(dispatch, Dispatch::Failed { .. });
    let output = ExecOutput {
        file: final_path,
        dispatch,
        notices: notifier.messages(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    if failed {
        bail!("{}", output.notices.last().cloned().unwrap_or_default());
    }
    Ok(())
}

/// Feed filesystem changes to the title synchronizer until interrupted.
async fn watch(vault: &FsVault, config: &Config, limit: Option<Duration>) -> Result<()> {
    let mut watcher = VaultWatcher::start(vault.root())?;
    let mut sync = TitleSynchronizer::from_config(config);
    let notifier = TracingNotifier;
    let deadline = limit.map(|limit| tokio::time::Instant::now() + limit);
    tracing::info!(root = %vault.root().display(), "watching");

    loop {
        let event = tokio::select! {
            event = watcher.recv() => event,
            _ = until(deadline) => break,
            _ = tokio::signal::ctrl_c() => break,
        };
        let Some(event) = event else {
            break;
        };
        let VaultEvent::Changed(path) = event else {
            continue;
        };

        match sync.on_file_change(vault, &path).await {
            Ok(decision @ SyncDecision::Renamed { .. }) => {
                println!("{}", serde_json::to_string(&decision)?);
            }
            Ok(decision) => tracing::debug!(%path, ?decision, "no rename"),
            Err(notemv_core::NotemvError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                // Already moved by the time the event arrived.
                tracing::debug!(%path, "note is gone");
            }
            Err(e) => notifier.notify(&format!("Failed to rename file: {e}")),
        }
    }

    tracing::info!("watch stopped");
    Ok(())
}

async fn until(deadline: Option<tokio::time::Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => future::pending().await,
    }
}
