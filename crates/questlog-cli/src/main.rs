//! # QuestLog
//!
//! Command-line entry point for QuestLog RPG, a gamified personal task
//! tracker.
//!
//! This binary ties together:
//! - Config: focus rotation and reward catalog
//! - Store: the JSON save file
//! - Progression: leveling, streaks, records, daily challenges

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod config;
mod session;
mod store;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use questlog_progression::ProgressionEngine;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::AppConfig;
use crate::session::{ExportFormat, Session};
use crate::store::SaveStore;

/// Gamified personal task tracker.
#[derive(Debug, Parser)]
#[command(name = "questlog", version, about)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Save file (overrides the config)
    #[arg(long, global = true)]
    save: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Add a new quest
    Add {
        /// Quest name
        name: String,
        /// Quest category
        #[arg(short, long)]
        category: String,
        /// XP reward (10-500)
        #[arg(short, long, default_value_t = 50)]
        xp: u32,
    },
    /// List open quests
    List,
    /// Complete a quest by ID or ID prefix
    Complete {
        /// Quest ID or unique prefix
        id: String,
    },
    /// Show daily challenges
    Challenges {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Show level, gold, streak and records
    Stats,
    /// List leisure rewards
    Rewards,
    /// Spend gold on a leisure reward
    Redeem {
        /// Reward name
        name: String,
    },
    /// Export player data
    Export {
        /// Output format
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// Output file (defaults to stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replace the player with a JSON export
    Import {
        /// JSON export file
        file: PathBuf,
    },
    /// Print the weekly insights request, or read a response
    Insights {
        /// Service response file to read coaching text from
        #[arg(long)]
        response: Option<PathBuf>,
    },
    /// Write the current configuration to the config file
    InitConfig {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Main entry point.
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new("questlog=warn"))?,
        )
        .init();

    let cli = Cli::parse();
    debug!("QuestLog {}", env!("CARGO_PKG_VERSION"));

    let config_path = cli.config.clone().unwrap_or_else(AppConfig::config_path);
    let config = AppConfig::load_from(&config_path);

    if let Command::InitConfig { force } = cli.command {
        if config_path.exists() && !force {
            bail!(
                "Config file {} already exists (use --force to overwrite)",
                config_path.display()
            );
        }
        config
            .save_to(&config_path)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
        println!("Wrote config to {}", config_path.display());
        return Ok(());
    }

    let save_path = cli.save.clone().unwrap_or_else(|| config.resolved_save_path());
    let store = SaveStore::new(save_path);

    let save = store
        .load()
        .with_context(|| format!("Failed to load save from {}", store.path().display()))?;
    let engine = ProgressionEngine::new(config.focus_categories.clone());
    let now = Local::now().naive_local();
    let mut session = Session::new(save, engine, config.rewards.clone(), now);

    let output = run(&mut session, cli.command)?;
    if !output.is_empty() {
        print!("{output}");
        if !output.ends_with('\n') {
            println!();
        }
    }

    if session.is_dirty() {
        store
            .save(session.save())
            .with_context(|| format!("Failed to write save to {}", store.path().display()))?;
        info!("Saved progress to {}", store.path().display());
    }

    Ok(())
}

fn run(session: &mut Session, command: Command) -> Result<String> {
    match command {
        Command::Add { name, category, xp } => session.add_quest(&name, &category, xp),
        Command::List => Ok(session.list_quests()),
        Command::Complete { id } => session.complete_quest(&id),
        Command::Challenges { date } => Ok(session.challenges(date)),
        Command::Stats => Ok(session.stats()),
        Command::Rewards => Ok(session.rewards()),
        Command::Redeem { name } => session.redeem(&name),
        Command::Export { format, out } => {
            let document = session.export(format)?;
            match out {
                Some(path) => {
                    fs::write(&path, document)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    Ok(format!("Exported to {}", path.display()))
                },
                None => Ok(document),
            }
        },
        Command::Import { file } => {
            let json = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            session.import(&json)
        },
        Command::Insights { response } => match response {
            Some(path) => {
                let body = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                Session::read_insights(&body)
            },
            None => session.insights_request(),
        },
        Command::InitConfig { .. } => bail!("init-config is handled before the save is loaded"),
    }
}
