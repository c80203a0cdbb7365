//! `fleet`: terminal client for the fleet service.
//!
//! Lists, shows, creates, edits and deletes users, units and places.
//! Input is validated locally before anything is sent.

mod commands;
mod config;
mod logging;
mod render;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use fleet_core::{CancellationToken, FleetApi};
use tracing::{debug, info};

use commands::places::PlaceCommand;
use commands::units::UnitCommand;
use commands::users::UserCommand;
use render::OutputFormat;

/// Fleet service CLI.
#[derive(Parser, Debug)]
#[command(name = "fleet", version, about = "Manage users, units and places")]
struct Cli {
    /// Service address; overrides the configuration file and FLEET__API__BASE_URL.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Configuration file (default: ./fleet.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, short = 'o', global = true, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage users.
    Users {
        #[command(subcommand)]
        action: UserCommand,
    },

    /// Manage units (vehicles).
    Units {
        #[command(subcommand)]
        action: UnitCommand,
    },

    /// Manage places.
    Places {
        #[command(subcommand)]
        action: PlaceCommand,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config =
        config::Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(base_url) = cli.base_url {
        config = config.with_base_url(base_url).context("invalid --base-url")?;
    }
    logging::init_logging(&config.logging);
    debug!(base_url = %config.api.base_url, "configuration loaded");

    let api = FleetApi::from_config(&config.api)?;

    let token = CancellationToken::new();
    let interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupted");
            interrupt.cancel();
        }
    });

    let format = cli.output;
    let run = async {
        match cli.command {
            Commands::Users { action } => commands::users::run(&api.users, action, format).await,
            Commands::Units { action } => commands::units::run(&api.units, action, format).await,
            Commands::Places { action } => {
                commands::places::run(&api.places, action, format).await
            }
        }
    };

    tokio::select! {
        result = run => result,
        _ = token.cancelled() => anyhow::bail!("cancelled"),
    }
}
