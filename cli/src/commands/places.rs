use anyhow::Result;
use clap::Subcommand;
use fleet_core::{CreatePlaceDto, EntityId, PlaceService, UpdatePlaceDto};

use super::ensure_changes;
use crate::render::OutputFormat;

#[derive(Subcommand, Debug)]
pub enum PlaceCommand {
    /// List all places.
    List,
    /// Show one place.
    Get { id: EntityId },
    /// Create a place.
    Create {
        #[arg(long)]
        name: String,
    },
    /// Rename a place.
    Update {
        id: EntityId,
        #[arg(long)]
        name: Option<String>,
    },
    /// Delete a place.
    Delete {
        id: EntityId,
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },
}

pub async fn run(service: &PlaceService, command: PlaceCommand, format: OutputFormat) -> Result<()> {
    match command {
        PlaceCommand::List => super::list(service, format).await,
        PlaceCommand::Get { id } => super::get(service, id, format).await,
        PlaceCommand::Create { name } => {
            super::create(service, &CreatePlaceDto { name }, format).await
        }
        PlaceCommand::Update { id, name } => {
            let input = UpdatePlaceDto { name };
            ensure_changes(input.is_empty())?;
            super::update(service, id, &input, format).await
        }
        PlaceCommand::Delete { id, yes } => super::delete(service, id, yes).await,
    }
}
