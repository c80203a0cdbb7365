use anyhow::Result;
use clap::Subcommand;
use fleet_core::{CreateUserDto, EntityId, Role, UpdateUserDto, UserService};

use super::ensure_changes;
use crate::render::OutputFormat;

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// List all users.
    List,

    /// Show one user.
    Get { id: EntityId },

    /// Create a user.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// At least 6 characters.
        #[arg(long)]
        password: String,
        /// ADMIN or DRIVER (case-insensitive).
        #[arg(long, default_value_t = Role::Driver)]
        role: Role,
    },

    /// Change some fields of a user. Omitted fields keep their value.
    Update {
        id: EntityId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Omit to keep the current password.
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        role: Option<Role>,
    },

    /// Delete a user.
    Delete {
        id: EntityId,
        /// Skip confirmation.
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },
}

pub async fn run(service: &UserService, command: UserCommand, format: OutputFormat) -> Result<()> {
    match command {
        UserCommand::List => super::list(service, format).await,
        UserCommand::Get { id } => super::get(service, id, format).await,
        UserCommand::Create {
            name,
            email,
            password,
            role,
        } => {
            let input = CreateUserDto {
                name,
                email,
                password,
                role,
            };
            super::create(service, &input, format).await
        }
        UserCommand::Update {
            id,
            name,
            email,
            password,
            role,
        } => {
            let input = UpdateUserDto {
                name,
                email,
                password,
                role,
            };
            ensure_changes(input.is_empty())?;
            super::update(service, id, &input, format).await
        }
        UserCommand::Delete { id, yes } => super::delete(service, id, yes).await,
    }
}
