use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Args, Subcommand};
use fleet_core::{CreateUnitDto, EntityId, UnitService, UnitStatus, UpdateUnitDto};

use super::ensure_changes;
use crate::render::OutputFormat;

#[derive(Subcommand, Debug)]
pub enum UnitCommand {
    /// List all units.
    List,

    /// Show one unit.
    Get { id: EntityId },

    /// Register a unit.
    Create(CreateUnitArgs),

    /// Change some fields of a unit. Omitted fields keep their value.
    Update {
        id: EntityId,
        #[command(flatten)]
        fields: UpdateUnitArgs,
    },

    /// Delete a unit.
    Delete {
        id: EntityId,
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },
}

#[derive(Args, Debug)]
pub struct CreateUnitArgs {
    #[arg(long)]
    pub brand: String,
    #[arg(long)]
    pub model: String,
    /// Vehicle type, e.g. Truck or Van.
    #[arg(long = "type")]
    pub kind: String,
    #[arg(long)]
    pub color: String,
    #[arg(long)]
    pub license_plate: String,
    #[arg(long, allow_negative_numbers = true)]
    pub mileage: i64,
    #[arg(long, allow_negative_numbers = true)]
    pub fuel_level: Option<f64>,
    /// YYYY-MM-DD or an RFC 3339 timestamp.
    #[arg(long, value_parser = parse_date)]
    pub last_maintenance_date: Option<DateTime<Utc>>,
    #[arg(long, allow_negative_numbers = true)]
    pub last_maintenance_mileage: Option<i64>,
    /// AVAILABLE, ASSIGNED, MAINTENANCE or DECOMMISSIONED (case-insensitive).
    #[arg(long, default_value_t = UnitStatus::Available)]
    pub status: UnitStatus,
}

#[derive(Args, Debug)]
pub struct UpdateUnitArgs {
    #[arg(long)]
    pub brand: Option<String>,
    #[arg(long)]
    pub model: Option<String>,
    #[arg(long = "type")]
    pub kind: Option<String>,
    #[arg(long)]
    pub color: Option<String>,
    #[arg(long)]
    pub license_plate: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    pub mileage: Option<i64>,
    #[arg(long, allow_negative_numbers = true)]
    pub fuel_level: Option<f64>,
    #[arg(long, value_parser = parse_date)]
    pub last_maintenance_date: Option<DateTime<Utc>>,
    #[arg(long, allow_negative_numbers = true)]
    pub last_maintenance_mileage: Option<i64>,
    #[arg(long)]
    pub status: Option<UnitStatus>,
}

impl From<CreateUnitArgs> for CreateUnitDto {
    fn from(args: CreateUnitArgs) -> Self {
        Self {
            brand: args.brand,
            model: args.model,
            kind: args.kind,
            color: args.color,
            license_plate: args.license_plate,
            current_mileage: args.mileage,
            last_maintenance_date: args.last_maintenance_date,
            last_maintenance_mileage: args.last_maintenance_mileage,
            fuel_level: args.fuel_level,
            status: args.status,
        }
    }
}

impl From<UpdateUnitArgs> for UpdateUnitDto {
    fn from(args: UpdateUnitArgs) -> Self {
        Self {
            brand: args.brand,
            model: args.model,
            kind: args.kind,
            color: args.color,
            license_plate: args.license_plate,
            current_mileage: args.mileage,
            last_maintenance_date: args.last_maintenance_date,
            last_maintenance_mileage: args.last_maintenance_mileage,
            fuel_level: args.fuel_level,
            status: args.status,
        }
    }
}

/// Accept a calendar date (taken as midnight UTC) or a full timestamp.
pub fn parse_date(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| format!("'{value}' is not a date (YYYY-MM-DD) or RFC 3339 timestamp"))
}

pub async fn run(service: &UnitService, command: UnitCommand, format: OutputFormat) -> Result<()> {
    match command {
        UnitCommand::List => super::list(service, format).await,
        UnitCommand::Get { id } => super::get(service, id, format).await,
        UnitCommand::Create(args) => {
            super::create(service, &CreateUnitDto::from(args), format).await
        }
        UnitCommand::Update { id, fields } => {
            let input = UpdateUnitDto::from(fields);
            ensure_changes(input.is_empty())?;
            super::update(service, id, &input, format).await
        }
        UnitCommand::Delete { id, yes } => super::delete(service, id, yes).await,
    }
}
