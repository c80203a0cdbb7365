//! Plain-text and JSON output for records.

use clap::ValueEnum;
use fleet_core::{EntityId, Place, Unit, User};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// How a record shows up in a table row and in a detail view.
pub trait Render: Serialize {
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> EntityId;
    fn cells(&self) -> Vec<String>;
    fn fields(&self) -> Vec<(&'static str, String)>;
}

impl Render for User {
    const COLUMNS: &'static [&'static str] = &["ID", "NAME", "EMAIL", "ROLE"];

    fn id(&self) -> EntityId {
        self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.email.clone(),
            self.role.to_string(),
        ]
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("id", self.id.to_string()),
            ("name", self.name.clone()),
            ("email", self.email.clone()),
            ("role", self.role.to_string()),
        ]
    }
}

impl Render for Unit {
    const COLUMNS: &'static [&'static str] =
        &["ID", "PLATE", "BRAND", "MODEL", "TYPE", "MILEAGE", "FUEL", "STATUS"];

    fn id(&self) -> EntityId {
        self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.license_plate.clone(),
            self.brand.clone(),
            self.model.clone(),
            self.kind.clone(),
            self.current_mileage.to_string(),
            optional(self.fuel_level),
            self.status.to_string(),
        ]
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("id", self.id.to_string()),
            ("brand", self.brand.clone()),
            ("model", self.model.clone()),
            ("type", self.kind.clone()),
            ("color", self.color.clone()),
            ("license plate", self.license_plate.clone()),
            ("mileage", self.current_mileage.to_string()),
            ("fuel level", optional(self.fuel_level)),
            (
                "last maintenance",
                optional(self.last_maintenance_date.map(|d| d.format("%Y-%m-%d"))),
            ),
            (
                "maintenance mileage",
                optional(self.last_maintenance_mileage),
            ),
            ("status", self.status.to_string()),
        ]
    }
}

impl Render for Place {
    const COLUMNS: &'static [&'static str] = &["ID", "NAME"];

    fn id(&self) -> EntityId {
        self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![self.id.to_string(), self.name.clone()]
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![("id", self.id.to_string()), ("name", self.name.clone())]
    }
}

fn optional<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// Left-aligned columns separated by two spaces.
pub fn table<T: Render>(items: &[T]) -> String {
    let rows: Vec<Vec<String>> = items.iter().map(Render::cells).collect();
    let mut widths: Vec<usize> = T::COLUMNS.iter().map(|c| c.len()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header = T::COLUMNS.iter().map(|c| c.to_string()).collect::<Vec<_>>();
    std::iter::once(header)
        .chain(rows)
        .map(|row| {
            row.iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One `label: value` line per field, labels padded to the same width.
pub fn detail<T: Render>(item: &T) -> String {
    let fields = item.fields();
    let width = fields.iter().map(|(label, _)| label.len()).max().unwrap_or(0) + 1;
    fields
        .iter()
        .map(|(label, value)| format!("{:<width$} {value}", format!("{label}:")))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}
