use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{EntityId, UnknownVariant};
use crate::validation::{validate_fuel_level, validate_mileage, validate_required};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitStatus {
    #[default]
    Available,
    Assigned,
    Maintenance,
    Decommissioned,
}

impl UnitStatus {
    pub const ALL: [UnitStatus; 4] = [
        UnitStatus::Available,
        UnitStatus::Assigned,
        UnitStatus::Maintenance,
        UnitStatus::Decommissioned,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            UnitStatus::Available => "AVAILABLE",
            UnitStatus::Assigned => "ASSIGNED",
            UnitStatus::Maintenance => "MAINTENANCE",
            UnitStatus::Decommissioned => "DECOMMISSIONED",
        }
    }
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        UnitStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == upper)
            .ok_or_else(|| UnknownVariant {
                kind: "unit status",
                value: s.to_string(),
                expected: &["AVAILABLE", "ASSIGNED", "MAINTENANCE", "DECOMMISSIONED"],
            })
    }
}

/// A vehicle as returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: EntityId,
    pub brand: String,
    pub model: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub color: String,
    pub license_plate: String,
    pub current_mileage: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_maintenance_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_maintenance_mileage: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_level: Option<f64>,
    pub status: UnitStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUnitDto {
    #[validate(custom(function = "validate_required"))]
    pub brand: String,
    #[validate(custom(function = "validate_required"))]
    pub model: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub color: String,
    #[validate(custom(function = "validate_required"))]
    pub license_plate: String,
    #[validate(custom(function = "validate_mileage"))]
    pub current_mileage: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_maintenance_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_mileage"))]
    pub last_maintenance_mileage: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_fuel_level"))]
    pub fuel_level: Option<f64>,
    #[serde(default)]
    pub status: UnitStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUnitDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_required"))]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_required"))]
    pub model: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_required"))]
    pub license_plate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_mileage"))]
    pub current_mileage: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_maintenance_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_mileage"))]
    pub last_maintenance_mileage: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_fuel_level"))]
    pub fuel_level: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<UnitStatus>,
}

impl UpdateUnitDto {
    /// Update that only moves the unit to `status`.
    pub fn status(status: UnitStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
