use serde::{Deserialize, Serialize};
use validator::Validate;

use super::EntityId;
use crate::validation::validate_required;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    pub id: EntityId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreatePlaceDto {
    #[validate(custom(function = "validate_required"))]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct UpdatePlaceDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_required"))]
    pub name: Option<String>,
}

impl UpdatePlaceDto {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
    }
}
