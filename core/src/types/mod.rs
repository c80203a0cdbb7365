//! Wire DTOs for the three entity kinds.
//!
//! # Design
//! Records are what the service returns; `Create*Dto` is the record minus its
//! server-assigned `id`; `Update*Dto` makes every mutable field optional and
//! omits absent ones from the JSON body so the service keeps their current
//! value. Field names are camelCase on the wire. These types are defined
//! independently of the mock server; integration tests catch schema drift.

mod place;
mod unit;
mod user;

use std::fmt;

pub use place::{CreatePlaceDto, Place, UpdatePlaceDto};
pub use unit::{CreateUnitDto, Unit, UnitStatus, UpdateUnitDto};
pub use user::{CreateUserDto, Role, UpdateUserDto, User};

/// Server-assigned identity shared by every entity kind.
pub type EntityId = i64;

/// Returned by the `FromStr` impls of the enum attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static [&'static str],
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown {} '{}', expected one of: {}",
            self.kind,
            self.value,
            self.expected.join(", ")
        )
    }
}

impl std::error::Error for UnknownVariant {}
