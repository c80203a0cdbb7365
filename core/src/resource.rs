//! Binds each REST collection to its path and DTO types.

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::Serialize;
use validator::Validate;

use crate::types::{
    CreatePlaceDto, CreateUnitDto, CreateUserDto, Place, Unit, UpdatePlaceDto, UpdateUnitDto,
    UpdateUserDto, User,
};

/// One REST resource collection rooted at `/{PATH}`.
///
/// Payload types carry a `Validate` bound so screens can check them before
/// submitting; the services themselves never call it.
pub trait Resource: Send + Sync + 'static {
    const PATH: &'static str;
    /// Singular display name, used in messages.
    const NAME: &'static str;

    type Record: DeserializeOwned + Debug + Clone + Send;
    type Create: Serialize + Validate + Debug + Sync;
    type Update: Serialize + Validate + Debug + Sync;
}

pub struct Users;
pub struct Units;
pub struct Places;

impl Resource for Users {
    const PATH: &'static str = "users";
    const NAME: &'static str = "user";
    type Record = User;
    type Create = CreateUserDto;
    type Update = UpdateUserDto;
}

impl Resource for Units {
    const PATH: &'static str = "units";
    const NAME: &'static str = "unit";
    type Record = Unit;
    type Create = CreateUnitDto;
    type Update = UpdateUnitDto;
}

impl Resource for Places {
    const PATH: &'static str = "places";
    const NAME: &'static str = "place";
    type Record = Place;
    type Create = CreatePlaceDto;
    type Update = UpdatePlaceDto;
}
