//! Typed client for the fleet service: users, units (vehicles) and places.
//!
//! # Overview
//! `ApiClient` turns typed input into `HttpRequest` values and parses
//! `HttpResponse` values without touching the network. A `Transport` runs
//! the round-trip; `HttpTransport` does it over `reqwest`. `EntityService`
//! glues the two into five async CRUD operations per resource, and
//! `FleetApi` bundles the three services over one shared transport.
//!
//! # Design
//! - Services map one typed call to one HTTP request: no retries, no
//!   batching, no local validation, no caching.
//! - Validation (`validation`) and per-view state (`screen`) belong to the
//!   caller and run before a service is invoked.
//! - Failures carry the HTTP status when the service answered and the
//!   service's `message` when it sent one.

pub mod client;
pub mod error;
pub mod http;
pub mod resource;
pub mod screen;
pub mod service;
pub mod transport;
pub mod types;
pub mod validation;

pub use client::ApiClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use resource::{Places, Resource, Units, Users};
pub use screen::{FormScreen, ListScreen, LoadOutcome, LoadTicket, SubmitError};
pub use service::{cancellable, EntityService, FleetApi, PlaceService, UnitService, UserService};
pub use transport::{ApiConfig, HttpTransport, Transport, DEFAULT_BASE_URL};
pub use types::{
    CreatePlaceDto, CreateUnitDto, CreateUserDto, EntityId, Place, Role, Unit, UnitStatus,
    UpdatePlaceDto, UpdateUnitDto, UpdateUserDto, User,
};

pub use tokio_util::sync::CancellationToken;
pub use validator::{Validate, ValidationErrors};
