//! In-memory stand-in for the fleet REST service.
//!
//! Serves `/users`, `/units` and `/places` with the same status codes and
//! error body shape as the real service: 201 on create, 204 on delete,
//! `{"statusCode","message","error"}` on failure with validation messages
//! as an array of strings.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

pub type Id = i64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Driver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitStatus {
    Available,
    Assigned,
    Maintenance,
    Decommissioned,
}

/// Stored user row. Only `UserView` ever leaves the server.
#[derive(Clone, Debug)]
struct UserRow {
    id: Id,
    name: String,
    email: String,
    password: String,
    role: Role,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserView {
    pub id: Id,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&UserRow> for UserView {
    fn from(row: &UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name.clone(),
            email: row.email.clone(),
            role: row.role,
        }
    }
}

#[derive(Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: Id,
    pub brand: String,
    pub model: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub color: String,
    pub license_plate: String,
    pub current_mileage: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_maintenance_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_maintenance_mileage: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_level: Option<f64>,
    pub status: UnitStatus,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUnit {
    pub brand: String,
    pub model: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub color: String,
    pub license_plate: String,
    pub current_mileage: i64,
    pub last_maintenance_date: Option<DateTime<Utc>>,
    pub last_maintenance_mileage: Option<i64>,
    pub fuel_level: Option<f64>,
    pub status: UnitStatus,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUnit {
    pub brand: Option<String>,
    pub model: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub color: Option<String>,
    pub license_plate: Option<String>,
    pub current_mileage: Option<i64>,
    pub last_maintenance_date: Option<DateTime<Utc>>,
    pub last_maintenance_mileage: Option<i64>,
    pub fuel_level: Option<f64>,
    pub status: Option<UnitStatus>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Place {
    pub id: Id,
    pub name: String,
}

#[derive(Deserialize)]
pub struct CreatePlace {
    pub name: String,
}

#[derive(Deserialize)]
pub struct UpdatePlace {
    pub name: Option<String>,
}

/// Rows keyed by id, ids handed out from 1 and never reused.
#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<Id, T>,
    next_id: Id,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T> Table<T> {
    fn insert_with(&mut self, build: impl FnOnce(Id) -> T) -> &T {
        let id = self.next_id;
        self.next_id += 1;
        self.rows.entry(id).or_insert(build(id))
    }
}

#[derive(Default)]
pub struct Store {
    users: Table<UserRow>,
    units: Table<Unit>,
    places: Table<Place>,
}

pub type Db = Arc<RwLock<Store>>;

/// Error body in the service's format.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    status_code: u16,
    message: serde_json::Value,
    error: &'static str,
}

#[derive(Debug)]
pub enum Failure {
    NotFound(String),
    Invalid(Vec<String>),
    Conflict(String),
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Failure::NotFound(msg) => (StatusCode::NOT_FOUND, serde_json::Value::from(msg)),
            Failure::Invalid(msgs) => (StatusCode::BAD_REQUEST, serde_json::Value::from(msgs)),
            Failure::Conflict(msg) => (StatusCode::CONFLICT, serde_json::Value::from(msg)),
        };
        let body = ErrorBody {
            status_code: status.as_u16(),
            message,
            error: status.canonical_reason().unwrap_or("Error"),
        };
        (status, Json(body)).into_response()
    }
}

fn not_found(entity: &str, id: Id) -> Failure {
    Failure::NotFound(format!("{entity} with ID {id} not found"))
}

/// Collects server-side validation messages.
#[derive(Default)]
struct Rules(Vec<String>);

impl Rules {
    fn not_empty(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if value.is_some_and(|v| v.trim().is_empty()) {
            self.0.push(format!("{field} should not be empty"));
        }
        self
    }

    fn email(&mut self, value: Option<&str>) -> &mut Self {
        if let Some(v) = value {
            let valid = v
                .split_once('@')
                .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
            if !valid {
                self.0.push("email must be an email".to_string());
            }
        }
        self
    }

    fn min_len(&mut self, field: &str, value: Option<&str>, min: usize) -> &mut Self {
        if value.is_some_and(|v| v.chars().count() < min) {
            self.0.push(format!(
                "{field} must be longer than or equal to {min} characters"
            ));
        }
        self
    }

    fn non_negative(&mut self, field: &str, value: Option<f64>) -> &mut Self {
        if value.is_some_and(|v| v < 0.0) {
            self.0.push(format!("{field} must not be less than 0"));
        }
        self
    }

    fn finish(&mut self) -> Result<(), Failure> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(Failure::Invalid(std::mem::take(&mut self.0)))
        }
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user).put(update_user).delete(delete_user))
        .route("/units", get(list_units).post(create_unit))
        .route("/units/{id}", get(get_unit).put(update_unit).delete(delete_unit))
        .route("/places", get(list_places).post(create_place))
        .route("/places/{id}", get(get_place).put(update_place).delete(delete_place))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock fleet service listening");
    }
    axum::serve(listener, app()).await
}

// --- users ---

async fn list_users(State(db): State<Db>) -> Json<Vec<UserView>> {
    let store = db.read().await;
    Json(store.users.rows.values().map(UserView::from).collect())
}

async fn get_user(State(db): State<Db>, Path(id): Path<Id>) -> Result<Json<UserView>, Failure> {
    let store = db.read().await;
    let row = store.users.rows.get(&id).ok_or_else(|| not_found("User", id))?;
    Ok(Json(row.into()))
}

async fn create_user(
    State(db): State<Db>,
    Json(input): Json<CreateUser>,
) -> Result<(StatusCode, Json<UserView>), Failure> {
    Rules::default()
        .not_empty("name", Some(input.name.as_str()))
        .email(Some(input.email.as_str()))
        .min_len("password", Some(input.password.as_str()), 6)
        .finish()?;

    let mut store = db.write().await;
    if store.users.rows.values().any(|u| u.email == input.email) {
        return Err(Failure::Conflict("Email already in use".to_string()));
    }
    let row = store.users.insert_with(|id| UserRow {
        id,
        name: input.name,
        email: input.email,
        password: input.password,
        role: input.role,
    });
    info!(id = row.id, "user created");
    Ok((StatusCode::CREATED, Json(row.into())))
}

async fn update_user(
    State(db): State<Db>,
    Path(id): Path<Id>,
    Json(input): Json<UpdateUser>,
) -> Result<Json<UserView>, Failure> {
    Rules::default()
        .not_empty("name", input.name.as_deref())
        .email(input.email.as_deref())
        .min_len("password", input.password.as_deref(), 6)
        .finish()?;

    let mut store = db.write().await;
    if let Some(email) = &input.email {
        if store.users.rows.values().any(|u| u.id != id && &u.email == email) {
            return Err(Failure::Conflict("Email already in use".to_string()));
        }
    }
    let row = store.users.rows.get_mut(&id).ok_or_else(|| not_found("User", id))?;
    if let Some(name) = input.name {
        row.name = name;
    }
    if let Some(email) = input.email {
        row.email = email;
    }
    if let Some(password) = input.password {
        row.password = password;
    }
    if let Some(role) = input.role {
        row.role = role;
    }
    Ok(Json(UserView::from(&*row)))
}

async fn delete_user(State(db): State<Db>, Path(id): Path<Id>) -> Result<StatusCode, Failure> {
    let mut store = db.write().await;
    store
        .users
        .rows
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| not_found("User", id))
}

// --- units ---

async fn list_units(State(db): State<Db>) -> Json<Vec<Unit>> {
    let store = db.read().await;
    Json(store.units.rows.values().cloned().collect())
}

async fn get_unit(State(db): State<Db>, Path(id): Path<Id>) -> Result<Json<Unit>, Failure> {
    let store = db.read().await;
    store
        .units
        .rows
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found("Unit", id))
}

async fn create_unit(
    State(db): State<Db>,
    Json(input): Json<CreateUnit>,
) -> Result<(StatusCode, Json<Unit>), Failure> {
    Rules::default()
        .not_empty("brand", Some(input.brand.as_str()))
        .not_empty("model", Some(input.model.as_str()))
        .not_empty("licensePlate", Some(input.license_plate.as_str()))
        .non_negative("currentMileage", Some(input.current_mileage as f64))
        .non_negative("fuelLevel", input.fuel_level)
        .finish()?;

    let mut store = db.write().await;
    let unit = store
        .units
        .insert_with(|id| Unit {
            id,
            brand: input.brand,
            model: input.model,
            kind: input.kind,
            color: input.color,
            license_plate: input.license_plate,
            current_mileage: input.current_mileage,
            last_maintenance_date: input.last_maintenance_date,
            last_maintenance_mileage: input.last_maintenance_mileage,
            fuel_level: input.fuel_level,
            status: input.status,
        })
        .clone();
    info!(id = unit.id, "unit created");
    Ok((StatusCode::CREATED, Json(unit)))
}

async fn update_unit(
    State(db): State<Db>,
    Path(id): Path<Id>,
    Json(input): Json<UpdateUnit>,
) -> Result<Json<Unit>, Failure> {
    Rules::default()
        .not_empty("brand", input.brand.as_deref())
        .not_empty("model", input.model.as_deref())
        .not_empty("licensePlate", input.license_plate.as_deref())
        .non_negative("currentMileage", input.current_mileage.map(|m| m as f64))
        .non_negative("fuelLevel", input.fuel_level)
        .finish()?;

    let mut store = db.write().await;
    let unit = store.units.rows.get_mut(&id).ok_or_else(|| not_found("Unit", id))?;
    if let Some(brand) = input.brand {
        unit.brand = brand;
    }
    if let Some(model) = input.model {
        unit.model = model;
    }
    if let Some(kind) = input.kind {
        unit.kind = kind;
    }
    if let Some(color) = input.color {
        unit.color = color;
    }
    if let Some(plate) = input.license_plate {
        unit.license_plate = plate;
    }
    if let Some(mileage) = input.current_mileage {
        unit.current_mileage = mileage;
    }
    if input.last_maintenance_date.is_some() {
        unit.last_maintenance_date = input.last_maintenance_date;
    }
    if input.last_maintenance_mileage.is_some() {
        unit.last_maintenance_mileage = input.last_maintenance_mileage;
    }
    if input.fuel_level.is_some() {
        unit.fuel_level = input.fuel_level;
    }
    if let Some(status) = input.status {
        unit.status = status;
    }
    Ok(Json(unit.clone()))
}

async fn delete_unit(State(db): State<Db>, Path(id): Path<Id>) -> Result<StatusCode, Failure> {
    let mut store = db.write().await;
    store
        .units
        .rows
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| not_found("Unit", id))
}

// --- places ---

async fn list_places(State(db): State<Db>) -> Json<Vec<Place>> {
    let store = db.read().await;
    Json(store.places.rows.values().cloned().collect())
}

async fn get_place(State(db): State<Db>, Path(id): Path<Id>) -> Result<Json<Place>, Failure> {
    let store = db.read().await;
    store
        .places
        .rows
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found("Place", id))
}

async fn create_place(
    State(db): State<Db>,
    Json(input): Json<CreatePlace>,
) -> Result<(StatusCode, Json<Place>), Failure> {
    Rules::default().not_empty("name", Some(input.name.as_str())).finish()?;

    let mut store = db.write().await;
    let place = store
        .places
        .insert_with(|id| Place {
            id,
            name: input.name,
        })
        .clone();
    Ok((StatusCode::CREATED, Json(place)))
}

async fn update_place(
    State(db): State<Db>,
    Path(id): Path<Id>,
    Json(input): Json<UpdatePlace>,
) -> Result<Json<Place>, Failure> {
    Rules::default().not_empty("name", input.name.as_deref()).finish()?;

    let mut store = db.write().await;
    let place = store.places.rows.get_mut(&id).ok_or_else(|| not_found("Place", id))?;
    if let Some(name) = input.name {
        place.name = name;
    }
    Ok(Json(place.clone()))
}

async fn delete_place(State(db): State<Db>, Path(id): Path<Id>) -> Result<StatusCode, Failure> {
    let mut store = db.write().await;
    store
        .places
        .rows
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| not_found("Place", id))
}
