//! CRUD behaviour against the live mock service over real HTTP.
//!
//! Each test starts its own mock server on a random port and talks to it
//! through `FleetApi::from_config`, i.e. the production `HttpTransport`.

use fleet_core::{
    ApiConfig, ApiError, CreatePlaceDto, CreateUnitDto, CreateUserDto, FleetApi, FormScreen,
    ListScreen, LoadOutcome, Role, SubmitError, UnitStatus, Units, UpdatePlaceDto, UpdateUnitDto,
    UpdateUserDto,
};

async fn start() -> FleetApi {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { mock_server::run(listener).await });
    FleetApi::from_config(&ApiConfig {
        base_url: format!("http://{addr}/"),
    })
    .unwrap()
}

fn ana() -> CreateUserDto {
    CreateUserDto {
        name: "Ana".to_string(),
        email: "ana@x.com".to_string(),
        password: "secret1".to_string(),
        role: Role::Driver,
    }
}

fn truck() -> CreateUnitDto {
    CreateUnitDto {
        brand: "Volvo".to_string(),
        model: "FH16".to_string(),
        kind: "Truck".to_string(),
        color: "White".to_string(),
        license_plate: "ABC-123".to_string(),
        current_mileage: 120_500,
        last_maintenance_date: None,
        last_maintenance_mileage: None,
        fuel_level: Some(62.5),
        status: UnitStatus::Available,
    }
}

#[tokio::test]
async fn user_create_then_get_round_trips() {
    let api = start().await;

    let created = api.users.create(&ana()).await.unwrap();
    assert_eq!(created.name, "Ana");
    assert_eq!(created.email, "ana@x.com");
    assert_eq!(created.role, Role::Driver);

    let fetched = api.users.get(created.id).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn user_partial_update_keeps_other_fields() {
    let api = start().await;
    let created = api.users.create(&ana()).await.unwrap();

    let updated = api
        .users
        .update(
            created.id,
            &UpdateUserDto {
                role: Some(Role::Admin),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.role, Role::Admin);

    let fetched = api.users.get(created.id).await.unwrap();
    assert_eq!(fetched.role, Role::Admin);
    assert_eq!(fetched.name, created.name);
    assert_eq!(fetched.email, created.email);
}

#[tokio::test]
async fn unit_create_then_get_matches_submitted_fields() {
    let api = start().await;
    let submitted = CreateUnitDto {
        last_maintenance_mileage: Some(118_000),
        ..truck()
    };

    let created = api.units.create(&submitted).await.unwrap();
    let fetched = api.units.get(created.id).await.unwrap();

    assert_eq!(fetched.brand, submitted.brand);
    assert_eq!(fetched.model, submitted.model);
    assert_eq!(fetched.kind, submitted.kind);
    assert_eq!(fetched.color, submitted.color);
    assert_eq!(fetched.license_plate, submitted.license_plate);
    assert_eq!(fetched.current_mileage, submitted.current_mileage);
    assert_eq!(fetched.last_maintenance_mileage, submitted.last_maintenance_mileage);
    assert_eq!(fetched.fuel_level, submitted.fuel_level);
    assert_eq!(fetched.status, submitted.status);
}

#[tokio::test]
async fn user_lifecycle_tracks_list_length() {
    let api = start().await;

    let before = api.users.list().await.unwrap().len();
    let created = api.users.create(&ana()).await.unwrap();
    assert_eq!(api.users.list().await.unwrap().len(), before + 1);

    api.users.delete(created.id).await.unwrap();
    assert_eq!(api.users.list().await.unwrap().len(), before);

    let err = api.users.get(created.id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn unit_lifecycle_tracks_list_length() {
    let api = start().await;

    let before = api.units.list().await.unwrap().len();
    let created = api.units.create(&truck()).await.unwrap();
    assert_eq!(api.units.list().await.unwrap().len(), before + 1);

    api.units.delete(created.id).await.unwrap();
    assert_eq!(api.units.list().await.unwrap().len(), before);

    let err = api.units.get(created.id).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn unit_status_update_changes_only_status() {
    let api = start().await;
    let created = api.units.create(&truck()).await.unwrap();
    assert_eq!(created.status, UnitStatus::Available);

    let updated = api
        .units
        .update(created.id, &UpdateUnitDto::status(UnitStatus::Maintenance))
        .await
        .unwrap();
    assert_eq!(updated.status, UnitStatus::Maintenance);

    let fetched = api.units.get(created.id).await.unwrap();
    let mut expected = created.clone();
    expected.status = UnitStatus::Maintenance;
    assert_eq!(fetched, expected);
}

#[tokio::test]
async fn place_lifecycle_tracks_list_length() {
    let api = start().await;

    let before = api.places.list().await.unwrap().len();
    let depot = api
        .places
        .create(&CreatePlaceDto {
            name: "Depot".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(api.places.list().await.unwrap().len(), before + 1);

    let renamed = api
        .places
        .update(
            depot.id,
            &UpdatePlaceDto {
                name: Some("Main depot".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Main depot");
    assert_eq!(api.places.get(depot.id).await.unwrap(), renamed);

    api.places.delete(depot.id).await.unwrap();
    assert_eq!(api.places.list().await.unwrap().len(), before);

    let err = api.places.get(depot.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }));
}

#[tokio::test]
async fn deleting_missing_user_is_a_client_error() {
    let api = start().await;
    let err = api.users.delete(999).await.unwrap_err();
    assert!(err.is_client_error());
    assert!(!err.is_network());
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.message(), Some("User with ID 999 not found"));
}

#[tokio::test]
async fn server_validation_message_is_surfaced() {
    let api = start().await;
    let err = api
        .places
        .create(&CreatePlaceDto {
            name: String::new(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(
        err.user_message("Could not create place"),
        "name should not be empty"
    );
}

#[tokio::test]
async fn duplicate_email_is_reported_with_message() {
    let api = start().await;
    api.users.create(&ana()).await.unwrap();
    let err = api.users.create(&ana()).await.unwrap_err();
    assert_eq!(err.status(), Some(409));
    assert_eq!(err.message(), Some("Email already in use"));
}

#[tokio::test]
async fn unreachable_service_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = FleetApi::from_config(&ApiConfig {
        base_url: format!("http://{addr}"),
    })
    .unwrap();
    let err = api.users.list().await.unwrap_err();
    assert!(err.is_network(), "expected network error, got {err:?}");
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn invalid_form_never_reaches_the_service() {
    let api = start().await;
    let mut form = FormScreen::new();

    let err = form
        .submit_create(
            &api.units,
            &CreateUnitDto {
                brand: String::new(),
                ..truck()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SubmitError::Invalid(_)));
    assert!(form.field_error("brand").is_some());
    assert!(api.units.list().await.unwrap().is_empty());

    let created = form.submit_create(&api.units, &truck()).await.unwrap();
    assert_eq!(created.license_plate, "ABC-123");
}

#[tokio::test]
async fn list_screen_follows_create_and_delete() {
    let api = start().await;
    let mut screen = ListScreen::<Units>::new();
    let _ = screen.enter();

    assert_eq!(screen.refresh(&api.units).await, LoadOutcome::Applied);
    assert!(screen.items().is_empty());

    let created = api.units.create(&truck()).await.unwrap();
    screen.refresh(&api.units).await;
    assert_eq!(screen.items().len(), 1);

    let outcome = screen.delete(&api.units, created.id).await.unwrap();
    assert_eq!(outcome, LoadOutcome::Applied);
    assert!(screen.items().is_empty());
    assert!(screen.error().is_none());

    screen.leave();
    assert!(!screen.is_active());
}
