//! Tests de integración contra una base de datos real.
//!
//! `#[sqlx::test]` crea una base de datos aislada por test y le aplica
//! las migraciones de ./migrations; necesitan un DATABASE_URL que
//! apunte a un Postgres accesible.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::util::ServiceExt;
use uuid::Uuid;

use rental_booking::config::environment::EnvironmentConfig;
use rental_booking::controllers::booking_controller::BookingController;
use rental_booking::controllers::payment_controller::PaymentController;
use rental_booking::dto::booking_dto::CreateBookingRequest;
use rental_booking::models::booking::Booking;
use rental_booking::repositories::booking_repository::{BookingRepository, CreateBookingOutcome};
use rental_booking::repositories::payment_repository::PaymentRepository;
use rental_booking::repositories::user_repository::UserRepository;
use rental_booking::routes::build_router;
use rental_booking::state::AppState;
use rental_booking::utils::errors::AppError;

fn test_config() -> EnvironmentConfig {
    EnvironmentConfig {
        environment: "test".to_string(),
        port: 0,
        host: "localhost".to_string(),
        jwt_secret: "test-jwt-secret".to_string(),
        jwt_expiration: 3600,
        payment_api_base: "http://localhost:0".to_string(),
        payment_secret_key: "sk_test".to_string(),
        payment_webhook_secret: "whsec_test".to_string(),
        checkout_success_url: "http://localhost/payments/success/".to_string(),
        checkout_cancel_url: "http://localhost/payments/cancel/".to_string(),
    }
}

fn app(pool: PgPool) -> Router {
    build_router(AppState::new(pool, test_config()))
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn seed_user(pool: &PgPool, username: &str) -> Uuid {
    UserRepository::new(pool.clone())
        .create(
            username.to_string(),
            format!("{}@example.com", username),
            "$2b$12$not-a-real-hash".to_string(),
        )
        .await
        .unwrap()
        .id
}

async fn seed_vehicle(pool: &PgPool) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO vehicles
            (id, vehicle_type, title, make, model, year, seats,
             price_per_day, deposit, location_city, location_state)
        VALUES ($1, 'car', 'Seat León', 'Seat', 'León', 2020, 5, 40, 100, 'Madrid', 'Madrid')
        "#,
    )
    .bind(id)
    .execute(pool)
    .await
    .unwrap();
    id
}

async fn seed_booking(
    pool: &PgPool,
    user_id: Uuid,
    vehicle_id: Uuid,
    start: &str,
    end: &str,
) -> Booking {
    let outcome = BookingRepository::new(pool.clone())
        .create_if_available(user_id, vehicle_id, date(start), date(end), 180.into())
        .await
        .unwrap();

    match outcome {
        CreateBookingOutcome::Created(booking) => booking,
        _ => panic!("seed booking was not created"),
    }
}

async fn booking_status(pool: &PgPool, id: Uuid) -> String {
    let row: (String,) = sqlx::query_as("SELECT status FROM bookings WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap();
    row.0
}

#[sqlx::test]
async fn test_overlapping_booking_is_rejected(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let bob = seed_user(&pool, "bob").await;
    let vehicle = seed_vehicle(&pool).await;
    seed_booking(&pool, alice, vehicle, "2025-12-01", "2025-12-03").await;

    let controller = BookingController::new(pool.clone());

    // El día final compartido también choca: el rango es inclusivo
    let result = controller
        .create(
            bob,
            CreateBookingRequest {
                vehicle,
                start_date: date("2025-12-03"),
                end_date: date("2025-12-05"),
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    // El primer día libre tras la reserva existente sí entra
    let result = controller
        .create(
            bob,
            CreateBookingRequest {
                vehicle,
                start_date: date("2025-12-04"),
                end_date: date("2025-12-05"),
            },
        )
        .await;
    assert!(result.is_ok());
}

#[sqlx::test]
async fn test_cancel_pending_booking(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let vehicle = seed_vehicle(&pool).await;
    let booking = seed_booking(&pool, alice, vehicle, "2025-12-01", "2025-12-03").await;

    let response = BookingController::new(pool.clone())
        .cancel(alice, booking.id)
        .await
        .unwrap();

    assert_eq!(response.status, "cancelled");
    assert_eq!(booking_status(&pool, booking.id).await, "cancelled");
}

#[sqlx::test]
async fn test_cancel_refuses_confirmed_booking(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let vehicle = seed_vehicle(&pool).await;
    let booking = seed_booking(&pool, alice, vehicle, "2025-12-01", "2025-12-03").await;

    let controller = BookingController::new(pool.clone());
    controller.mark_confirmed(booking.id, "pi_123").await.unwrap();

    let result = controller.cancel(alice, booking.id).await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));
    // La confirmación no se pisa
    assert_eq!(booking_status(&pool, booking.id).await, "confirmed");
}

#[sqlx::test]
async fn test_replayed_payment_event_keeps_original_paid_at(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let vehicle = seed_vehicle(&pool).await;
    let booking = seed_booking(&pool, alice, vehicle, "2025-12-01", "2025-12-03").await;

    let controller = BookingController::new(pool.clone());
    let payments = PaymentRepository::new(pool.clone());

    controller.mark_confirmed(booking.id, "pi_first").await.unwrap();

    let first = payments.find_by_booking(booking.id).await.unwrap().unwrap();
    assert!(first.paid);
    assert_eq!(first.provider_reference, "pi_first");
    let original_paid_at = first.paid_at.unwrap();

    // Entrega repetida del mismo evento: misma reserva, otra referencia
    controller.mark_confirmed(booking.id, "pi_retry").await.unwrap();

    let replayed = payments.find_by_booking(booking.id).await.unwrap().unwrap();
    assert!(replayed.paid);
    assert_eq!(replayed.provider_reference, "pi_retry");
    assert_eq!(replayed.paid_at, Some(original_paid_at));
    assert_eq!(booking_status(&pool, booking.id).await, "confirmed");
}

#[sqlx::test]
async fn test_payment_event_for_unknown_booking_changes_nothing(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let vehicle = seed_vehicle(&pool).await;
    let booking = seed_booking(&pool, alice, vehicle, "2025-12-01", "2025-12-03").await;

    BookingController::new(pool.clone())
        .mark_confirmed(Uuid::new_v4(), "pi_orphan")
        .await
        .unwrap();

    assert_eq!(booking_status(&pool, booking.id).await, "pending");
    let payments: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM payments")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(payments.0, 0);
}

#[sqlx::test]
async fn test_checkout_refuses_already_paid_booking(pool: PgPool) {
    let alice = seed_user(&pool, "alice").await;
    let vehicle = seed_vehicle(&pool).await;
    let booking = seed_booking(&pool, alice, vehicle, "2025-12-01", "2025-12-03").await;

    BookingController::new(pool.clone())
        .mark_confirmed(booking.id, "pi_paid")
        .await
        .unwrap();

    let state = AppState::new(pool.clone(), test_config());
    let result = PaymentController::new(&state)
        .initiate_checkout(alice, booking.id)
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[sqlx::test]
async fn test_duplicate_username_insert_maps_to_conflict(pool: PgPool) {
    let users = UserRepository::new(pool.clone());
    users
        .create("alice".to_string(), "a@example.com".to_string(), "hash".to_string())
        .await
        .unwrap();

    // Mismo username directo contra el UNIQUE, sin pasar por el pre-chequeo
    let result = users
        .create("alice".to_string(), "b@example.com".to_string(), "hash".to_string())
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[sqlx::test]
async fn test_registration_flow(pool: PgPool) {
    let app = app(pool.clone());

    let register = |username: &str| {
        Request::post("/api/auth/register")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({ "username": username, "password": "s3cret", "email": format!("{}@example.com", username) })
                    .to_string(),
            ))
            .unwrap()
    };

    let response = app.clone().oneshot(register("alice")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let alice = body_json(response).await;
    assert_eq!(alice["username"], "alice");
    let alice_token = alice["token"].as_str().unwrap().to_string();

    let response = app.clone().oneshot(register("bob")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Username repetido: conflicto, no error interno
    let response = app.clone().oneshot(register("alice")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["code"], "CONFLICT");

    // La credencial de alice resuelve su propio perfil
    let response = app
        .clone()
        .oneshot(
            Request::get("/api/auth/me")
                .header("authorization", format!("Bearer {}", alice_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let profile = body_json(response).await;
    assert_eq!(profile["username"], "alice");
}
