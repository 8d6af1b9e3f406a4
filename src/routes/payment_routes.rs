use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    middleware,
    routing::post,
    Extension, Json, Router,
};

use crate::controllers::payment_controller::PaymentController;
use crate::dto::payment_dto::{CheckoutSessionResponse, CreateCheckoutRequest};
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

/// Header con la firma del webhook del proveedor
const SIGNATURE_HEADER: &str = "stripe-signature";

pub fn create_payment_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/checkout", post(create_checkout_session))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        // El webhook es servicio-a-servicio: lo autentica la firma, no un token
        .route("/webhook", post(payment_webhook))
        .merge(protected)
}

async fn create_checkout_session(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateCheckoutRequest>,
) -> AppResult<Json<CheckoutSessionResponse>> {
    let controller = PaymentController::new(&state);
    let response = controller
        .initiate_checkout(user.user_id, request.booking_id)
        .await?;
    Ok(Json(response))
}

async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<serde_json::Value>> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::InvalidSignature("missing signature header".to_string()))?;

    let controller = PaymentController::new(&state);
    let response = controller.handle_payment_event(&body, signature).await?;
    Ok(Json(response))
}
