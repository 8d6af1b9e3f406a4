//! Gateway de reconciliación de pagos
//!
//! Inicia el checkout alojado contra el proveedor externo y procesa
//! el callback asíncrono de confirmación, delegando el cambio de
//! estado al ciclo de vida de reservas.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use crate::controllers::booking_controller::BookingController;
use crate::dto::payment_dto::{CheckoutSessionResponse, WebhookEvent};
use crate::repositories::booking_repository::BookingRepository;
use crate::repositories::payment_repository::PaymentRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::stripe_service::StripeService;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

pub struct PaymentController {
    bookings: BookingRepository,
    vehicles: VehicleRepository,
    payments: PaymentRepository,
    lifecycle: BookingController,
    provider: StripeService,
    success_url: String,
    cancel_url: String,
}

impl PaymentController {
    pub fn new(state: &AppState) -> Self {
        Self {
            bookings: BookingRepository::new(state.pool.clone()),
            vehicles: VehicleRepository::new(state.pool.clone()),
            payments: PaymentRepository::new(state.pool.clone()),
            lifecycle: BookingController::new(state.pool.clone()),
            provider: StripeService::new(&state.config, state.http_client.clone()),
            success_url: state.config.checkout_success_url.clone(),
            cancel_url: state.config.checkout_cancel_url.clone(),
        }
    }

    /// Crear una sesión de checkout para una reserva del usuario
    pub async fn initiate_checkout(
        &self,
        user_id: Uuid,
        booking_id: Uuid,
    ) -> AppResult<CheckoutSessionResponse> {
        let booking = self
            .bookings
            .find_for_user(booking_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        // Una reserva ya pagada no vuelve a pasar por el proveedor
        if let Some(payment) = self.payments.find_by_booking(booking.id).await? {
            if payment.paid {
                return Err(AppError::Conflict("Booking already paid".to_string()));
            }
        }

        let vehicle = self
            .vehicles
            .find_by_id(booking.vehicle_id)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!("Booking {} references missing vehicle", booking.id))
            })?;

        // Unidades menores de moneda: round(total_price * 100)
        let amount_cents = (booking.total_price * Decimal::from(100))
            .round()
            .to_i64()
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "Booking {} total_price out of range: {}",
                    booking.id, booking.total_price
                ))
            })?;

        let product_name = format!("Booking #{} - {}", booking.id, vehicle.title);

        let session_id = self
            .provider
            .create_checkout_session(
                booking.id,
                &product_name,
                amount_cents,
                &self.success_url,
                &self.cancel_url,
            )
            .await?;

        // Registrar el pago pendiente con el total vigente
        self.payments
            .upsert_amount(booking.id, booking.total_price)
            .await?;

        info!("Checkout session {} created for booking {}", session_id, booking.id);

        Ok(CheckoutSessionResponse { session_id })
    }

    /// Procesar el callback firmado del proveedor de pagos.
    ///
    /// Tras una verificación exitosa la respuesta siempre es un
    /// acknowledgement, resuelva o no la reserva embebida: la semántica
    /// de reintentos del proveedor lo exige.
    pub async fn handle_payment_event(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> AppResult<serde_json::Value> {
        let event = self.provider.construct_event(payload, signature_header)?;

        match WebhookEvent::from(event) {
            WebhookEvent::CheckoutCompleted {
                booking_id: Some(booking_id),
                payment_reference,
            } => {
                self.lifecycle
                    .mark_confirmed(booking_id, &payment_reference)
                    .await?;
            }
            WebhookEvent::CheckoutCompleted {
                booking_id: None, ..
            } => {
                debug!("Checkout completed event without booking_id metadata; ignored");
            }
            WebhookEvent::Ignored { event_type } => {
                debug!("Ignoring payment event of type '{}'", event_type);
            }
        }

        Ok(json!({ "status": "received" }))
    }
}
