//! Lógica de negocio del ciclo de vida de reservas
//!
//! Creación con chequeo de disponibilidad transaccional, cancelación
//! por el usuario y confirmación por pago verificado.

use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::dto::booking_dto::{BookingResponse, CreateBookingRequest, CreateReviewRequest, ReviewResponse};
use crate::dto::vehicle_dto::VehicleResponse;
use crate::models::booking::{Booking, BookingStatus};
use crate::repositories::booking_repository::{BookingRepository, CreateBookingOutcome};
use crate::repositories::review_repository::ReviewRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::booking_rules::compute_total_price;
use crate::utils::errors::{AppError, AppResult};

pub struct BookingController {
    bookings: BookingRepository,
    vehicles: VehicleRepository,
    reviews: ReviewRepository,
}

impl BookingController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            bookings: BookingRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool.clone()),
            reviews: ReviewRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        request: CreateBookingRequest,
    ) -> AppResult<BookingResponse> {
        if request.start_date > request.end_date {
            return Err(AppError::Validation(
                "start_date must be <= end_date".to_string(),
            ));
        }

        let vehicle = self
            .vehicles
            .find_active_by_id(request.vehicle)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        let total_price = compute_total_price(
            vehicle.price_per_day,
            vehicle.deposit,
            request.start_date,
            request.end_date,
        );

        let outcome = self
            .bookings
            .create_if_available(
                user_id,
                request.vehicle,
                request.start_date,
                request.end_date,
                total_price,
            )
            .await?;

        let booking = match outcome {
            CreateBookingOutcome::Created(booking) => booking,
            CreateBookingOutcome::VehicleNotFound => {
                return Err(AppError::NotFound("Vehicle not found".to_string()))
            }
            CreateBookingOutcome::Unavailable => {
                return Err(AppError::Conflict(
                    "Vehicle not available for these dates".to_string(),
                ))
            }
        };

        info!(
            "Booking {} created for vehicle {} ({} - {})",
            booking.id, vehicle.id, booking.start_date, booking.end_date
        );

        self.to_response(booking, false).await
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<BookingResponse>> {
        let bookings = self.bookings.list_for_user(user_id).await?;

        let mut response = Vec::with_capacity(bookings.len());
        for booking in bookings {
            response.push(self.to_response(booking, false).await?);
        }

        Ok(response)
    }

    pub async fn get_for_user(
        &self,
        user_id: Uuid,
        booking_id: Uuid,
    ) -> AppResult<BookingResponse> {
        let booking = self
            .bookings
            .find_for_user(booking_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        self.to_response(booking, true).await
    }

    pub async fn cancel(
        &self,
        user_id: Uuid,
        booking_id: Uuid,
    ) -> AppResult<BookingResponse> {
        self.bookings
            .find_for_user(booking_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        // El guard vive en el UPDATE: si entre la lectura y la escritura
        // llegó una confirmación, la fila ya no matchea y no se pisa
        let booking = self
            .bookings
            .cancel_if_allowed(booking_id, user_id)
            .await?
            .ok_or_else(|| {
                AppError::BadRequest(
                    "Cannot cancel a confirmed or completed booking".to_string(),
                )
            })?;

        self.to_response(booking, false).await
    }

    /// Confirmar una reserva por un pago verificado.
    ///
    /// Invocado solo por el gateway de pagos. Una reserva inexistente es
    /// un no-op registrado en el log: el evento se considera manejado y
    /// el proveedor no debe reintentar la entrega.
    pub async fn mark_confirmed(
        &self,
        booking_id: Uuid,
        payment_reference: &str,
    ) -> AppResult<()> {
        match self.bookings.find_by_id(booking_id).await? {
            Some(booking) => {
                self.bookings
                    .confirm_with_payment(booking.id, payment_reference)
                    .await?;
                info!("Booking {} confirmed by payment event", booking.id);
                Ok(())
            }
            None => {
                warn!(
                    "Payment event references unknown booking {}; acknowledged without action",
                    booking_id
                );
                Ok(())
            }
        }
    }

    pub async fn create_review(
        &self,
        user_id: Uuid,
        booking_id: Uuid,
        request: CreateReviewRequest,
    ) -> AppResult<ReviewResponse> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let booking = self
            .bookings
            .find_for_user(booking_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        if booking.status() != BookingStatus::Completed {
            return Err(AppError::BadRequest(
                "Only completed bookings can be reviewed".to_string(),
            ));
        }

        if self.reviews.find_by_booking(booking.id).await?.is_some() {
            return Err(AppError::Conflict("Booking already reviewed".to_string()));
        }

        let review = self
            .reviews
            .create(booking.id, request.rating, request.comment.unwrap_or_default())
            .await?;

        Ok(review.into())
    }

    async fn to_response(
        &self,
        booking: Booking,
        include_review: bool,
    ) -> AppResult<BookingResponse> {
        let vehicle = self
            .vehicles
            .find_by_id(booking.vehicle_id)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!("Booking {} references missing vehicle", booking.id))
            })?;

        let images = self.vehicles.images_for_vehicle(vehicle.id).await?;
        let review = if include_review {
            self.reviews.find_by_booking(booking.id).await?
        } else {
            None
        };

        Ok(BookingResponse::from_booking(
            booking,
            VehicleResponse::from_vehicle(vehicle, images),
            review,
        ))
    }
}
