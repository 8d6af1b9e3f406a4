//! DTOs de reservas y reseñas

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::vehicle_dto::VehicleResponse;
use crate::models::booking::Booking;
use crate::models::review::Review;

// Request para crear una reserva
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub vehicle: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

// Request para reseñar una reserva completada
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[validate(range(min = 1, max = 5))]
    pub rating: i16,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub id: String,
    pub rating: i16,
    pub comment: String,
    pub created_at: String,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id.to_string(),
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at.to_rfc3339(),
        }
    }
}

// Response de reserva con el vehículo embebido
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: String,
    pub vehicle: VehicleResponse,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_price: String,
    pub status: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<ReviewResponse>,
}

impl BookingResponse {
    pub fn from_booking(
        booking: Booking,
        vehicle: VehicleResponse,
        review: Option<Review>,
    ) -> Self {
        Self {
            id: booking.id.to_string(),
            vehicle,
            start_date: booking.start_date,
            end_date: booking.end_date,
            total_price: booking.total_price.to_string(),
            status: booking.status,
            created_at: booking.created_at.to_rfc3339(),
            review: review.map(Into::into),
        }
    }
}
