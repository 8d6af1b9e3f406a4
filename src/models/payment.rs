//! Modelo de Payment
//!
//! Pago uno-a-uno con una reserva. Se crea sin pagar al iniciar el
//! checkout y solo pasa a paid=true con un evento verificado del
//! proveedor de pagos.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Payment {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub amount: Decimal,
    pub provider_reference: String,
    pub paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
}
