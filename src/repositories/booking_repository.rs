use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::booking::{Booking, BookingStatus};
use crate::utils::errors::AppResult;

/// Resultado de intentar crear una reserva dentro de la transacción
pub enum CreateBookingOutcome {
    Created(Booking),
    VehicleNotFound,
    Unavailable,
}

pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Chequeo de disponibilidad + insert en una sola transacción.
    ///
    /// El SELECT ... FOR UPDATE sobre la fila del vehículo serializa las
    /// creaciones concurrentes para el mismo vehículo: dos requests con
    /// rangos solapados no pueden pasar ambas el chequeo de solapamiento.
    pub async fn create_if_available(
        &self,
        user_id: Uuid,
        vehicle_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
        total_price: Decimal,
    ) -> AppResult<CreateBookingOutcome> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<(Uuid,)> = sqlx::query_as(
            "SELECT id FROM vehicles WHERE id = $1 AND is_active = TRUE FOR UPDATE",
        )
        .bind(vehicle_id)
        .fetch_optional(&mut *tx)
        .await?;

        if locked.is_none() {
            return Ok(CreateBookingOutcome::VehicleNotFound);
        }

        // Regla de solapamiento inclusivo: existing.start <= new.end
        // AND existing.end >= new.start; solo bloquean estados activos
        let blocking: Vec<&str> = BookingStatus::ALL
            .iter()
            .filter(|s| s.is_active())
            .map(|s| s.as_str())
            .collect();

        let conflict: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM bookings
                WHERE vehicle_id = $1
                  AND status = ANY($2)
                  AND start_date <= $4
                  AND end_date >= $3
            )
            "#,
        )
        .bind(vehicle_id)
        .bind(&blocking)
        .bind(start_date)
        .bind(end_date)
        .fetch_one(&mut *tx)
        .await?;

        if conflict.0 {
            return Ok(CreateBookingOutcome::Unavailable);
        }

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (id, user_id, vehicle_id, start_date, end_date, total_price, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, 'pending', $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(vehicle_id)
        .bind(start_date)
        .bind(end_date)
        .bind(total_price)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(CreateBookingOutcome::Created(booking))
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(booking)
    }

    /// Buscar una reserva solo si pertenece al usuario; para cualquier
    /// otra cuenta el resultado es indistinguible de inexistente
    pub async fn find_for_user(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    /// Cancelar con el guard de estado dentro del propio UPDATE: una
    /// confirmación concurrente entre lectura y escritura no puede ser
    /// pisada. Devuelve None si el estado ya no admite cancelación.
    pub async fn cancel_if_allowed(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<Booking>> {
        let blocked: Vec<&str> = BookingStatus::ALL
            .iter()
            .filter(|s| !s.can_cancel())
            .map(|s| s.as_str())
            .collect();

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings SET status = $3
            WHERE id = $1 AND user_id = $2 AND status <> ALL($4)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(BookingStatus::Cancelled.as_str())
        .bind(&blocked)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    /// Confirmar la reserva y marcar su pago en una transacción.
    ///
    /// Idempotente: re-aplicar sobre una reserva ya confirmada solo
    /// refresca la referencia del proveedor; paid_at conserva el
    /// timestamp original.
    pub async fn confirm_with_payment(
        &self,
        booking_id: Uuid,
        payment_reference: &str,
    ) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE bookings SET status = 'confirmed' WHERE id = $1")
            .bind(booking_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO payments (id, booking_id, amount, provider_reference, paid, paid_at)
            SELECT $1, b.id, b.total_price, $3, TRUE, $4
            FROM bookings b WHERE b.id = $2
            ON CONFLICT (booking_id) DO UPDATE
            SET paid = TRUE,
                provider_reference = EXCLUDED.provider_reference,
                paid_at = COALESCE(payments.paid_at, EXCLUDED.paid_at)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(booking_id)
        .bind(payment_reference)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }
}
