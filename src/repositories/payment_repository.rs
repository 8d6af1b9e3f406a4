use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::payment::Payment;
use crate::utils::errors::AppResult;

pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Registrar (o refrescar) el pago pendiente de una reserva al
    /// iniciar el checkout. No toca paid ni paid_at.
    pub async fn upsert_amount(
        &self,
        booking_id: Uuid,
        amount: Decimal,
    ) -> AppResult<Payment> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (id, booking_id, amount, provider_reference, paid, paid_at)
            VALUES ($1, $2, $3, '', FALSE, NULL)
            ON CONFLICT (booking_id) DO UPDATE SET amount = EXCLUDED.amount
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(booking_id)
        .bind(amount)
        .fetch_one(&self.pool)
        .await?;

        Ok(payment)
    }

    pub async fn find_by_booking(&self, booking_id: Uuid) -> AppResult<Option<Payment>> {
        let payment =
            sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE booking_id = $1")
                .bind(booking_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(payment)
    }
}
