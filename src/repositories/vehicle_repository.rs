use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::vehicle_dto::ParsedVehicleFilters;
use crate::models::vehicle::{Vehicle, VehicleImage};
use crate::utils::errors::AppResult;

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Listar vehículos activos aplicando los filtros opcionales
    pub async fn list_active(
        &self,
        filters: &ParsedVehicleFilters,
    ) -> AppResult<Vec<Vehicle>> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT * FROM vehicles
            WHERE is_active = TRUE
              AND ($1::text IS NULL OR vehicle_type = $1)
              AND ($2::int IS NULL OR seats = $2)
              AND ($3::numeric IS NULL OR price_per_day >= $3)
              AND ($4::numeric IS NULL OR price_per_day <= $4)
              AND ($5::text IS NULL OR location_city ILIKE '%' || $5 || '%')
            ORDER BY created_at DESC
            "#,
        )
        .bind(filters.vehicle_type.map(|t| t.as_str()))
        .bind(filters.seats)
        .bind(filters.min_price)
        .bind(filters.max_price)
        .bind(&filters.city)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    pub async fn find_active_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE id = $1 AND is_active = TRUE",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    /// Buscar por id sin filtrar por is_active; las reservas embeben su
    /// vehículo aunque este ya no se liste en el catálogo
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    pub async fn images_for_vehicle(
        &self,
        vehicle_id: Uuid,
    ) -> AppResult<Vec<VehicleImage>> {
        let images = sqlx::query_as::<_, VehicleImage>(
            "SELECT * FROM vehicle_images WHERE vehicle_id = $1 ORDER BY id",
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(images)
    }
}
