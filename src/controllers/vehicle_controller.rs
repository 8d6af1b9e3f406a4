use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::vehicle_dto::{VehicleFilters, VehicleResponse};
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::{AppError, AppResult};

pub struct VehicleController {
    repository: VehicleRepository,
}

impl VehicleController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: VehicleRepository::new(pool),
        }
    }

    /// Listado del catálogo con filtros opcionales; solo lectura
    pub async fn list(&self, filters: VehicleFilters) -> AppResult<Vec<VehicleResponse>> {
        let vehicles = self.repository.list_active(&filters.parse()).await?;

        let mut response = Vec::with_capacity(vehicles.len());
        for vehicle in vehicles {
            let images = self.repository.images_for_vehicle(vehicle.id).await?;
            response.push(VehicleResponse::from_vehicle(vehicle, images));
        }

        Ok(response)
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<VehicleResponse> {
        let vehicle = self
            .repository
            .find_active_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        let images = self.repository.images_for_vehicle(vehicle.id).await?;
        Ok(VehicleResponse::from_vehicle(vehicle, images))
    }
}
