//! DTOs del catálogo de vehículos

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::vehicle::{Vehicle, VehicleImage, VehicleType};

/// Filtros de listado, tal como llegan por query string.
///
/// Los valores numéricos llegan como texto; un valor que no parsea se
/// ignora en silencio en lugar de rechazar la request.
#[derive(Debug, Default, Deserialize)]
pub struct VehicleFilters {
    #[serde(rename = "type")]
    pub vehicle_type: Option<String>,
    pub seats: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub city: Option<String>,
}

/// Filtros ya parseados, listos para la consulta SQL
#[derive(Debug, Default, PartialEq)]
pub struct ParsedVehicleFilters {
    pub vehicle_type: Option<VehicleType>,
    pub seats: Option<i32>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub city: Option<String>,
}

impl VehicleFilters {
    pub fn parse(self) -> ParsedVehicleFilters {
        ParsedVehicleFilters {
            // Un tipo desconocido se ignora igual que un número que no parsea
            vehicle_type: self.vehicle_type.and_then(|t| t.parse().ok()),
            seats: self.seats.and_then(|s| s.parse().ok()),
            min_price: self.min_price.and_then(|p| p.parse().ok()),
            max_price: self.max_price.and_then(|p| p.parse().ok()),
            city: self.city.filter(|c| !c.is_empty()),
        }
    }
}

/// Imagen de vehículo para la API
#[derive(Debug, Serialize)]
pub struct VehicleImageResponse {
    pub id: String,
    pub url: String,
    pub alt_text: String,
}

impl From<VehicleImage> for VehicleImageResponse {
    fn from(image: VehicleImage) -> Self {
        Self {
            id: image.id.to_string(),
            url: image.url,
            alt_text: image.alt_text,
        }
    }
}

/// Response de vehículo para la API
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub vehicle_type: String,
    pub title: String,
    pub description: String,
    pub make: String,
    pub model: String,
    pub year: Option<i32>,
    pub seats: i32,
    pub price_per_day: String,
    pub deposit: String,
    pub location_city: String,
    pub location_state: String,
    pub images: Vec<VehicleImageResponse>,
    pub created_at: String,
}

impl VehicleResponse {
    pub fn from_vehicle(vehicle: Vehicle, images: Vec<VehicleImage>) -> Self {
        Self {
            id: vehicle.id.to_string(),
            vehicle_type: vehicle.vehicle_type,
            title: vehicle.title,
            description: vehicle.description,
            make: vehicle.make,
            model: vehicle.model,
            year: vehicle.year,
            seats: vehicle.seats,
            price_per_day: vehicle.price_per_day.to_string(),
            deposit: vehicle.deposit.to_string(),
            location_city: vehicle.location_city,
            location_state: vehicle.location_state,
            images: images.into_iter().map(Into::into).collect(),
            created_at: vehicle.created_at.to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_numeric_filters_are_ignored() {
        let filters = VehicleFilters {
            vehicle_type: Some("car".to_string()),
            seats: Some("abc".to_string()),
            min_price: Some("cheap".to_string()),
            max_price: Some("50".to_string()),
            city: Some("Madrid".to_string()),
        };

        let parsed = filters.parse();
        assert_eq!(parsed.vehicle_type, Some(VehicleType::Car));
        assert_eq!(parsed.seats, None);
        assert_eq!(parsed.min_price, None);
        assert_eq!(parsed.max_price, Some(Decimal::from(50)));
        assert_eq!(parsed.city.as_deref(), Some("Madrid"));
    }

    #[test]
    fn test_unknown_vehicle_type_is_ignored() {
        let filters = VehicleFilters {
            vehicle_type: Some("truck".to_string()),
            ..Default::default()
        };

        assert_eq!(filters.parse().vehicle_type, None);
    }

    #[test]
    fn test_valid_numeric_filters_parse() {
        let filters = VehicleFilters {
            seats: Some("4".to_string()),
            min_price: Some("10.50".to_string()),
            ..Default::default()
        };

        let parsed = filters.parse();
        assert_eq!(parsed.seats, Some(4));
        assert_eq!(parsed.min_price, Some(Decimal::new(1050, 2)));
    }

    #[test]
    fn test_empty_filters_parse_to_none() {
        let parsed = VehicleFilters::default().parse();
        assert_eq!(parsed, ParsedVehicleFilters::default());
    }
}
