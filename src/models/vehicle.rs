//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle del catálogo de alquiler.
//! Mapea exactamente al schema PostgreSQL con primary key 'id'.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Tipo de vehículo - se persiste como texto ('car' | 'bike')
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleType {
    Car,
    Bike,
}

impl VehicleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Car => "car",
            VehicleType::Bike => "bike",
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "car" => Ok(VehicleType::Car),
            "bike" => Ok(VehicleType::Bike),
            _ => Err(()),
        }
    }
}

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub owner_id: Option<Uuid>,
    pub vehicle_type: String,
    pub title: String,
    pub description: String,
    pub make: String,
    pub model: String,
    pub year: Option<i32>,
    pub seats: i32,
    pub price_per_day: Decimal,
    pub deposit: Decimal,
    pub location_city: String,
    pub location_state: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Imagen asociada a un vehículo
#[derive(Debug, Clone, FromRow)]
pub struct VehicleImage {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub url: String,
    pub alt_text: String,
}
