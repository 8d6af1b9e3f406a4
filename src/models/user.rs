//! Modelo de User
//!
//! Usuarios registrados del servicio de alquiler. El password nunca
//! sale de este modelo hacia la API.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// User principal - mapea a la tabla users
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}
