//! DTOs de registro, credenciales y perfil de usuario

use serde::{Deserialize, Serialize};

use crate::models::user::User;

// Request de registro
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

// Response de registro: credencial opaca + identidad
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub token: String,
    pub user_id: String,
    pub username: String,
}

// Query de disponibilidad de username
#[derive(Debug, Deserialize)]
pub struct UsernameQuery {
    #[serde(default)]
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct UsernameAvailabilityResponse {
    pub available: bool,
}

// Perfil del usuario autenticado
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub date_joined: String,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            date_joined: user.created_at.to_rfc3339(),
        }
    }
}

// Request de actualización de perfil; los campos ausentes no cambian
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}
