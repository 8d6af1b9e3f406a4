use bcrypt::{hash, DEFAULT_COST};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::environment::EnvironmentConfig;
use crate::dto::auth_dto::{ProfileResponse, RegisterRequest, RegisterResponse, UpdateProfileRequest};
use crate::middleware::auth::generate_jwt_token;
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::{AppError, AppResult};

pub struct AuthController {
    repository: UserRepository,
    config: EnvironmentConfig,
}

impl AuthController {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self {
            repository: UserRepository::new(pool),
            config,
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<RegisterResponse> {
        let username = request.username.unwrap_or_default();
        let password = request.password.unwrap_or_default();

        if username.trim().is_empty() || password.is_empty() {
            return Err(AppError::Validation("username and password required".to_string()));
        }

        if self.repository.username_exists(&username).await? {
            return Err(AppError::Conflict("username taken".to_string()));
        }

        let password_hash = hash(&password, DEFAULT_COST)
            .map_err(|e| AppError::Hash(format!("Error hashing password: {}", e)))?;

        let user = self
            .repository
            .create(username, request.email.unwrap_or_default(), password_hash)
            .await?;

        let token = generate_jwt_token(user.id, &self.config)?;

        Ok(RegisterResponse {
            token,
            user_id: user.id.to_string(),
            username: user.username,
        })
    }

    /// Disponibilidad de un username candidato
    pub async fn check_username(&self, username: &str) -> AppResult<bool> {
        if username.is_empty() {
            return Err(AppError::BadRequest("username required".to_string()));
        }

        let taken = self.repository.username_exists(username).await?;
        Ok(!taken)
    }

    pub async fn get_profile(&self, user_id: Uuid) -> AppResult<ProfileResponse> {
        let user = self
            .repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(user.into())
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        request: UpdateProfileRequest,
    ) -> AppResult<ProfileResponse> {
        let current = self
            .repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let email = match request.email {
            Some(email) if !email.is_empty() && email != current.email => {
                if self.repository.email_taken_by_other(&email, user_id).await? {
                    return Err(AppError::Conflict("Email already in use".to_string()));
                }
                email
            }
            _ => current.email,
        };

        let user = self
            .repository
            .update_profile(
                user_id,
                email,
                request.first_name.unwrap_or(current.first_name),
                request.last_name.unwrap_or(current.last_name),
            )
            .await?;

        Ok(user.into())
    }
}
