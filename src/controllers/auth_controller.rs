use chrono::{Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::config::environment::EnvironmentConfig;
use crate::dto::auth_dto::{
    AuthResponse, ForgotPasswordRequest, LoginRequest, MessageResponse, RegisterRequest,
    ResetPasswordRequest,
};
use crate::models::user::{User, UserResponse};
use crate::repositories::user_repository::UserRepository;
use crate::services::email_service::{password_reset_email, Mailer};
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::jwt::{generate_token, JwtConfig};

/// Lifetime of a password reset link
pub const RESET_TOKEN_TTL_MINUTES: i64 = 60;

const FORGOT_PASSWORD_MESSAGE: &str =
    "If an account exists for this email, a reset link has been sent.";

pub struct AuthController {
    repository: UserRepository,
    jwt: Arc<JwtConfig>,
    config: Arc<EnvironmentConfig>,
    mailer: Arc<dyn Mailer>,
}

/// Random single-use token, hex encoded
pub fn generate_reset_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Digest stored in place of the raw reset token
pub fn hash_reset_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

async fn hash_password(password: String) -> AppResult<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
        .map_err(|e| AppError::Hash(format!("Error hashing password: {}", e)))
}

async fn verify_password(password: String, hash: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
        .map_err(|e| AppError::Hash(format!("Error verifying password: {}", e)))
}

impl AuthController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: UserRepository::new(state.pool.clone()),
            jwt: state.jwt.clone(),
            config: state.config.clone(),
            mailer: state.mailer.clone(),
        }
    }

    fn auth_response(&self, user: User) -> AppResult<AuthResponse> {
        let token = generate_token(user.id, &self.jwt)?;
        Ok(AuthResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            token,
        })
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        let request = request.normalized();
        request.validate()?;

        if self.repository.email_exists(&request.email).await? {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let password_hash = hash_password(request.password).await?;
        let user = User::new(request.name, request.email, password_hash);
        let saved = self.repository.create(&user).await?;

        info!("👤 Registered user {}", saved.id);
        self.auth_response(saved)
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        request.validate()?;

        let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

        let user = self
            .repository
            .find_by_email(request.email.trim())
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(request.password, user.password_hash.clone()).await? {
            return Err(invalid());
        }

        self.auth_response(user)
    }

    pub async fn me(&self, user_id: Uuid) -> AppResult<UserResponse> {
        let user = self
            .repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Not authorized, user not found".to_string()))?;

        Ok(user.into())
    }

    /// Always answers with the same message so account existence is not revealed.
    pub async fn forgot_password(&self, request: ForgotPasswordRequest) -> AppResult<MessageResponse> {
        request.validate()?;

        let Some(user) = self.repository.find_by_email(request.email.trim()).await? else {
            return Ok(MessageResponse::new(FORGOT_PASSWORD_MESSAGE));
        };

        let token = generate_reset_token();
        let expires_at = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);
        self.repository
            .set_reset_token(user.id, &hash_reset_token(&token), expires_at)
            .await?;

        let email = password_reset_email(&user.email, &self.config.reset_password_url(&token));
        self.mailer.send(email).await?;

        info!("🔑 Password reset link issued for user {}", user.id);
        Ok(MessageResponse::new(FORGOT_PASSWORD_MESSAGE))
    }

    pub async fn reset_password(
        &self,
        token: &str,
        request: ResetPasswordRequest,
    ) -> AppResult<MessageResponse> {
        if token.trim().is_empty() {
            return Err(AppError::BadRequest("Token and new password are required.".to_string()));
        }
        request.validate()?;

        let user = self
            .repository
            .find_by_reset_token(&hash_reset_token(token), Utc::now())
            .await?
            .ok_or_else(|| {
                warn!("Reset attempted with invalid or expired token");
                AppError::BadRequest("Invalid or expired reset token.".to_string())
            })?;

        let password_hash = hash_password(request.password).await?;
        self.repository.update_password(user.id, &password_hash).await?;

        info!("🔑 Password reset for user {}", user.id);
        Ok(MessageResponse::new("Password has been reset successfully."))
    }
}
