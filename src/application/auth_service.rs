use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::{CreateUser, LoginRequest, User};
use crate::domain::validation::require_text;
use crate::infrastructure::security::{
    generate_token, hash_password, validate_token, verify_password,
};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, trace, warn};
use uuid::Uuid;

const MIN_PASSWORD_LEN: usize = 6;
const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub struct AuthService<R: UserRepository> {
    user_repository: Arc<R>,
    jwt_secret: String,
    token_ttl_secs: u64,
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(user_repository: Arc<R>, jwt_secret: String, token_ttl_secs: u64) -> Self {
        Self {
            user_repository,
            jwt_secret,
            token_ttl_secs,
        }
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn register_user(&self, req: CreateUser) -> Result<User> {
        trace!("Starting user registration");

        require_text("email", &req.email)?;
        require_text("name", &req.name)?;
        if !req.email.contains('@') {
            return Err(DomainError::Validation("email is invalid".to_string()).into());
        }
        if req.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::Validation(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            ))
            .into());
        }

        if self
            .user_repository
            .find_user_by_email(&req.email)
            .await?
            .is_some()
        {
            warn!(email = %req.email, "User already exists");
            return Err(
                DomainError::Validation("User with this email already exists".to_string()).into(),
            );
        }

        let password_hash = hash_password(&req.password).map_err(|e| {
            error!(error = %e, "Failed to hash password");
            DomainError::Internal(format!("Failed to hash password: {}", e))
        })?;

        let user = User {
            id: Uuid::new_v4(),
            email: req.email,
            name: req.name,
            password_hash,
        };

        debug!(user_id = %user.id, "Saving user to repository");
        self.user_repository.save_user(user.clone()).await?;

        info!(user_id = %user.id, email = %user.email, "User registered successfully");
        Ok(user)
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn login(&self, req: LoginRequest) -> Result<String> {
        trace!("Starting login");

        let user = self
            .user_repository
            .find_user_by_email(&req.email)
            .await?
            .ok_or_else(|| {
                warn!(email = %req.email, "User not found during login");
                DomainError::Authentication(INVALID_CREDENTIALS.to_string())
            })?;

        let is_valid = verify_password(&req.password, &user.password_hash).map_err(|e| {
            error!(error = %e, "Failed to verify password");
            DomainError::Internal(format!("Failed to verify password: {}", e))
        })?;

        if !is_valid {
            warn!(user_id = %user.id, "Invalid password during login");
            return Err(DomainError::Authentication(INVALID_CREDENTIALS.to_string()).into());
        }

        let token = generate_token(&user.id.to_string(), &self.jwt_secret, self.token_ttl_secs)
            .map_err(|e| {
                error!(error = %e, "Failed to generate token");
                DomainError::Internal(format!("Failed to generate token: {}", e))
            })?;

        info!(user_id = %user.id, "Login successful");
        Ok(token)
    }

    /// Resolves a bearer token to a user that still exists.
    #[instrument(skip_all)]
    pub async fn authenticate(&self, token: &str) -> Result<User> {
        let subject = validate_token(token, &self.jwt_secret).map_err(|e| {
            debug!(error = %e, "Token rejected");
            DomainError::Authentication("Invalid or expired token".to_string())
        })?;

        let user_id = Uuid::parse_str(&subject)
            .map_err(|_| DomainError::Authentication("Invalid token subject".to_string()))?;

        let user = self
            .user_repository
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %user_id, "Token subject no longer exists");
                DomainError::Authentication("User no longer exists".to_string())
            })?;

        trace!(user_id = %user.id, "Token accepted");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn current_user(&self, user_id: Uuid) -> Result<User> {
        self.user_repository
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User").into())
    }
}
