use crate::{
    database::UserRepository,
    models::{Session, ROLE_CUSTOMER},
    utils::AppError,
};
use mongodb::bson::DateTime as BsonDateTime;
use serde::{Deserialize, Serialize};

/// bcrypt cost used for every stored customer password.
pub const BCRYPT_COST: u32 = 12;
pub const MIN_PASSWORD_LEN: usize = 6;

pub const MSG_PHONE_REQUIRED: &str = "Phone number is required";
pub const MSG_PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters";
pub const MSG_PASSWORD_MISMATCH: &str = "Passwords do not match";
pub const MSG_PASSWORD_REQUIRED: &str = "Password is required";
pub const MSG_USER_NOT_FOUND: &str = "User not found. Please register first.";
pub const MSG_PASSWORD_SET: &str = "Password set successfully";
pub const MSG_INVALID_CREDENTIALS: &str = "Invalid phone number or password";
pub const MSG_INCOMPLETE_PROFILE: &str = "Account profile is incomplete. Please contact the restaurant to add your email.";

// Request/Response structures
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetPasswordRequest {
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct SetPasswordResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub user: Session,
}

impl SetPasswordRequest {
    /// Checks the payload and reports only the first failing rule.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.phone_number.trim().is_empty() {
            return Err(AppError::Validation(MSG_PHONE_REQUIRED.to_string()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::Validation(MSG_PASSWORD_TOO_SHORT.to_string()));
        }
        if self.password != self.confirm_password {
            return Err(AppError::Validation(MSG_PASSWORD_MISMATCH.to_string()));
        }
        Ok(())
    }
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.phone_number.trim().is_empty() {
            return Err(AppError::Validation(MSG_PHONE_REQUIRED.to_string()));
        }
        if self.password.is_empty() {
            return Err(AppError::Validation(MSG_PASSWORD_REQUIRED.to_string()));
        }
        Ok(())
    }
}

/// Hashes on the blocking pool; bcrypt at cost 12 takes a noticeable slice of CPU.
pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_string();
    actix_web::web::block(move || bcrypt::hash(password, BCRYPT_COST))
        .await
        .map_err(|e| AppError::Hashing(e.to_string()))?
        .map_err(AppError::from)
}

async fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let password = password.to_string();
    let hash = hash.to_string();
    actix_web::web::block(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::Hashing(e.to_string()))?
        .map_err(AppError::from)
}

// Set password for an already registered customer
pub async fn set_password(
    repo: &dyn UserRepository,
    request: &SetPasswordRequest,
) -> Result<SetPasswordResponse, AppError> {
    request.validate()?;

    let user = repo
        .find_by_phone(request.phone_number.trim())
        .await?
        .ok_or_else(|| AppError::NotFound(MSG_USER_NOT_FOUND.to_string()))?;

    let hashed = hash_password(&request.password).await?;

    repo.update_password(&user.id, &hashed, BsonDateTime::now()).await?;

    log::info!("✅ Password set for user {}", user.id.to_hex());

    Ok(SetPasswordResponse {
        success: true,
        message: MSG_PASSWORD_SET.to_string(),
    })
}

// Customer login: the returned session is what the client persists
pub async fn login(
    repo: &dyn UserRepository,
    request: &LoginRequest,
) -> Result<LoginResponse, AppError> {
    request.validate()?;

    let invalid = || AppError::Unauthorized(MSG_INVALID_CREDENTIALS.to_string());

    let user = repo
        .find_by_phone(request.phone_number.trim())
        .await?
        .ok_or_else(invalid)?;

    let stored = user.password.as_deref().ok_or_else(invalid)?;

    if !verify_password(&request.password, stored).await? {
        return Err(invalid());
    }

    let name = if user.name.trim().is_empty() { user.phone_number.clone() } else { user.name };

    let session = Session {
        id: user.id.to_hex(),
        name,
        email: user.email,
        role: ROLE_CUSTOMER.to_string(),
        restaurant_slug: None,
    };

    // The client refuses to store a session with blank fields, so never hand one out.
    if let Err(e) = session.validate() {
        log::warn!("⚠️  Login refused for {}: {}", session.id, e);
        return Err(AppError::Validation(MSG_INCOMPLETE_PROFILE.to_string()));
    }

    Ok(LoginResponse {
        success: true,
        user: session,
    })
}
