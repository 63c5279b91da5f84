use axum::{extract::State, response::Json};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};

use crate::entities::user::{self, Entity as User};
use crate::error::AppError;
use crate::middleware::auth::{jwt_secret, AuthUser, Claims};
use crate::state::AppState;

const TOKEN_TTL_SECS: usize = 86400;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct SignupRequest {
    username: String,
    password: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SignupResponse {
    id: i32,
    username: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    access_token: String,
    expires_in: usize,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UserProfile {
    id: i32,
    username: String,
    created_at: chrono::NaiveDateTime,
}

#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Account created", body = SignupResponse),
        (status = 409, description = "Username already exists"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Authentication"
)]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<SignupResponse>, AppError> {
    tracing::info!(username = %payload.username, "signup attempt");

    let existing = User::find()
        .filter(user::Column::Username.eq(&payload.username))
        .one(&state.db)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    if existing.is_some() {
        return Err(AppError::Conflict("Username already exists".to_string()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(payload.password.as_bytes(), &salt)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .to_string();

    let account = user::ActiveModel {
        username: Set(payload.username),
        password: Set(password_hash),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };

    let saved = account
        .insert(&state.db)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok(Json(SignupResponse {
        id: saved.id,
        username: saved.username,
    }))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Authentication"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    tracing::info!(username = %payload.username, "login attempt");

    let user = User::find()
        .filter(user::Column::Username.eq(&payload.username))
        .one(&state.db)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    let Some(user) = user else {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    };

    let parsed_hash = PasswordHash::new(&user.password)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    if Argon2::default()
        .verify_password(payload.password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let expiration = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
        + TOKEN_TTL_SECS;

    let claims = Claims {
        sub: user.username,
        exp: expiration,
    };

    let access_token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret().as_ref()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok(Json(LoginResponse {
        access_token,
        expires_in: TOKEN_TTL_SECS,
    }))
}

#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "User profile", body = UserProfile),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Authentication"
)]
pub async fn me(
    State(state): State<AppState>,
    axum::Extension(auth_user): axum::Extension<AuthUser>,
) -> Result<Json<UserProfile>, AppError> {
    let user = User::find()
        .filter(user::Column::Username.eq(&auth_user.username))
        .one(&state.db)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .ok_or_else(|| AppError::Unauthorized("Unauthorized".to_string()))?;

    Ok(Json(UserProfile {
        id: user.id,
        username: user.username,
        created_at: user.created_at,
    }))
}
