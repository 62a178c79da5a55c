//! Authentication HTTP Handlers
//!
//! Signup, login and current-user endpoints. Passwords are hashed with
//! bcrypt and never returned; sessions are JWT bearer tokens.

use axum::{extract::State, http::HeaderMap, Json};
use bcrypt::{hash, verify, DEFAULT_COST};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::extract::require_identity;
use crate::auth::sessions::create_token;
use crate::auth::users::UserStore;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// POST /api/auth/signup
pub async fn signup(
    State(users): State<UserStore>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    if request.name.trim().is_empty() || request.email.trim().is_empty() || request.password.is_empty()
    {
        return Err(ApiError::invalid("name, email and password required"));
    }
    if !request.email.contains('@') {
        return Err(ApiError::invalid("invalid email format"));
    }

    if users.get_by_email(&request.email).await?.is_some() {
        return Err(ApiError::conflict("email already in use"));
    }

    let password_hash = hash(&request.password, DEFAULT_COST).map_err(|e| {
        tracing::error!("password hashing failed: {:?}", e);
        ApiError::invalid("password could not be processed")
    })?;

    let user = users
        .create(request.name.trim(), request.email.trim(), &password_hash)
        .await?;
    tracing::info!("user {} signed up", user.id);

    let token = create_token(user.id, &user.email, &user.name).map_err(|e| {
        tracing::error!("token generation failed: {:?}", e);
        ApiError::Forbidden
    })?;

    Ok(Json(AuthResponse {
        token,
        user: UserResponse {
            id: user.id,
            name: user.name,
            email: user.email,
        },
    }))
}

/// POST /api/auth/login
pub async fn login(
    State(users): State<UserStore>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    if request.email.is_empty() || request.password.is_empty() {
        return Err(ApiError::invalid("email and password required"));
    }

    // Same denial for unknown email and wrong password.
    let user = users
        .get_by_email(&request.email)
        .await?
        .ok_or(ApiError::Forbidden)?;

    let ok = verify(&request.password, &user.password_hash).map_err(|e| {
        tracing::error!("password verification failed: {:?}", e);
        ApiError::Forbidden
    })?;
    if !ok {
        return Err(ApiError::Forbidden);
    }

    let token = create_token(user.id, &user.email, &user.name).map_err(|e| {
        tracing::error!("token generation failed: {:?}", e);
        ApiError::Forbidden
    })?;

    Ok(Json(AuthResponse {
        token,
        user: UserResponse {
            id: user.id,
            name: user.name,
            email: user.email,
        },
    }))
}

/// GET /api/auth/me
pub async fn me(
    State(users): State<UserStore>,
    headers: HeaderMap,
) -> Result<Json<UserResponse>, ApiError> {
    let identity = require_identity(&headers)?;
    let user = users
        .get(identity.user_id)
        .await?
        .ok_or(ApiError::NotFound("user"))?;
    Ok(Json(UserResponse {
        id: user.id,
        name: user.name,
        email: user.email,
    }))
}
