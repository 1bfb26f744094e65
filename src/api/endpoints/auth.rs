//! Account endpoints.
//!
//! - `POST /api/auth/signup`: create an account
//! - `POST /api/auth/login`: check credentials
//!
//! Login only verifies the password; no session or token is issued.

use std::sync::LazyLock;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use regex::Regex;
use zeroize::Zeroize;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ApiResponse, LoginRequest, SignupRequest};
use crate::crypto::{hash_password, verify_password};
use crate::db::{create_user, get_user_by_email};
use crate::models::{NewUserAccount, PublicUser};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// `POST /api/auth/signup`
pub async fn signup(
    State(ctx): State<ApiContext>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<PublicUser>>), ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let name = req.name.trim().to_string();
    let email = req.email.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::BadRequest("name is required".into()));
    }
    if !EMAIL_RE.is_match(&email) {
        return Err(ApiError::BadRequest("email is not valid".into()));
    }
    if req.password.trim().is_empty() {
        return Err(ApiError::BadRequest("password is required".into()));
    }

    let iterations = ctx.password_iterations;
    let mut password = req.password;
    let password_hash = tokio::task::spawn_blocking(move || {
        let hash = hash_password(&password, iterations);
        password.zeroize();
        hash
    })
    .await
    .map_err(|e| ApiError::internal("Server error while creating account", e))?;

    let new_user = NewUserAccount {
        name,
        email,
        password_hash,
        time_zone: req.time_zone.filter(|tz| !tz.trim().is_empty()),
    };

    let user = ctx.store.with_conn(|conn| create_user(conn, new_user))?;
    tracing::info!(user_id = %user.id, "Account created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Account created successfully", user.into())),
    ))
}

/// `POST /api/auth/login`
pub async fn login(
    State(ctx): State<ApiContext>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<PublicUser>>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let email = req.email.trim().to_string();

    let user = ctx
        .store
        .with_conn(|conn| get_user_by_email(conn, &email))?
        .ok_or(ApiError::Unauthorized)?;

    let encoded = user.password_hash.clone();
    let mut password = req.password;
    let matches = tokio::task::spawn_blocking(move || {
        let result = verify_password(&password, &encoded);
        password.zeroize();
        result
    })
    .await
    .map_err(|e| ApiError::internal("Server error while checking credentials", e))??;

    if !matches {
        tracing::debug!(user_id = %user.id, "Login rejected: wrong password");
        return Err(ApiError::Unauthorized);
    }

    Ok(Json(ApiResponse::ok("Login successful", user.into())))
}
