//! Shared types for the HTTP API: request context and JSON envelopes.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::crypto::PBKDF2_ITERATIONS;
use crate::db::DocumentStore;

/// Shared context for all routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub store: Arc<DocumentStore>,
    /// PBKDF2 rounds for new password hashes.
    pub password_iterations: u32,
}

impl ApiContext {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self::with_iterations(store, PBKDF2_ITERATIONS)
    }

    pub fn with_iterations(store: Arc<DocumentStore>, password_iterations: u32) -> Self {
        Self {
            store,
            password_iterations,
        }
    }
}

/// Success envelope: `{ success: true, message, data }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}

/// `POST /api/auth/signup` body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

/// `POST /api/auth/login` body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}
