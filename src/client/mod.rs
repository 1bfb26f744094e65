//! Client side of the medication form: a per-form draft and the HTTP
//! client that submits it.

pub mod api;
pub mod draft;

pub use api::{ApiClient, DEFAULT_BASE_URL};
pub use draft::{DraftSession, MedicationDraft};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server rejected request ({status}): {message}: {error}")]
    Rejected {
        status: u16,
        message: String,
        error: String,
    },

    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),
}
