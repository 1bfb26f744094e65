//! HTTP API.
//!
//! Routes are composed by `app_router()`; `server` binds and serves it.
//! Every JSON reply uses the `{ success, message, data | error }` envelope.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use error::{ApiError, ErrorBody};
pub use router::app_router;
pub use server::{serve, start_server_on, ServerError, ServerHandle};
pub use types::{ApiContext, ApiResponse, LoginRequest, SignupRequest};
