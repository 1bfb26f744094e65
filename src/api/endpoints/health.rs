//! Liveness route.

use crate::config::LIVENESS_MESSAGE;

/// `GET /` answers even when the store is unusable.
pub async fn liveness() -> &'static str {
    LIVENESS_MESSAGE
}
