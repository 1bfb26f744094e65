use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::ClientError;
use crate::api::{ApiResponse, ErrorBody, LoginRequest, SignupRequest};
use crate::models::{MedicationRecord, PublicUser};

/// Where a locally started server listens by default (`PORT` unset).
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client for the MedRemind API.
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Server on this machine at the default port.
    pub fn default_local() -> Result<Self, ClientError> {
        Self::new(DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /api/medicine/add`
    pub async fn add_medication<T: Serialize + ?Sized>(
        &self,
        medication: &T,
    ) -> Result<MedicationRecord, ClientError> {
        self.post_json("/api/medicine/add", medication).await
    }

    /// `POST /api/auth/signup`
    pub async fn signup(&self, request: &SignupRequest) -> Result<PublicUser, ClientError> {
        self.post_json("/api/auth/signup", request).await
    }

    /// `POST /api/auth/login`
    pub async fn login(&self, request: &LoginRequest) -> Result<PublicUser, ClientError> {
        self.post_json("/api/auth/login", request).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if status.is_success() {
            let envelope: ApiResponse<T> = serde_json::from_slice(&bytes)
                .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
            return Ok(envelope.data);
        }

        match serde_json::from_slice::<ErrorBody>(&bytes) {
            Ok(body) => Err(ClientError::Rejected {
                status: status.as_u16(),
                message: body.message,
                error: body.error,
            }),
            Err(_) => Err(ClientError::Rejected {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string(),
                error: String::from_utf8_lossy(&bytes).into_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::{Ipv4Addr, SocketAddr};
    use std::sync::Arc;

    use super::*;
    use crate::api::{start_server_on, ApiContext, ServerHandle};
    use crate::config::DEFAULT_ALLOWED_ORIGIN;
    use crate::db::DocumentStore;

    async fn test_server() -> (ServerHandle, ApiContext) {
        let store = DocumentStore::open_in_memory().unwrap();
        let ctx = ApiContext::with_iterations(Arc::new(store), 1_000);
        let server = start_server_on(
            ctx.clone(),
            DEFAULT_ALLOWED_ORIGIN,
            SocketAddr::from((Ipv4Addr::LOCALHOST, 0)),
        )
        .await
        .unwrap();
        (server, ctx)
    }

    #[test]
    fn base_url_is_normalized() {
        let client = ApiClient::new("http://localhost:8080/", 5).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(ApiClient::default_local().unwrap().base_url(), DEFAULT_BASE_URL);
    }

    #[tokio::test]
    async fn signup_then_login() {
        let (server, _ctx) = test_server().await;
        let client = ApiClient::new(&server.base_url(), 5).unwrap();

        let created = client
            .signup(&SignupRequest {
                name: "Ama".into(),
                email: "ama@example.com".into(),
                password: "s3cret pass".into(),
                time_zone: Some("Africa/Accra".into()),
            })
            .await
            .unwrap();
        assert_eq!(created.time_zone, "Africa/Accra");

        let logged_in = client
            .login(&LoginRequest {
                email: "ama@example.com".into(),
                password: "s3cret pass".into(),
            })
            .await
            .unwrap();
        assert_eq!(logged_in.id, created.id);
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let (server, _ctx) = test_server().await;
        let client = ApiClient::new(&server.base_url(), 5).unwrap();

        client
            .signup(&SignupRequest {
                name: "Ama".into(),
                email: "ama@example.com".into(),
                password: "s3cret pass".into(),
                time_zone: None,
            })
            .await
            .unwrap();

        let err = client
            .login(&LoginRequest {
                email: "ama@example.com".into(),
                password: "nope".into(),
            })
            .await
            .unwrap_err();
        match err {
            ClientError::Rejected { status, .. } => assert_eq!(status, 401),
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_route_is_rejected_without_envelope() {
        let (server, _ctx) = test_server().await;
        let client = ApiClient::new(&server.base_url(), 5).unwrap();

        let err = client
            .post_json::<_, serde_json::Value>("/api/nothing-here", &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Rejected { status: 404, .. }));
    }
}
