// Front-end side of the customer auth flow: calls the API and keeps the
// resulting session in the tab's storage.

use crate::{
    models::Session,
    services::auth_service::{LoginRequest, LoginResponse, SetPasswordRequest, SetPasswordResponse},
    session::{SessionError, SessionStore, Storage},
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{status}: {message}")]
    Status { status: u16, message: String },
    #[error(transparent)]
    Session(#[from] SessionError),
}

const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

#[derive(Deserialize)]
struct ErrorPayload {
    error: Option<String>,
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub async fn set_password(&self, request: &SetPasswordRequest) -> Result<SetPasswordResponse, ApiError> {
        self.post_json("/api/customer-auth/set-password", request).await
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.post_json("/api/customer-auth/login", request).await
    }

    /// Any non-2xx answer becomes [`ApiError::Status`] carrying the server's
    /// `error` message when there is one.
    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("➡️  POST {}", url);

        let response = self
            .http
            .post(&url)
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorPayload>(&text)
                .ok()
                .and_then(|p| p.error)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());
            log::warn!("❌ POST {} -> {}: {}", url, status, message);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<R>().await?)
    }
}

/// Logs in and stores the returned session, replacing any previous one.
pub async fn login_and_persist<S: Storage>(
    client: &ApiClient,
    store: &SessionStore<S>,
    request: &LoginRequest,
) -> Result<Session, ApiError> {
    let response = client.login(request).await?;
    store.set(&response.user)?;
    log::info!("✅ Session stored for {}", response.user.id);
    Ok(response.user)
}

pub fn logout<S: Storage>(store: &SessionStore<S>) -> Result<(), ApiError> {
    store.clear()?;
    Ok(())
}
