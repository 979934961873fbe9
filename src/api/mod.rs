//! HTTP gateway for the storefront backend.
//!
//! Wraps a shared `reqwest::Client` with the three authorization modes the
//! backend's clients need: anonymous (login, signup), session-bound (the
//! bearer token is read from the session store fresh on every request), and
//! fixed-token (for the window between obtaining a token and persisting the
//! session). Non-2xx responses are classified into [`ApiError`] variants,
//! honoring the backend's `{"message": ...}` error body convention.

use std::sync::Arc;
use std::time::Duration;

use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::ApiConfig;
use crate::session::SessionStore;

pub mod auth;
pub mod error;
pub mod store;

pub use auth::AuthApi;
pub use error::ApiError;
pub use store::StoreApi;

/// Where the Authorization header comes from.
enum BearerSource {
    /// No Authorization header
    None,
    /// Read the session store on every request, never caching the token
    Session(Arc<SessionStore>),
    /// A token handed over directly, bypassing the store
    Fixed(String),
}

/// Shared HTTP plumbing behind the typed endpoint wrappers.
pub struct ApiClient {
    http: Client,
    bearer: BearerSource,
    log_bodies: bool,
}

impl ApiClient {
    fn build(config: &ApiConfig, bearer: BearerSource) -> Result<Self, ApiError> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(config.timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            bearer,
            log_bodies: config.log_bodies,
        })
    }

    /// Client without an Authorization header.
    pub fn anonymous(config: &ApiConfig) -> Result<Self, ApiError> {
        Self::build(config, BearerSource::None)
    }

    /// Client that injects `Authorization: Bearer <token>` from the session
    /// store, reading the token fresh on every request.
    pub fn with_session(config: &ApiConfig, session: Arc<SessionStore>) -> Result<Self, ApiError> {
        Self::build(config, BearerSource::Session(session))
    }

    /// Client bound to an explicit token value.
    pub fn with_token(config: &ApiConfig, token: impl Into<String>) -> Result<Self, ApiError> {
        Self::build(config, BearerSource::Fixed(token.into()))
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let mut builder = self.http.request(method, url);
        let token = match &self.bearer {
            BearerSource::None => None,
            BearerSource::Session(store) => store.token(),
            BearerSource::Fixed(token) => Some(token.clone()),
        };
        if let Some(token) = token {
            builder = builder.header(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", token),
            );
        }
        builder
    }

    /// Send the request, surface non-2xx responses as errors, and hand back
    /// the raw body.
    async fn send_raw(&self, builder: RequestBuilder) -> Result<String, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if self.log_bodies {
            debug!("Response {}: {}", status, body);
        }
        if !status.is_success() {
            return Err(ApiError::from_response(status.as_u16(), &body));
        }
        Ok(body)
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send_raw(builder).await?;
        serde_json::from_str(&body).map_err(|err| ApiError::Decode(err.to_string()))
    }

    fn log_request_body<B: Serialize>(&self, body: &B) {
        if self.log_bodies {
            if let Ok(json) = serde_json::to_string(body) {
                debug!("Request body: {}", json);
            }
        }
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        debug!("GET {}", url);
        self.send(self.request(Method::GET, url)).await
    }

    pub(crate) async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        debug!("POST {}", url);
        self.log_request_body(body);
        self.send(self.request(Method::POST, url).json(body)).await
    }

    /// POST where the response body is irrelevant.
    pub(crate) async fn post_unit<B: Serialize>(&self, url: &str, body: &B) -> Result<(), ApiError> {
        debug!("POST {}", url);
        self.log_request_body(body);
        self.send_raw(self.request(Method::POST, url).json(body))
            .await
            .map(drop)
    }

    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        url: &str,
        form: Form,
    ) -> Result<T, ApiError> {
        debug!("POST {} (multipart)", url);
        self.send(self.request(Method::POST, url).multipart(form))
            .await
    }

    pub(crate) async fn patch<B: Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        debug!("PATCH {}", url);
        self.log_request_body(body);
        self.send(self.request(Method::PATCH, url).json(body)).await
    }

    pub(crate) async fn delete(&self, url: &str) -> Result<(), ApiError> {
        debug!("DELETE {}", url);
        self.send_raw(self.request(Method::DELETE, url))
            .await
            .map(drop)
    }
}

/// Join a configured base URL and an endpoint path without doubling slashes.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
