//! Typed endpoints for the authentication API group.

use crate::config::ApiConfig;
use crate::model::{AuthResponse, Credentials, RegisterRequest, UserProfile};

use super::{join_url, ApiClient, ApiError};

pub struct AuthApi {
    client: ApiClient,
    base: String,
}

impl AuthApi {
    /// Anonymous client for login and signup.
    pub fn anonymous(config: &ApiConfig) -> Result<Self, ApiError> {
        Ok(Self {
            client: ApiClient::anonymous(config)?,
            base: config.auth_base_url.clone(),
        })
    }

    /// Client bound to an explicit token. Used between obtaining a token and
    /// persisting the session, when the store does not hold it yet.
    pub fn with_token(config: &ApiConfig, token: &str) -> Result<Self, ApiError> {
        Ok(Self {
            client: ApiClient::with_token(config, token)?,
            base: config.auth_base_url.clone(),
        })
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        self.client
            .post(&join_url(&self.base, "auth/login"), credentials)
            .await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.client
            .post(&join_url(&self.base, "auth/signup"), request)
            .await
    }

    /// Fetch the authenticated account's profile. The backend answers with a
    /// JSON `null` when the token resolves to no profile row.
    pub async fn me(&self) -> Result<Option<UserProfile>, ApiError> {
        self.client.get(&join_url(&self.base, "auth/me")).await
    }
}
