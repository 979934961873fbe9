//! Login, registration, and session lifecycle orchestration.
//!
//! Both entry points funnel into the same tail: obtain a token, fetch the
//! profile with that token directly (the store does not hold it yet),
//! validate the role, persist the whole session. Any failure after local
//! validation clears the store, so a token is never left behind without the
//! role that was checked alongside it.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::{ApiError, AuthApi};
use crate::config::ApiConfig;
use crate::model::{Credentials, RegisterRequest, Role, UserProfile};
use crate::session::{Session, SessionStore};

use super::validation;

pub struct AuthFlow {
    config: ApiConfig,
    session: Arc<SessionStore>,
}

impl AuthFlow {
    pub fn new(config: ApiConfig, session: Arc<SessionStore>) -> Self {
        Self { config, session }
    }

    /// Authenticate and persist a full session. The returned session's role
    /// selects the home surface to land on.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        if email.trim().is_empty() || password.trim().is_empty() {
            return Err(ApiError::validation("Email and password are required"));
        }

        let email = email.trim().to_string();
        let result = self.login_inner(&email, password).await;
        if result.is_err() {
            self.discard_session();
        }
        result
    }

    async fn login_inner(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let api = AuthApi::anonymous(&self.config)?;
        debug!("Requesting login token for {}", email);
        let auth = api
            .login(&Credentials {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;
        self.establish_session(&auth.auth_token, email).await
    }

    /// Create an account, then establish the session exactly like a login:
    /// the role always comes from the fetched profile, never from an
    /// assumption about what signups get.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, ApiError> {
        validation::validate_name(name).map_err(ApiError::Validation)?;
        validation::validate_email(email).map_err(ApiError::Validation)?;
        validation::validate_new_password(password).map_err(ApiError::Validation)?;

        let email = email.trim().to_string();
        let result = self.register_inner(name.trim(), &email, password).await;
        if result.is_err() {
            self.discard_session();
        }
        result
    }

    async fn register_inner(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, ApiError> {
        let api = AuthApi::anonymous(&self.config)?;
        debug!("Creating account for {}", email);
        let auth = api
            .register(&RegisterRequest {
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;
        self.establish_session(&auth.auth_token, email).await
    }

    /// Fetch the profile with the fresh token, validate the role, persist.
    async fn establish_session(&self, token: &str, email: &str) -> Result<Session, ApiError> {
        let api = AuthApi::with_token(&self.config, token)?;
        let profile = api.me().await?.ok_or(ApiError::MissingRole)?;
        let role = validated_role(&profile)?;

        let session = Session {
            token: token.to_string(),
            name: non_blank(profile.name).unwrap_or_else(|| email.to_string()),
            email: non_blank(profile.email).unwrap_or_else(|| email.to_string()),
            role,
        };
        self.session.save(session.clone())?;
        info!("Session established for {} ({})", session.email, session.role);
        Ok(session)
    }

    /// Resume a previously persisted session without touching the network.
    /// The store only ever holds complete sessions, so presence is enough.
    pub fn resume(&self) -> Option<Session> {
        self.session.session()
    }

    /// Drop the stored session. Safe to call when none exists.
    pub fn logout(&self) -> Result<(), ApiError> {
        info!("Clearing stored session");
        self.session.clear()
    }

    fn discard_session(&self) {
        if let Err(err) = self.session.clear() {
            warn!("Failed to clear session after auth failure: {}", err);
        }
    }
}

fn validated_role(profile: &UserProfile) -> Result<Role, ApiError> {
    let value = profile.role.as_deref().map(str::trim).unwrap_or("");
    if value.is_empty() {
        return Err(ApiError::MissingRole);
    }
    value.parse()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
