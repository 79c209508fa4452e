use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info, warn};

use session_cell::SessionStore;
use shared_http::ServiceRouter;
use shared_models::{BackendTarget, ClientError, NormalizationError, Role, Session, SessionTokens};

use crate::audience::{select_login_target, LoginAudience};
use crate::models::{AuthLoginBody, LoginRequest, RawLoginResult, RegisterRequest};
use crate::normalizer::normalize;

const REGISTER_PATH: &str = "/api/v1/auth/register";
const REFRESH_PATH: &str = "/api/v1/auth/refresh";
const LOGOUT_PATH: &str = "/api/v1/auth/logout";

pub struct AuthService {
    router: Arc<ServiceRouter>,
    sessions: Arc<SessionStore>,
}

impl AuthService {
    pub fn new(router: Arc<ServiceRouter>, sessions: Arc<SessionStore>) -> Self {
        Self { router, sessions }
    }

    /// Logs in and makes the result the active session.
    ///
    /// `audience` picks the backend; without it the email decides. Nothing is
    /// stored unless the backend answers 2xx with a usable body.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        audience: Option<LoginAudience>,
    ) -> Result<Session, ClientError> {
        let email = email.trim().to_lowercase();
        let target = select_login_target(&email, audience);
        let path = target
            .login_path()
            .ok_or(NormalizationError::NoLoginEndpoint(target))?;

        debug!("Logging in {} against the {} backend", email, target);

        let request = LoginRequest {
            email: email.clone(),
            password: password.to_string(),
        };

        let client = self.router.client(target).await?;
        let body = client
            .request_text(Method::POST, path, Some(serde_json::to_value(&request)?))
            .await
            .map_err(ClientError::into_login_error)?;

        let raw = RawLoginResult::decode(target, &body)?;
        let session = normalize(target, raw)?;

        let (tokens, identity) = session.into_parts();
        let saved = self.sessions.save_session(tokens, identity)?;

        info!("Login succeeded for {} as {}", saved.email, saved.role);
        Ok(saved)
    }

    /// Creates a patient account on the auth backend. Does not log in.
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthLoginBody, ClientError> {
        debug!("Registering new account for: {}", request.email);

        let client = self.router.client(BackendTarget::Auth).await?;
        let body: AuthLoginBody = client
            .request(Method::POST, REGISTER_PATH, Some(serde_json::to_value(&request)?))
            .await?;

        info!("Account registered for {}", request.email);
        Ok(body)
    }

    /// Exchanges the stored refresh token for a new token pair.
    ///
    /// Never called automatically; a 401 elsewhere is surfaced as is.
    pub async fn refresh_tokens(&self) -> Result<Session, ClientError> {
        let refresh_token = self
            .sessions
            .get_refresh_token()
            .ok_or(ClientError::NotAuthenticated)?;

        let client = self.router.client(BackendTarget::Auth).await?;
        let body: AuthLoginBody = client
            .request(Method::POST, REFRESH_PATH, Some(Value::String(refresh_token.clone())))
            .await?;

        let access_token = body
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| NormalizationError::MissingFields("accessToken".to_string()))?;
        let refresh_token = body
            .refresh_token
            .filter(|t| !t.is_empty())
            .unwrap_or(refresh_token);

        let session = self.sessions.update_tokens(SessionTokens {
            access_token,
            refresh_token,
        })?;

        info!("Tokens refreshed for {}", session.email);
        Ok(session)
    }

    /// Ends the session.
    ///
    /// The local session is cleared even when the backend call fails; the
    /// backend result is still returned. Doctor sessions are only cleared
    /// locally since the doctor backend has no logout endpoint.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let remote = match (self.sessions.current_role(), self.sessions.get_refresh_token()) {
            (Some(role), Some(refresh_token)) if role != Role::Doctor => {
                self.revoke_refresh_token(refresh_token).await
            }
            _ => Ok(()),
        };

        if let Err(e) = &remote {
            warn!("Backend logout failed, clearing local session anyway: {}", e);
        }

        self.sessions.clear_session()?;
        info!("Logged out");
        remote
    }

    async fn revoke_refresh_token(&self, refresh_token: String) -> Result<(), ClientError> {
        let client = self.router.client(BackendTarget::Auth).await?;
        client
            .request_empty(Method::POST, LOGOUT_PATH, Some(Value::String(refresh_token)))
            .await
    }
}
