use std::sync::Arc;

use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::RequestBuilder;
use tracing::{debug, warn};

/// Source of the current access token, read once per outgoing request.
pub trait TokenProvider: Send + Sync {
    fn access_token(&self) -> Option<String>;
}

/// Attaches `Authorization: Bearer <token>` to outgoing requests.
///
/// When no token is available the request goes out without credentials and
/// the backend decides. There is no refresh-on-401 here.
#[derive(Clone)]
pub struct AuthInterceptor {
    tokens: Arc<dyn TokenProvider>,
}

impl AuthInterceptor {
    pub fn new(tokens: Arc<dyn TokenProvider>) -> Self {
        Self { tokens }
    }

    pub fn bearer_value(&self) -> Option<HeaderValue> {
        let token = self.tokens.access_token().filter(|t| !t.is_empty())?;

        match HeaderValue::from_str(&format!("Bearer {}", token)) {
            Ok(mut value) => {
                value.set_sensitive(true);
                Some(value)
            }
            Err(_) => {
                warn!("Stored access token is not a valid header value, sending request without it");
                None
            }
        }
    }

    pub fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self.bearer_value() {
            Some(value) => request.header(AUTHORIZATION, value),
            None => {
                debug!("No access token available, sending request without credentials");
                request
            }
        }
    }
}
