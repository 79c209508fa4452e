use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use shared_models::{BackendEndpoint, BackendTarget};

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub auth_service_url: String,
    pub doctor_service_url: String,
    pub user_service_url: String,
    pub session_file: PathBuf,
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let config = Self {
            auth_service_url: env::var("AUTH_SERVICE_URL")
                .unwrap_or_else(|_| {
                    warn!("AUTH_SERVICE_URL not set, using default");
                    "http://localhost:8082".to_string()
                }),
            doctor_service_url: env::var("DOCTOR_SERVICE_URL")
                .unwrap_or_else(|_| {
                    warn!("DOCTOR_SERVICE_URL not set, using default");
                    "http://localhost:8083".to_string()
                }),
            user_service_url: env::var("USER_SERVICE_URL")
                .unwrap_or_else(|_| {
                    warn!("USER_SERVICE_URL not set, using default");
                    "http://localhost:8085".to_string()
                }),
            session_file: env::var("SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".amae-clinic/session.json")),
            request_timeout: parse_timeout(env::var("REQUEST_TIMEOUT_SECS").ok().as_deref()),
        };

        if !config.is_configured() {
            warn!("Client not fully configured - backend URLs are empty");
        }

        config
    }

    /// Config pointing every backend at explicit URLs; used by tests and embedders.
    pub fn new(
        auth_service_url: impl Into<String>,
        doctor_service_url: impl Into<String>,
        user_service_url: impl Into<String>,
        session_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            auth_service_url: auth_service_url.into(),
            doctor_service_url: doctor_service_url.into(),
            user_service_url: user_service_url.into(),
            session_file: session_file.into(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn base_url(&self, target: BackendTarget) -> &str {
        match target {
            BackendTarget::Auth => &self.auth_service_url,
            BackendTarget::Doctor => &self.doctor_service_url,
            BackendTarget::User => &self.user_service_url,
        }
    }

    pub fn endpoint(&self, target: BackendTarget) -> BackendEndpoint {
        BackendEndpoint::new(target, self.base_url(target))
    }

    pub fn is_configured(&self) -> bool {
        BackendTarget::ALL.iter().all(|t| !self.base_url(*t).is_empty())
    }
}

fn parse_timeout(raw: Option<&str>) -> Duration {
    match raw {
        None => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        Some(value) => match value.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                warn!("REQUEST_TIMEOUT_SECS={} is not a positive integer, using default", value);
                Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
            }
        },
    }
}
