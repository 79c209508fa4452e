use thiserror::Error;

use crate::target::BackendTarget;

/// A 2xx response whose body does not have the expected shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizationError {
    #[error("Missing fields in response: {0}")]
    MissingFields(String),

    #[error("Unsupported role: {0}")]
    UnsupportedRole(String),

    #[error("No login endpoint on the {0} backend")]
    NoLoginEndpoint(BackendTarget),
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Account pending activation ({status}): {message}")]
    PendingActivation { status: u16, message: String },

    #[error("Backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Normalization(#[from] NormalizationError),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Session storage error: {0}")]
    Storage(String),
}

impl ClientError {
    pub fn from_backend(status: u16, message: String) -> Self {
        ClientError::Backend { status, message }
    }

    /// Re-reads a rejected login: a message mentioning "pending" or
    /// "not activated" means the credentials were fine but the account is not
    /// active yet. Only meaningful for responses from a login endpoint.
    pub fn into_login_error(self) -> Self {
        match self {
            ClientError::Backend { status, message } => {
                let lowered = message.to_lowercase();
                if lowered.contains("pending") || lowered.contains("not activated") {
                    ClientError::PendingActivation { status, message }
                } else {
                    ClientError::Backend { status, message }
                }
            }
            other => other,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::PendingActivation { status, .. } | ClientError::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }

    /// Text suitable for showing to the person using the app.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Network(_) => {
                "Unable to reach the server. Check your connection and try again.".to_string()
            }
            ClientError::PendingActivation { .. } => {
                "Your account is awaiting activation by an administrator.".to_string()
            }
            ClientError::Backend { message, .. } => message.clone(),
            ClientError::Normalization(_) => {
                "The server sent a response that could not be read.".to_string()
            }
            ClientError::NotAuthenticated => "Please sign in again.".to_string(),
            ClientError::Configuration(_) | ClientError::Storage(_) => {
                "Something went wrong on this device. Please try again.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return ClientError::Normalization(NormalizationError::MissingFields(err.to_string()));
        }
        ClientError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Normalization(NormalizationError::MissingFields(err.to_string()))
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Storage(err.to_string())
    }
}
