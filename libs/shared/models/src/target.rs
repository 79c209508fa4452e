use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the independently addressable backend services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendTarget {
    Auth,
    Doctor,
    User,
}

impl BackendTarget {
    pub const ALL: [BackendTarget; 3] = [BackendTarget::Auth, BackendTarget::Doctor, BackendTarget::User];

    pub fn name(&self) -> &'static str {
        match self {
            BackendTarget::Auth => "auth",
            BackendTarget::Doctor => "doctor",
            BackendTarget::User => "user",
        }
    }

    /// Login path on this backend, if it exposes one.
    pub fn login_path(&self) -> Option<&'static str> {
        match self {
            BackendTarget::Auth => Some("/api/v1/auth/login"),
            BackendTarget::Doctor => Some("/api/doctors/login"),
            BackendTarget::User => None,
        }
    }
}

impl fmt::Display for BackendTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A target bound to its base URL. Fixed for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendEndpoint {
    pub target: BackendTarget,
    pub base_url: String,
}

impl BackendEndpoint {
    pub fn new(target: BackendTarget, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { target, base_url }
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}
