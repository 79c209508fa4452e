use std::fmt;
use std::str::FromStr;

use tracing::debug;

use shared_models::BackendTarget;

/// Marker that doctor accounts carry in their email domain.
pub const DOCTOR_EMAIL_MARKER: &str = "@doctor.";

/// Which portal a login attempt is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginAudience {
    Patient,
    Doctor,
}

impl LoginAudience {
    /// Guesses the audience from an email address.
    ///
    /// Only a fallback for callers that cannot say which portal they are in.
    pub fn infer_from_email(email: &str) -> Self {
        if email.to_lowercase().contains(DOCTOR_EMAIL_MARKER) {
            LoginAudience::Doctor
        } else {
            LoginAudience::Patient
        }
    }

    pub fn login_target(&self) -> BackendTarget {
        match self {
            LoginAudience::Patient => BackendTarget::Auth,
            LoginAudience::Doctor => BackendTarget::Doctor,
        }
    }
}

impl fmt::Display for LoginAudience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginAudience::Patient => f.write_str("patient"),
            LoginAudience::Doctor => f.write_str("doctor"),
        }
    }
}

impl FromStr for LoginAudience {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "patient" | "user" => Ok(LoginAudience::Patient),
            "doctor" => Ok(LoginAudience::Doctor),
            other => Err(format!("unknown login audience: {}", other)),
        }
    }
}

/// Backend to log in against: the explicit audience when given, the email heuristic otherwise.
pub fn select_login_target(email: &str, audience: Option<LoginAudience>) -> BackendTarget {
    let audience = match audience {
        Some(audience) => audience,
        None => {
            let inferred = LoginAudience::infer_from_email(email);
            debug!("No login audience given, inferred {} from email", inferred);
            inferred
        }
    };

    audience.login_target()
}
