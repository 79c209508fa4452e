use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::NormalizationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Doctor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Doctor => "DOCTOR",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = NormalizationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USER" => Ok(Role::User),
            "DOCTOR" => Ok(Role::Doctor),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(NormalizationError::UnsupportedRole(s.to_string())),
        }
    }
}

/// Access/refresh token pair issued by a login or refresh call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Who the tokens belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub user_id: String,
    pub email: String,
    pub display_name: String,
    pub role: Role,
}

/// The locally persisted record of who is logged in on this device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub user_id: String,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub saved_at: DateTime<Utc>,
}

impl Session {
    pub fn new(tokens: SessionTokens, identity: UserIdentity) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            user_id: identity.user_id,
            email: identity.email,
            display_name: identity.display_name,
            role: identity.role,
            saved_at: Utc::now(),
        }
    }

    pub fn tokens(&self) -> SessionTokens {
        SessionTokens {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
        }
    }

    pub fn identity(&self) -> UserIdentity {
        UserIdentity {
            user_id: self.user_id.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            role: self.role,
        }
    }

    pub fn into_parts(self) -> (SessionTokens, UserIdentity) {
        let tokens = self.tokens();
        let identity = self.identity();
        (tokens, identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn sample_session() -> Session {
        Session::new(
            SessionTokens {
                access_token: "access".to_string(),
                refresh_token: "refresh".to_string(),
            },
            UserIdentity {
                user_id: "u1".to_string(),
                email: "a@b.com".to_string(),
                display_name: "A B".to_string(),
                role: Role::Doctor,
            },
        )
    }

    #[test]
    fn test_role_parsing_is_case_insensitive() {
        assert_eq!("USER".parse::<Role>().unwrap(), Role::User);
        assert_eq!("doctor".parse::<Role>().unwrap(), Role::Doctor);
        assert_eq!(" Admin ".parse::<Role>().unwrap(), Role::Admin);
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        assert_matches!(
            "NURSE".parse::<Role>(),
            Err(NormalizationError::UnsupportedRole(role)) if role == "NURSE"
        );
    }

    #[test]
    fn test_session_serializes_camel_case() {
        let json = serde_json::to_value(sample_session()).unwrap();

        assert_eq!(json["accessToken"], "access");
        assert_eq!(json["displayName"], "A B");
        assert_eq!(json["role"], "DOCTOR");
        assert!(json.get("savedAt").is_some());
    }

    #[test]
    fn test_into_parts_keeps_every_field() {
        let session = sample_session();
        let (tokens, identity) = session.clone().into_parts();
        let rebuilt = Session::new(tokens, identity);

        assert_eq!(rebuilt.access_token, session.access_token);
        assert_eq!(rebuilt.refresh_token, session.refresh_token);
        assert_eq!(rebuilt.identity(), session.identity());
    }
}
