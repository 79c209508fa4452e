use shared_models::{BackendTarget, NormalizationError, Role, Session, SessionTokens, UserIdentity};

use crate::models::{AuthLoginBody, DoctorLoginBody, RawLoginResult};

impl RawLoginResult {
    /// Decodes a 2xx login body into the shape `target` is known to send.
    pub fn decode(target: BackendTarget, body: &str) -> Result<Self, NormalizationError> {
        match target {
            BackendTarget::Auth => serde_json::from_str::<AuthLoginBody>(body)
                .map(RawLoginResult::Structured)
                .map_err(|e| NormalizationError::MissingFields(format!("auth login body: {}", e))),
            BackendTarget::Doctor => serde_json::from_str::<DoctorLoginBody>(body)
                .map(RawLoginResult::Flat)
                .map_err(|e| NormalizationError::MissingFields(format!("doctor login body: {}", e))),
            BackendTarget::User => Err(NormalizationError::NoLoginEndpoint(target)),
        }
    }
}

/// Turns a backend-specific login body into the canonical session.
pub fn normalize(target: BackendTarget, raw: RawLoginResult) -> Result<Session, NormalizationError> {
    match (target, raw) {
        (BackendTarget::Auth, RawLoginResult::Structured(body)) => normalize_structured(body),
        (BackendTarget::Doctor, RawLoginResult::Flat(body)) => normalize_flat(body),
        (BackendTarget::User, _) => Err(NormalizationError::NoLoginEndpoint(target)),
        (target, _) => Err(NormalizationError::MissingFields(format!("{} login body", target))),
    }
}

fn normalize_structured(body: AuthLoginBody) -> Result<Session, NormalizationError> {
    let access_token = non_empty(body.access_token)
        .ok_or_else(|| NormalizationError::MissingFields("accessToken".to_string()))?;
    let user = body
        .user
        .ok_or_else(|| NormalizationError::MissingFields("user".to_string()))?;
    let email = non_empty(user.email)
        .ok_or_else(|| NormalizationError::MissingFields("user.email".to_string()))?;

    let role = match user.roles.as_deref().and_then(<[String]>::first) {
        Some(primary) => primary.parse::<Role>()?,
        None => Role::User,
    };

    let user_id = non_empty(body.user_id)
        .or_else(|| non_empty(user.id))
        .unwrap_or_else(|| email.clone());

    let display_name = non_empty(user.full_name).unwrap_or_else(|| {
        [user.first_name, user.last_name]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    });

    Ok(Session::new(
        SessionTokens {
            access_token,
            refresh_token: body.refresh_token.unwrap_or_default(),
        },
        UserIdentity {
            user_id,
            email,
            display_name,
            role,
        },
    ))
}

fn normalize_flat(body: DoctorLoginBody) -> Result<Session, NormalizationError> {
    let mut missing = Vec::new();
    if body.access_token.is_empty() {
        missing.push("accessToken");
    }
    if body.email.is_empty() {
        missing.push("email");
    }
    if !missing.is_empty() {
        return Err(NormalizationError::MissingFields(missing.join(", ")));
    }

    let user_id = if body.user_id.is_empty() {
        body.email.clone()
    } else {
        body.user_id
    };

    Ok(Session::new(
        SessionTokens {
            access_token: body.access_token,
            refresh_token: body.refresh_token,
        },
        UserIdentity {
            user_id,
            email: body.email,
            display_name: body.full_name,
            // the doctor backend never sends a role
            role: Role::Doctor,
        },
    ))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
