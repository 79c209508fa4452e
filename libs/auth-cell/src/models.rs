use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// Login/refresh/register body of the auth backend.
///
/// Every field is optional so that a body missing pieces still decodes and
/// the normalizer can say exactly what is missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthLoginBody {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user: Option<AuthUserBody>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUserBody {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    /// Ordered; the first entry is the primary role.
    #[serde(default)]
    pub roles: Option<Vec<String>>,
}

/// Flat login body of the doctor backend. It carries no role.
///
/// Values that are absent or not strings read as empty strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorLoginBody {
    #[serde(default, deserialize_with = "lenient_string")]
    pub access_token: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub refresh_token: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub user_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub full_name: String,
}

/// The two login response shapes, tagged by where they came from.
#[derive(Debug, Clone)]
pub enum RawLoginResult {
    Structured(AuthLoginBody),
    Flat(DoctorLoginBody),
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        _ => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_doctor_body_tolerates_non_string_values() {
        let body: DoctorLoginBody = serde_json::from_value(json!({
            "accessToken": "t1",
            "userId": 42,
            "email": null,
            "fullName": "A B"
        }))
        .unwrap();

        assert_eq!(body.access_token, "t1");
        assert_eq!(body.user_id, "");
        assert_eq!(body.email, "");
        assert_eq!(body.refresh_token, "");
        assert_eq!(body.full_name, "A B");
    }

    #[test]
    fn test_register_request_omits_missing_phone() {
        let request = RegisterRequest {
            email: "a@b.com".to_string(),
            password: "secret1".to_string(),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            phone_number: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["firstName"], "A");
        assert!(json.get("phoneNumber").is_none());
    }
}
