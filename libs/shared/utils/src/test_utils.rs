use std::path::PathBuf;

use base64::{Engine as _, engine::general_purpose};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::{json, Value};
use sha2::Sha256;
use tempfile::TempDir;
use uuid::Uuid;

use shared_config::ClientConfig;
use shared_models::{Role, SessionTokens, UserIdentity};

/// Client configuration backed by a throwaway session directory.
///
/// Keep the `TestConfig` alive for as long as the session file is needed.
pub struct TestConfig {
    pub auth_url: String,
    pub doctor_url: String,
    pub user_url: String,
    pub session_dir: TempDir,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            auth_url: "http://localhost:8082".to_string(),
            doctor_url: "http://localhost:8083".to_string(),
            user_url: "http://localhost:8085".to_string(),
            session_dir: TempDir::new().expect("temp dir for session file"),
        }
    }
}

impl TestConfig {
    /// Every backend pointed at the same mock server.
    pub fn with_mock_server(uri: &str) -> Self {
        Self {
            auth_url: uri.to_string(),
            doctor_url: uri.to_string(),
            user_url: uri.to_string(),
            ..Self::default()
        }
    }

    pub fn session_path(&self) -> PathBuf {
        self.session_dir.path().join("session.json")
    }

    pub fn to_client_config(&self) -> ClientConfig {
        ClientConfig::new(
            self.auth_url.clone(),
            self.doctor_url.clone(),
            self.user_url.clone(),
            self.session_path(),
        )
    }
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
}

impl Default for TestUser {
    fn default() -> Self {
        Self::new("test@example.com", Role::User)
    }
}

impl TestUser {
    pub fn new(email: &str, role: Role) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            full_name: "Test User".to_string(),
            role,
        }
    }

    pub fn doctor(email: &str) -> Self {
        Self::new(email, Role::Doctor)
    }

    pub fn patient(email: &str) -> Self {
        Self::new(email, Role::User)
    }

    pub fn admin(email: &str) -> Self {
        Self::new(email, Role::Admin)
    }

    pub fn to_identity(&self) -> UserIdentity {
        UserIdentity {
            user_id: self.id.clone(),
            email: self.email.clone(),
            display_name: self.full_name.clone(),
            role: self.role,
        }
    }

    pub fn tokens(&self) -> SessionTokens {
        SessionTokens {
            access_token: JwtTestUtils::create_test_token(self, JwtTestUtils::SECRET, Some(1)),
            refresh_token: format!("refresh-{}", self.id),
        }
    }
}

/// Mints HS256 tokens shaped like the ones the backends issue.
pub struct JwtTestUtils;

impl JwtTestUtils {
    pub const SECRET: &'static str = "test-secret-key-for-jwt-signing-must-be-long-enough";

    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let payload = json!({
            "sub": user.id,
            "email": user.email,
            "roles": [user.role.as_str()],
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }

    pub fn create_expired_token(user: &TestUser) -> String {
        Self::create_test_token(user, Self::SECRET, Some(-1))
    }
}

/// Canned response bodies for the auth, doctor and user backends.
pub struct MockBackendResponses;

impl MockBackendResponses {
    /// Structured login body from the auth backend.
    pub fn auth_login_response(user: &TestUser, access_token: &str, refresh_token: &str) -> Value {
        json!({
            "accessToken": access_token,
            "refreshToken": refresh_token,
            "tokenType": "Bearer",
            "expiresIn": 3600,
            "userId": user.id,
            "user": {
                "id": user.id,
                "email": user.email,
                "firstName": "Test",
                "lastName": "User",
                "fullName": user.full_name,
                "roles": [user.role.as_str()],
                "isActivated": true
            }
        })
    }

    /// Flat login body from the doctor backend.
    pub fn doctor_login_response(user: &TestUser, access_token: &str, refresh_token: &str) -> Value {
        json!({
            "accessToken": access_token,
            "refreshToken": refresh_token,
            "userId": user.id,
            "email": user.email,
            "fullName": user.full_name
        })
    }

    pub fn error_response(message: &str) -> Value {
        json!({
            "message": message,
            "timestamp": "2024-01-01T00:00:00Z"
        })
    }

    pub fn user_profile_response(user: &TestUser) -> Value {
        json!({
            "id": user.id,
            "email": user.email,
            "firstName": "Test",
            "lastName": "User",
            "fullName": user.full_name,
            "phoneNumber": null,
            "profilePictureUrl": null,
            "roles": [user.role.as_str()],
            "isActivated": true,
            "createdAt": "2024-01-01T00:00:00"
        })
    }

    pub fn doctor_profile_response(user: &TestUser, activated: bool) -> Value {
        json!({
            "id": Uuid::new_v4().to_string(),
            "userId": user.id,
            "email": user.email,
            "firstName": "Test",
            "lastName": "Doctor",
            "fullName": user.full_name,
            "phoneNumber": "+21600000000",
            "medicalLicenseNumber": "MD123456",
            "specialization": "Cardiology",
            "hospitalAffiliation": "Central Hospital",
            "yearsOfExperience": 10,
            "officeAddress": null,
            "consultationHours": "09:00-17:00",
            "isActivated": activated,
            "activationStatus": if activated { "APPROVED" } else { "PENDING" },
            "createdAt": "2024-01-01T00:00:00"
        })
    }

    pub fn activation_status_response(activated: bool, message: &str) -> Value {
        json!({
            "isActivated": activated,
            "message": message
        })
    }

    pub fn appointment_response(appointment_id: &str, doctor_id: &str) -> Value {
        json!({
            "id": appointment_id,
            "patientId": Uuid::new_v4().to_string(),
            "doctorId": doctor_id,
            "doctorName": "Jane Smith",
            "doctorSpecialization": "Cardiology",
            "appointmentDateTime": "2025-11-14T18:30:00",
            "appointmentType": "CONSULTATION",
            "reason": "Chest pain",
            "notes": null,
            "status": "SCHEDULED"
        })
    }

    pub fn available_doctor_response(doctor_id: &str) -> Value {
        json!({
            "id": doctor_id,
            "firstName": "Jane",
            "lastName": "Smith",
            "email": "jane.smith@doctor.clinic.com",
            "specialization": "Cardiology",
            "hospitalAffiliation": "Central Hospital",
            "yearsOfExperience": 12
        })
    }

    /// The `{success, message, data}` envelope used by the user backend.
    pub fn api_response(data: Value) -> Value {
        json!({
            "success": true,
            "message": "OK",
            "data": data
        })
    }
}
