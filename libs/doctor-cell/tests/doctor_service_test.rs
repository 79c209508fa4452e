use std::sync::Arc;

use assert_matches::assert_matches;
use serde_json::json;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{body_json, header, method, path};

use doctor_cell::{DoctorRegisterRequest, DoctorService, UpdateDoctorProfileRequest};
use session_cell::SessionStore;
use shared_http::ServiceRouter;
use shared_models::ClientError;
use shared_utils::test_utils::{MockBackendResponses, TestConfig, TestUser};

struct TestContext {
    _config: TestConfig,
    sessions: Arc<SessionStore>,
    service: DoctorService,
}

fn setup(server: &MockServer) -> TestContext {
    let config = TestConfig::with_mock_server(&server.uri());
    let client_config = config.to_client_config();

    let sessions = Arc::new(SessionStore::open(&client_config.session_file));
    let router = Arc::new(ServiceRouter::new(&client_config, sessions.clone()));

    TestContext {
        _config: config,
        sessions,
        service: DoctorService::new(router),
    }
}

fn log_in(ctx: &TestContext, doctor: &TestUser) -> String {
    let tokens = doctor.tokens();
    let access_token = tokens.access_token.clone();
    ctx.sessions.save_session(tokens, doctor.to_identity()).unwrap();
    access_token
}

#[tokio::test]
async fn test_get_profile_sends_bearer_token() {
    let mock_server = MockServer::start().await;
    let ctx = setup(&mock_server);
    let doctor = TestUser::doctor("a@doctor.clinic.com");
    let token = log_in(&ctx, &doctor);

    Mock::given(method("GET"))
        .and(path("/api/doctors/profile"))
        .and(header("authorization", format!("Bearer {}", token).as_str()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(MockBackendResponses::doctor_profile_response(&doctor, true)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let profile = ctx.service.get_profile().await.unwrap();

    assert_eq!(profile.email, "a@doctor.clinic.com");
    assert_eq!(profile.specialization.as_deref(), Some("Cardiology"));
    assert!(profile.is_activated);
}

#[tokio::test]
async fn test_profile_without_session_is_rejected_by_backend() {
    let mock_server = MockServer::start().await;
    let ctx = setup(&mock_server);

    Mock::given(method("GET"))
        .and(path("/api/doctors/profile"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Unauthorized"})))
        .mount(&mock_server)
        .await;

    let err = ctx.service.get_profile().await.unwrap_err();

    assert_matches!(err, ClientError::Backend { status: 401, .. });
    let received = mock_server.received_requests().await.unwrap();
    assert!(received[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_update_profile_sends_only_changed_fields() {
    let mock_server = MockServer::start().await;
    let ctx = setup(&mock_server);
    let doctor = TestUser::doctor("a@doctor.clinic.com");
    log_in(&ctx, &doctor);

    Mock::given(method("PUT"))
        .and(path("/api/doctors/profile"))
        .and(body_json(json!({"officeAddress": "12 Rue de Carthage", "consultationHours": "08:00-12:00"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(MockBackendResponses::doctor_profile_response(&doctor, true)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = UpdateDoctorProfileRequest {
        office_address: Some("12 Rue de Carthage".to_string()),
        consultation_hours: Some("08:00-12:00".to_string()),
        ..Default::default()
    };

    ctx.service.update_profile(request).await.unwrap();
}

#[tokio::test]
async fn test_activation_status() {
    let mock_server = MockServer::start().await;
    let ctx = setup(&mock_server);
    log_in(&ctx, &TestUser::doctor("a@doctor.clinic.com"));

    Mock::given(method("GET"))
        .and(path("/api/doctors/activation-status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockBackendResponses::activation_status_response(false, "Waiting for admin approval"),
        ))
        .mount(&mock_server)
        .await;

    let status = ctx.service.activation_status().await.unwrap();

    assert!(!status.is_activated);
    assert_eq!(status.message, "Waiting for admin approval");
}

#[tokio::test]
async fn test_profile_of_unactivated_doctor_is_a_plain_backend_error() {
    let mock_server = MockServer::start().await;
    let ctx = setup(&mock_server);
    log_in(&ctx, &TestUser::doctor("a@doctor.clinic.com"));

    Mock::given(method("GET"))
        .and(path("/api/doctors/profile"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(MockBackendResponses::error_response("Doctor account not activated")),
        )
        .mount(&mock_server)
        .await;

    let err = ctx.service.get_profile().await.unwrap_err();

    assert_matches!(err, ClientError::Backend { status: 403, ref message } if message == "Doctor account not activated");
    assert_eq!(err.user_message(), "Doctor account not activated");
}

#[tokio::test]
async fn test_register_doctor() {
    let mock_server = MockServer::start().await;
    let ctx = setup(&mock_server);
    let doctor = TestUser::doctor("new@doctor.clinic.com");

    Mock::given(method("POST"))
        .and(path("/api/doctors/register"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(MockBackendResponses::doctor_profile_response(&doctor, false)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let created = ctx
        .service
        .register_doctor(DoctorRegisterRequest {
            email: "new@doctor.clinic.com".to_string(),
            password: "secret1".to_string(),
            first_name: "Test".to_string(),
            last_name: "Doctor".to_string(),
            phone_number: None,
            medical_license_number: "MD123456".to_string(),
            specialization: "Cardiology".to_string(),
            hospital_affiliation: None,
            years_of_experience: Some(10),
        })
        .await
        .unwrap();

    assert!(!created.is_activated);
    assert_eq!(created.activation_status.as_deref(), Some("PENDING"));
    assert!(!ctx.sessions.is_logged_in());
}
