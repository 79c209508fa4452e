use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use serde_json::json;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{body_json, header, method, path};

use appointment_cell::{AppointmentRequest, AppointmentService, AppointmentStatus, AppointmentType};
use session_cell::SessionStore;
use shared_http::ServiceRouter;
use shared_models::{ClientError, NormalizationError};
use shared_utils::test_utils::{MockBackendResponses, TestConfig, TestUser};

struct TestContext {
    _config: TestConfig,
    bearer: String,
    service: AppointmentService,
}

fn checkup_at(hour: u32) -> AppointmentRequest {
    AppointmentRequest {
        doctor_id: "d1".to_string(),
        appointment_date_time: NaiveDate::from_ymd_opt(2025, 11, 14)
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
            .unwrap(),
        appointment_type: AppointmentType::Checkup,
        reason: "Annual checkup".to_string(),
        notes: None,
    }
}

async fn setup(server: &MockServer) -> TestContext {
    let config = TestConfig::with_mock_server(&server.uri());
    let client_config = config.to_client_config();

    let sessions = Arc::new(SessionStore::open(&client_config.session_file));
    let patient = TestUser::patient("p@clinic.com");
    let tokens = patient.tokens();
    let bearer = format!("Bearer {}", tokens.access_token);
    sessions.save_session(tokens, patient.to_identity()).unwrap();

    let router = Arc::new(ServiceRouter::new(&client_config, sessions));

    TestContext {
        _config: config,
        bearer,
        service: AppointmentService::new(router),
    }
}

#[tokio::test]
async fn test_list_appointments_unwraps_envelope() {
    let mock_server = MockServer::start().await;
    let ctx = setup(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/appointments"))
        .and(header("authorization", ctx.bearer.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::api_response(json!([
            MockBackendResponses::appointment_response("a1", "d1"),
            MockBackendResponses::appointment_response("a2", "d2"),
        ]))))
        .expect(1)
        .mount(&mock_server)
        .await;

    let appointments = ctx.service.list_appointments().await.unwrap();

    assert_eq!(appointments.len(), 2);
    assert_eq!(appointments[0].id, "a1");
    assert_eq!(appointments[1].doctor_id, "d2");
    assert_eq!(appointments[0].status, AppointmentStatus::Scheduled);
    assert_eq!(appointments[0].appointment_type, AppointmentType::Consultation);
}

#[tokio::test]
async fn test_create_appointment() {
    let mock_server = MockServer::start().await;
    let ctx = setup(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/users/appointments"))
        .and(body_json(json!({
            "doctorId": "d1",
            "appointmentDateTime": "2025-11-14T18:30:00",
            "appointmentType": "CONSULTATION",
            "reason": "Chest pain",
            "notes": "Since last week"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(MockBackendResponses::api_response(
            MockBackendResponses::appointment_response("a1", "d1"),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = AppointmentRequest {
        doctor_id: "d1".to_string(),
        appointment_date_time: NaiveDate::from_ymd_opt(2025, 11, 14)
            .and_then(|d| d.and_hms_opt(18, 30, 0))
            .unwrap(),
        appointment_type: AppointmentType::Consultation,
        reason: "Chest pain".to_string(),
        notes: Some("Since last week".to_string()),
    };

    let appointment = ctx.service.create_appointment(request).await.unwrap().unwrap();

    assert_eq!(appointment.id, "a1");
    assert!(appointment.status.is_upcoming());
}

#[tokio::test]
async fn test_cancel_appointment_sends_reason() {
    let mock_server = MockServer::start().await;
    let ctx = setup(&mock_server).await;

    let mut cancelled = MockBackendResponses::appointment_response("a1", "d1");
    cancelled["status"] = json!("CANCELLED");

    Mock::given(method("POST"))
        .and(path("/api/v1/users/appointments/a1/cancel"))
        .and(body_json(json!({"reason": "Feeling better"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::api_response(cancelled)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let appointment = ctx.service.cancel_appointment("a1", "Feeling better").await.unwrap().unwrap();

    assert_eq!(appointment.status, AppointmentStatus::Cancelled);
}

#[tokio::test]
async fn test_available_doctors() {
    let mock_server = MockServer::start().await;
    let ctx = setup(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/doctors/available"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::api_response(json!([
            MockBackendResponses::available_doctor_response("d1"),
        ]))))
        .mount(&mock_server)
        .await;

    let doctors = ctx.service.available_doctors().await.unwrap();

    assert_eq!(doctors.len(), 1);
    assert_eq!(doctors[0].full_name(), "Dr. Jane Smith");
    assert_eq!(doctors[0].years_of_experience, Some(12));
}

#[tokio::test]
async fn test_envelope_without_data_is_a_normalization_error() {
    let mock_server = MockServer::start().await;
    let ctx = setup(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "message": "OK"})))
        .mount(&mock_server)
        .await;

    assert_matches!(
        ctx.service.list_appointments().await,
        Err(ClientError::Normalization(NormalizationError::MissingFields(_)))
    );
}

#[tokio::test]
async fn test_booking_conflict_is_reported() {
    let mock_server = MockServer::start().await;
    let ctx = setup(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/users/appointments"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(json!({"success": false, "message": "Doctor is not available at this time"})),
        )
        .mount(&mock_server)
        .await;

    let err = ctx.service.create_appointment(checkup_at(9)).await.unwrap_err();

    assert_matches!(err, ClientError::Backend { status: 409, ref message } if message == "Doctor is not available at this time");
}

#[tokio::test]
async fn test_pending_wording_outside_login_stays_a_backend_error() {
    let mock_server = MockServer::start().await;
    let ctx = setup(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/users/appointments"))
        .respond_with(ResponseTemplate::new(409).set_body_json(
            MockBackendResponses::error_response("Doctor already has a pending appointment at this time"),
        ))
        .mount(&mock_server)
        .await;

    let err = ctx.service.create_appointment(checkup_at(10)).await.unwrap_err();

    assert_matches!(err, ClientError::Backend { status: 409, .. });
    assert_eq!(err.user_message(), "Doctor already has a pending appointment at this time");
}

#[tokio::test]
async fn test_cancel_with_empty_body_succeeds() {
    let mock_server = MockServer::start().await;
    let ctx = setup(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/users/appointments/a1/cancel"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let appointment = ctx.service.cancel_appointment("a1", "Feeling better").await.unwrap();

    assert!(appointment.is_none());
}

#[tokio::test]
async fn test_cancel_with_envelope_without_data_succeeds() {
    let mock_server = MockServer::start().await;
    let ctx = setup(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/users/appointments/a1/cancel"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "message": "Appointment cancelled"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let appointment = ctx.service.cancel_appointment("a1", "Feeling better").await.unwrap();

    assert!(appointment.is_none());
}

#[tokio::test]
async fn test_rejection_inside_created_response_keeps_its_status() {
    let mock_server = MockServer::start().await;
    let ctx = setup(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/users/appointments"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"success": false, "message": "Doctor is fully booked"})),
        )
        .mount(&mock_server)
        .await;

    let err = ctx.service.create_appointment(checkup_at(11)).await.unwrap_err();

    assert_matches!(err, ClientError::Backend { status: 201, ref message } if message == "Doctor is fully booked");
}
