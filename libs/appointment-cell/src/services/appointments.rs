use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use shared_http::ServiceRouter;
use shared_models::{BackendTarget, ClientError};

use crate::models::{
    ApiResponse, AppointmentRequest, AppointmentResponse, AvailableDoctor, CancelAppointmentRequest,
};

const APPOINTMENTS_PATH: &str = "/api/v1/users/appointments";
const AVAILABLE_DOCTORS_PATH: &str = "/api/v1/users/doctors/available";

/// Patient-side appointment calls on the user backend.
pub struct AppointmentService {
    router: Arc<ServiceRouter>,
}

impl AppointmentService {
    pub fn new(router: Arc<ServiceRouter>) -> Self {
        Self { router }
    }

    pub async fn list_appointments(&self) -> Result<Vec<AppointmentResponse>, ClientError> {
        debug!("Fetching appointments for current user");

        let appointments: Vec<AppointmentResponse> = self.fetch_list(APPOINTMENTS_PATH).await?;

        debug!("Loaded {} appointments", appointments.len());
        Ok(appointments)
    }

    /// Any 2xx means the booking was taken. The created appointment is only
    /// returned when the backend echoes it back in the envelope.
    pub async fn create_appointment(
        &self,
        request: AppointmentRequest,
    ) -> Result<Option<AppointmentResponse>, ClientError> {
        debug!(
            "Booking {} with doctor {} at {}",
            request.appointment_type, request.doctor_id, request.appointment_date_time
        );

        let client = self.router.client(BackendTarget::User).await?;
        let (status, body) = client
            .request_raw(Method::POST, APPOINTMENTS_PATH, Some(serde_json::to_value(&request)?))
            .await?;
        let appointment = ApiResponse::<AppointmentResponse>::from_accepted(status, &body)?;

        match &appointment {
            Some(created) => info!("Appointment {} booked ({})", created.id, created.status),
            None => info!("Appointment with doctor {} booked", request.doctor_id),
        }
        Ok(appointment)
    }

    pub async fn cancel_appointment(
        &self,
        appointment_id: &str,
        reason: &str,
    ) -> Result<Option<AppointmentResponse>, ClientError> {
        let path = format!("{}/{}/cancel", APPOINTMENTS_PATH, appointment_id);
        let request = CancelAppointmentRequest {
            reason: reason.to_string(),
        };

        let client = self.router.client(BackendTarget::User).await?;
        let (status, body) = client
            .request_raw(Method::POST, &path, Some(serde_json::to_value(&request)?))
            .await?;
        let appointment = ApiResponse::<AppointmentResponse>::from_accepted(status, &body)?;

        info!("Appointment {} cancelled", appointment_id);
        Ok(appointment)
    }

    pub async fn available_doctors(&self) -> Result<Vec<AvailableDoctor>, ClientError> {
        debug!("Fetching available doctors");
        self.fetch_list(AVAILABLE_DOCTORS_PATH).await
    }

    async fn fetch_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ClientError> {
        let client = self.router.client(BackendTarget::User).await?;
        let (status, body) = client.request_raw(Method::GET, path, None).await?;
        let envelope: ApiResponse<Vec<T>> = serde_json::from_str(&body)?;
        envelope.into_data(status)
    }
}
