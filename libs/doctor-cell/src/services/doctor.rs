use std::sync::Arc;

use reqwest::Method;
use tracing::{debug, info};

use shared_http::ServiceRouter;
use shared_models::{BackendTarget, ClientError};

use crate::models::{ActivationStatus, DoctorRegisterRequest, DoctorResponse, UpdateDoctorProfileRequest};

const REGISTER_PATH: &str = "/api/doctors/register";
const PROFILE_PATH: &str = "/api/doctors/profile";
const ACTIVATION_STATUS_PATH: &str = "/api/doctors/activation-status";

/// Calls on the doctor backend made on behalf of the logged-in doctor.
pub struct DoctorService {
    router: Arc<ServiceRouter>,
}

impl DoctorService {
    pub fn new(router: Arc<ServiceRouter>) -> Self {
        Self { router }
    }

    /// New doctor accounts start unactivated until an administrator approves them.
    pub async fn register_doctor(&self, request: DoctorRegisterRequest) -> Result<DoctorResponse, ClientError> {
        debug!("Registering doctor account for: {}", request.email);

        let client = self.router.client(BackendTarget::Doctor).await?;
        let doctor: DoctorResponse = client
            .request(Method::POST, REGISTER_PATH, Some(serde_json::to_value(&request)?))
            .await?;

        info!("Doctor account registered: {} (activated: {})", doctor.email, doctor.is_activated);
        Ok(doctor)
    }

    pub async fn get_profile(&self) -> Result<DoctorResponse, ClientError> {
        debug!("Fetching doctor profile");

        let client = self.router.client(BackendTarget::Doctor).await?;
        client.request(Method::GET, PROFILE_PATH, None).await
    }

    pub async fn update_profile(&self, request: UpdateDoctorProfileRequest) -> Result<DoctorResponse, ClientError> {
        debug!("Updating doctor profile");

        let client = self.router.client(BackendTarget::Doctor).await?;
        let doctor: DoctorResponse = client
            .request(Method::PUT, PROFILE_PATH, Some(serde_json::to_value(&request)?))
            .await?;

        info!("Doctor profile updated: {}", doctor.id);
        Ok(doctor)
    }

    pub async fn activation_status(&self) -> Result<ActivationStatus, ClientError> {
        debug!("Checking doctor activation status");

        let client = self.router.client(BackendTarget::Doctor).await?;
        let status: ActivationStatus = client.request(Method::GET, ACTIVATION_STATUS_PATH, None).await?;

        debug!("Activation status: {}", status.is_activated);
        Ok(status)
    }
}
