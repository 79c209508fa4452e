use std::sync::Arc;

use reqwest::Method;
use tracing::{debug, info, warn};

use shared_http::ServiceRouter;
use shared_models::{BackendTarget, ClientError};

use crate::models::{ChangePasswordRequest, UpdateUserProfileRequest, UserProfileResponse};

const PROFILE_PATH: &str = "/api/v1/users/profile";
const CHANGE_PASSWORD_PATH: &str = "/api/v1/users/change-password";

pub struct PatientService {
    router: Arc<ServiceRouter>,
}

impl PatientService {
    pub fn new(router: Arc<ServiceRouter>) -> Self {
        Self { router }
    }

    pub async fn get_profile(&self) -> Result<UserProfileResponse, ClientError> {
        debug!("Fetching user profile");

        let client = self.router.client(BackendTarget::User).await?;
        client.request(Method::GET, PROFILE_PATH, None).await
    }

    pub async fn update_profile(
        &self,
        request: UpdateUserProfileRequest,
    ) -> Result<UserProfileResponse, ClientError> {
        if request.is_empty() {
            warn!("Profile update with no fields set");
        }

        let client = self.router.client(BackendTarget::User).await?;
        let profile: UserProfileResponse = client
            .request(Method::PUT, PROFILE_PATH, Some(serde_json::to_value(&request)?))
            .await?;

        info!("User profile updated: {}", profile.id);
        Ok(profile)
    }

    /// The backend answers with an empty body on success.
    pub async fn change_password(&self, request: ChangePasswordRequest) -> Result<(), ClientError> {
        debug!("Changing account password");

        let client = self.router.client(BackendTarget::User).await?;
        client
            .request_empty(
                Method::PUT,
                CHANGE_PASSWORD_PATH,
                Some(serde_json::to_value(&request)?),
            )
            .await?;

        info!("Password changed");
        Ok(())
    }
}
