use std::sync::Arc;

use tracing::info;

use appointment_cell::AppointmentService;
use auth_cell::AuthService;
use doctor_cell::DoctorService;
use patient_cell::PatientService;
use session_cell::SessionStore;
use shared_config::ClientConfig;
use shared_http::ServiceRouter;
use shared_models::ClientError;

/// Everything a call site needs, built once at start-up and passed around.
pub struct AppContext {
    config: ClientConfig,
    sessions: Arc<SessionStore>,
    router: Arc<ServiceRouter>,
    auth: AuthService,
    doctors: DoctorService,
    patients: PatientService,
    appointments: AppointmentService,
}

impl AppContext {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        if !config.is_configured() {
            return Err(ClientError::Configuration(
                "every backend URL must be set".to_string(),
            ));
        }

        let sessions = Arc::new(SessionStore::open(&config.session_file));
        let router = Arc::new(ServiceRouter::new(&config, sessions.clone()));

        info!(
            "Client context ready (session file: {}, logged in: {})",
            sessions.path().display(),
            sessions.is_logged_in()
        );

        Ok(Self {
            auth: AuthService::new(router.clone(), sessions.clone()),
            doctors: DoctorService::new(router.clone()),
            patients: PatientService::new(router.clone()),
            appointments: AppointmentService::new(router.clone()),
            config,
            sessions,
            router,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    pub fn router(&self) -> &Arc<ServiceRouter> {
        &self.router
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn doctors(&self) -> &DoctorService {
        &self.doctors
    }

    pub fn patients(&self) -> &PatientService {
        &self.patients
    }

    pub fn appointments(&self) -> &AppointmentService {
        &self.appointments
    }
}
