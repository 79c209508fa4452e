use std::sync::Arc;
use std::time::Duration;

use tokio::sync::OnceCell;
use tracing::debug;

use shared_config::ClientConfig;
use shared_models::{BackendEndpoint, BackendTarget, ClientError};

use crate::client::BackendClient;
use crate::interceptor::{AuthInterceptor, TokenProvider};

struct Slot {
    endpoint: BackendEndpoint,
    client: OnceCell<Arc<BackendClient>>,
}

impl Slot {
    fn new(endpoint: BackendEndpoint) -> Self {
        Self {
            endpoint,
            client: OnceCell::new(),
        }
    }
}

/// Maps each backend target to its client.
///
/// Clients are built on first use and kept for the lifetime of the router.
/// Construction is single-flight per target: concurrent first callers wait on
/// one build and share the result.
pub struct ServiceRouter {
    auth: Slot,
    doctor: Slot,
    user: Slot,
    timeout: Duration,
    interceptor: AuthInterceptor,
}

impl ServiceRouter {
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            auth: Slot::new(config.endpoint(BackendTarget::Auth)),
            doctor: Slot::new(config.endpoint(BackendTarget::Doctor)),
            user: Slot::new(config.endpoint(BackendTarget::User)),
            timeout: config.request_timeout,
            interceptor: AuthInterceptor::new(tokens),
        }
    }

    fn slot(&self, target: BackendTarget) -> &Slot {
        match target {
            BackendTarget::Auth => &self.auth,
            BackendTarget::Doctor => &self.doctor,
            BackendTarget::User => &self.user,
        }
    }

    pub fn endpoint(&self, target: BackendTarget) -> &BackendEndpoint {
        &self.slot(target).endpoint
    }

    pub fn is_initialized(&self, target: BackendTarget) -> bool {
        self.slot(target).client.initialized()
    }

    pub async fn client(&self, target: BackendTarget) -> Result<Arc<BackendClient>, ClientError> {
        let slot = self.slot(target);
        let endpoint = slot.endpoint.clone();
        let timeout = self.timeout;
        let interceptor = self.interceptor.clone();

        let client = slot
            .client
            .get_or_try_init(|| async move {
                debug!("Creating {} client for {}", target, endpoint.base_url);
                BackendClient::new(endpoint, timeout, interceptor).map(Arc::new)
            })
            .await?;

        Ok(Arc::clone(client))
    }
}
