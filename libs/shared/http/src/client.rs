use std::time::Duration;

use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE},
    Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_models::{BackendEndpoint, BackendTarget, ClientError};

use crate::error_body::extract_error_message;
use crate::interceptor::AuthInterceptor;

/// HTTP client bound to a single backend.
pub struct BackendClient {
    client: Client,
    endpoint: BackendEndpoint,
    interceptor: AuthInterceptor,
}

impl BackendClient {
    pub fn new(
        endpoint: BackendEndpoint,
        timeout: Duration,
        interceptor: AuthInterceptor,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Configuration(format!("failed to build {} client: {}", endpoint.target, e)))?;

        Ok(Self {
            client,
            endpoint,
            interceptor,
        })
    }

    pub fn target(&self) -> BackendTarget {
        self.endpoint.target
    }

    pub fn base_url(&self) -> &str {
        &self.endpoint.base_url
    }

    pub fn endpoint(&self) -> &BackendEndpoint {
        &self.endpoint
    }

    fn get_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    /// Sends a request and returns the status and raw body of a 2xx response.
    ///
    /// Non-2xx responses become `Backend` errors carrying the message extracted
    /// from the JSON error body.
    pub async fn request_raw(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<(u16, String), ClientError> {
        let url = self.endpoint.url(path);
        debug!("{} {} ({} backend)", method, url, self.endpoint.target);

        let mut req = self.client.request(method, &url).headers(self.get_headers());
        req = self.interceptor.apply(req);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        let response_text = response.text().await?;
        debug!("Response from {}: {} ({} bytes)", url, status, response_text.len());

        if !status.is_success() {
            error!("{} backend error ({}): {}", self.endpoint.target, status, response_text);
            let message = extract_error_message(status.as_u16(), &response_text);
            return Err(ClientError::from_backend(status.as_u16(), message));
        }

        Ok((status.as_u16(), response_text))
    }

    pub async fn request_text(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<String, ClientError> {
        self.request_raw(method, path, body).await.map(|(_, text)| text)
    }

    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let text = self.request_text(method, path, body).await?;
        let data = serde_json::from_str::<T>(&text)?;
        Ok(data)
    }

    /// For endpoints whose success body is empty or irrelevant.
    pub async fn request_empty(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<(), ClientError> {
        self.request_text(method, path, body).await.map(|_| ())
    }
}
