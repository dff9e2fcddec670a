//! HTTP transport to the remote ili2c service.
//!
//! Format-agnostic: one POST per call, no retries, no caching. A non-2xx
//! status resolves to an `Ok(ServiceResponse)` so callers can surface the
//! diagnostic body; only connection-level failures are errors.

use reqwest::multipart::Form;
use tracing::debug;

use crate::remote::error::ServiceError;
use crate::remote::types::ServiceResponse;

pub struct ServiceClient {
    client: reqwest::Client,
}

impl ServiceClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("interlis-ls")
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    pub async fn post(&self, url: &str, form: Form) -> Result<ServiceResponse, ServiceError> {
        debug!(url, "posting source to remote service");

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|source| ServiceError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| ServiceError::Transport {
                url: url.to_string(),
                source,
            })?
            .to_vec();

        debug!(url, status = status.as_u16(), bytes = body.len(), "remote service responded");

        Ok(ServiceResponse {
            status: status.as_u16(),
            status_text: status
                .canonical_reason()
                .unwrap_or("unknown status")
                .to_string(),
            body,
        })
    }
}

impl Default for ServiceClient {
    fn default() -> Self {
        Self::new()
    }
}
