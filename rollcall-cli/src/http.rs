//! HTTP client for the enrollment service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rollcall_enroll::{EnrollmentCollaborator, EnrollmentReceipt, EnrollmentRequest, TransportError};

/// Sends `POST {base}/enrollments` with a JSON body.
#[derive(Debug, Clone)]
pub struct HttpCollaborator {
    client: Client,
    /// Fully joined `.../enrollments` URL.
    endpoint: String,
}

impl HttpCollaborator {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/enrollments", base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl EnrollmentCollaborator for HttpCollaborator {
    async fn create_enrollment(
        &self,
        request: &EnrollmentRequest,
    ) -> Result<EnrollmentReceipt, TransportError> {
        tracing::debug!(endpoint = %self.endpoint, sch_id = %request.sch_id, "sending enrollment");

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        // The body is informational only.
        let body = match response.text().await {
            Ok(text) => serde_json::from_str(&text).ok(),
            Err(e) => {
                tracing::debug!(error = %e, "enrollment response body unreadable");
                None
            }
        };

        Ok(EnrollmentReceipt {
            status: status.as_u16(),
            body,
        })
    }
}
