//! The external enrollment service.
//!
//! The collaborator alone decides whether an identity and its roles are
//! persisted server-side. This crate only promises to send at most one
//! request per bind attempt.

use std::sync::Arc;

use async_trait::async_trait;
use rollcall_core::carrier::WorkflowToken;
use serde::{Deserialize, Serialize};

/// Body of `POST /enrollments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentRequest {
    /// Full name as captured.
    pub fullname: String,
    pub email: String,
    /// School-issued identifier; also the record's `userID`.
    pub sch_id: String,
    /// Lower-cased role tags.
    pub roles: Vec<String>,
}

impl EnrollmentRequest {
    pub fn from_token(token: &WorkflowToken) -> Self {
        let identity = token.identity();
        Self {
            fullname: identity.full_name().to_string(),
            email: identity.email().to_string(),
            sch_id: identity.school_id().to_string(),
            roles: token.roles().to_vec(),
        }
    }
}

/// Acceptance returned by the collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrollmentReceipt {
    /// HTTP status (2xx).
    pub status: u16,
    /// Response body, when it was JSON.
    pub body: Option<serde_json::Value>,
}

/// The collaborator did not accept the request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The service answered with a non-success status.
    #[error("enrollment rejected: {status} {reason}")]
    Status { status: u16, reason: String },

    /// The service could not be reached or the exchange broke off.
    #[error("enrollment service unreachable: {0}")]
    Transport(String),
}

/// Client for the external enrollment service.
#[async_trait]
pub trait EnrollmentCollaborator: Send + Sync {
    /// Create the enrollment. Exactly one request per call, never retried.
    async fn create_enrollment(
        &self,
        request: &EnrollmentRequest,
    ) -> Result<EnrollmentReceipt, TransportError>;
}

#[async_trait]
impl<T: EnrollmentCollaborator + ?Sized> EnrollmentCollaborator for Arc<T> {
    async fn create_enrollment(
        &self,
        request: &EnrollmentRequest,
    ) -> Result<EnrollmentReceipt, TransportError> {
        (**self).create_enrollment(request).await
    }
}
