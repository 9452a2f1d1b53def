//! Test harness for enrollment workflow tests.
//!
//! Stands in for the HTTP collaborator and the sensor so scenarios run
//! without network or real delays.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rollcall_core::carrier::{WorkflowAddress, WorkflowToken};
use rollcall_core::identity::IdentityForm;
use rollcall_core::role::Role;
use rollcall_core::selection::RoleSelection;
use rollcall_enroll::{
    EnrollmentCollaborator, EnrollmentReceipt, EnrollmentRequest, Latency, TransportError,
};
use tokio::sync::Notify;

/// Collaborator that records every request and answers from a script.
///
/// Statuses are consumed in order; once the script runs out every request
/// is accepted with 201.
#[derive(Default)]
pub struct RecordingCollaborator {
    requests: Mutex<Vec<EnrollmentRequest>>,
    script: Mutex<VecDeque<u16>>,
}

#[allow(dead_code)]
impl RecordingCollaborator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Answer the next requests with these statuses.
    pub fn scripted(statuses: &[u16]) -> Arc<Self> {
        let collaborator = Self::default();
        collaborator
            .script
            .lock()
            .unwrap()
            .extend(statuses.iter().copied());
        Arc::new(collaborator)
    }

    pub fn requests(&self) -> Vec<EnrollmentRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl EnrollmentCollaborator for RecordingCollaborator {
    async fn create_enrollment(
        &self,
        request: &EnrollmentRequest,
    ) -> Result<EnrollmentReceipt, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        let status = self.script.lock().unwrap().pop_front().unwrap_or(201);

        if (200..300).contains(&status) {
            Ok(EnrollmentReceipt {
                status,
                body: Some(serde_json::json!({ "message": "enrolled" })),
            })
        } else {
            Err(TransportError::Status {
                status,
                reason: "scripted failure".to_string(),
            })
        }
    }
}

/// Sensor that holds every capture until released.
#[derive(Default)]
pub struct GatedLatency {
    gate: Notify,
}

#[allow(dead_code)]
impl GatedLatency {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Let one waiting capture finish.
    pub fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl Latency for GatedLatency {
    async fn wait(&self) {
        self.gate.notified().await;
    }
}

/// Run identity capture and role selection, returning the enrollment address.
#[allow(dead_code)]
pub fn enrollment_address(school_id: &str, roles: &[Role]) -> WorkflowAddress {
    let capture = IdentityForm::new("Ada Obi", "ada@afit.edu.ng", school_id)
        .submit()
        .expect("identity should validate");

    let mut selection = RoleSelection::mount(&capture.token());
    for role in roles {
        selection.toggle(*role);
    }
    let address = selection.submit().expect("roles should validate");
    selection.transition_completed();
    address
}

/// Decode an enrollment address as the enrollment stage would.
#[allow(dead_code)]
pub fn decode(address: &str) -> WorkflowToken {
    WorkflowAddress::parse(address)
        .expect("address should name a stage")
        .token()
}
