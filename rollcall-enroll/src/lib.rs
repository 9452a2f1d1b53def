//! Enrollment guard and biometric bind orchestration for rollcall.
//!
//! This crate owns the one irreversible step of the onboarding workflow:
//! binding a fingerprint to a captured identity. IO is injected via traits:
//! - [`store::LocalStore`] - durable client-local key/value store
//! - [`collaborator::EnrollmentCollaborator`] - the HTTP enrollment service
//! - [`latency::Latency`] - sensor capture delay
//!
//! # Example
//!
//! ```ignore
//! use rollcall_enroll::{FixedLatency, MemoryStore, Orchestrator};
//!
//! let orchestrator = Orchestrator::mount(token, MemoryStore::new(), client, FixedLatency::sensor());
//! orchestrator.bind().await;
//! ```

pub mod collaborator;
pub mod guard;
pub mod latency;
pub mod orchestrator;
pub mod store;

pub use collaborator::{EnrollmentCollaborator, EnrollmentReceipt, EnrollmentRequest, TransportError};
pub use guard::{check_enrollment, current_user, read_record, record_enrollment, GuardDecision};
pub use latency::{FixedLatency, Latency, DEFAULT_SENSOR_LATENCY};
pub use orchestrator::{BindOutcome, EnrollmentState, NextAction, Orchestrator};
pub use store::{LocalStore, MemoryStore, StoreError};
