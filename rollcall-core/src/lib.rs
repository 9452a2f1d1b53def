//! # Rollcall Core
//!
//! Pure domain types for the rollcall onboarding workflow: capture an
//! identity, assign roles, then hand both to the biometric enrollment stage.
//!
//! ## Design Principles
//!
//! This crate is intentionally **IO-free**:
//! - No filesystem operations
//! - No network calls
//! - No durable storage
//!
//! Stages never share hidden in-process state. Everything a stage needs is
//! carried in its [`carrier::WorkflowAddress`], so a stage can be entered by
//! back/forward navigation, reload, or a hand-built link. The actual IO
//! (local store, HTTP collaborator) lives in `rollcall-enroll` and
//! `rollcall-cli`.
//!
//! ## Modules
//!
//! - [`identity`] - Identity capture and field validation
//! - [`role`] - Role tags, role sets and exclusivity rules
//! - [`selection`] - Role selection stage state
//! - [`carrier`] - Stage addresses and the workflow token wire format
//! - [`record`] - Durable local record shapes

pub mod carrier;
pub mod identity;
pub mod record;
pub mod role;
pub mod selection;

pub use carrier::{CarrierError, Stage, WorkflowAddress, WorkflowToken};
pub use identity::{FieldError, Identity, IdentityError, IdentityField, IdentityForm};
pub use record::{CurrentUser, EnrollmentRecord, CURRENT_USER_KEY, ENROLLMENT_RECORD_KEY};
pub use role::{Role, RoleSet, RoleValidationError, UnknownRole};
pub use selection::{RoleSelection, SelectionError, SelectionPhase};
