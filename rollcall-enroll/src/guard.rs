//! Enrollment idempotency guard.
//!
//! Best-effort and client-scoped: it stops this client from binding the
//! same school ID twice, nothing more. A cleared store or a different client
//! starts from scratch; server-side idempotency belongs to the collaborator.

use rollcall_core::record::{
    CurrentUser, EnrollmentRecord, CURRENT_USER_KEY, ENROLLMENT_RECORD_KEY,
};

use crate::store::{LocalStore, StoreError};

/// Result of consulting the guard for one school ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// A bind for this school ID already completed on this client.
    AlreadyEnrolled,
    /// No completed bind is known; binding may proceed.
    NotEnrolled,
}

/// Read the stored record.
///
/// A value that does not parse is treated as absent.
pub fn read_record(store: &impl LocalStore) -> Result<Option<EnrollmentRecord>, StoreError> {
    let Some(raw) = store.get(ENROLLMENT_RECORD_KEY)? else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(record) => Ok(Some(record)),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable enrollment record");
            Ok(None)
        }
    }
}

/// Decide whether `school_id` is already bound on this client.
///
/// Store failures degrade to [`GuardDecision::NotEnrolled`].
pub fn check_enrollment(store: &impl LocalStore, school_id: &str) -> GuardDecision {
    match read_record(store) {
        Ok(Some(record)) if record.covers(school_id) => GuardDecision::AlreadyEnrolled,
        Ok(_) => GuardDecision::NotEnrolled,
        Err(e) => {
            tracing::warn!(error = %e, "enrollment record unavailable");
            GuardDecision::NotEnrolled
        }
    }
}

/// Persist a completed bind, replacing any previous record.
pub fn record_enrollment(store: &impl LocalStore, school_id: &str) -> Result<(), StoreError> {
    let record = EnrollmentRecord::enrolled(school_id);
    let json = serde_json::to_string(&record).map_err(|e| StoreError::Write(e.to_string()))?;
    store.set(ENROLLMENT_RECORD_KEY, &json)
}

/// The signed-in operator, if the login flow stored one.
pub fn current_user(store: &impl LocalStore) -> Option<CurrentUser> {
    let raw = store.get(CURRENT_USER_KEY).ok().flatten()?;
    serde_json::from_str(&raw).ok()
}
