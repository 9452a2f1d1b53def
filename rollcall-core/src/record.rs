//! Shapes persisted in the client-local key/value store.

use serde::{Deserialize, Serialize};

/// Key holding the [`EnrollmentRecord`].
pub const ENROLLMENT_RECORD_KEY: &str = "enrolledData";

/// Key holding the [`CurrentUser`] written by the login flow.
pub const CURRENT_USER_KEY: &str = "user";

/// Marker that an identity has been bound on this client.
///
/// One per client, overwritten on every successful bind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    /// School ID of the enrolled user.
    #[serde(rename = "userID")]
    pub user_id: String,
    #[serde(rename = "isEnrolled")]
    pub is_enrolled: bool,
}

impl EnrollmentRecord {
    /// Record a completed bind for `school_id`.
    pub fn enrolled(school_id: impl Into<String>) -> Self {
        Self {
            user_id: school_id.into(),
            is_enrolled: true,
        }
    }

    /// Returns true if this record proves `school_id` is already bound.
    ///
    /// An empty school ID never matches.
    pub fn covers(&self, school_id: &str) -> bool {
        self.is_enrolled && !school_id.is_empty() && self.user_id == school_id
    }
}

/// The signed-in operator. Read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
}
