//! Enrollment stage states and the operator-facing text for each.

use rollcall_core::carrier::WorkflowAddress;

/// State of the biometric enrollment stage.
///
/// ```text
/// NoRoles (mount, no way out but navigation)
/// AlreadyEnrolled (mount, terminal)
/// Idle ──bind──▶ Binding ──2xx──▶ Succeeded (terminal)
///   ▲               │
///   └──── Failed ◀──┘ (any error; bind again to retry)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnrollmentState {
    /// Waiting for the operator to start the bind.
    Idle,
    /// Capture delay and collaborator request in flight.
    Binding,
    /// This mount bound the identity.
    Succeeded,
    /// A previous bind on this client already covers the identity.
    AlreadyEnrolled,
    /// The last bind did not complete.
    Failed,
    /// The carried role list was empty; binding is not offered.
    NoRoles,
}

impl EnrollmentState {
    pub fn status_text(&self) -> &'static str {
        match self {
            Self::Idle => "Click to enroll user...",
            Self::Binding => {
                "User is being enrolled with fingerprint. Please place your finger on the sensor..."
            }
            Self::Succeeded | Self::AlreadyEnrolled => "User has been successfully enrolled.",
            Self::Failed => "Enrollment failed. Please try again.",
            Self::NoRoles => "No roles assigned. Please assign roles before enrolling.",
        }
    }

    /// Returns true if a bind may start from this state.
    pub fn can_bind(&self) -> bool {
        matches!(self, Self::Idle | Self::Failed)
    }

    /// Returns true if the identity is known to be bound.
    pub fn is_enrolled(&self) -> bool {
        matches!(self, Self::Succeeded | Self::AlreadyEnrolled)
    }

    /// Navigation offered from this state.
    pub fn next_actions(&self) -> &'static [NextAction] {
        if self.is_enrolled() {
            &[NextAction::NewEnrollment, NextAction::Dashboard]
        } else {
            &[]
        }
    }
}

/// Navigation out of a completed enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NextAction {
    /// Start over at identity capture.
    NewEnrollment,
    /// Leave the workflow.
    Dashboard,
}

impl NextAction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::NewEnrollment => "Create New User",
            Self::Dashboard => "Go to Dashboard",
        }
    }

    pub fn address(&self) -> WorkflowAddress {
        match self {
            Self::NewEnrollment => WorkflowAddress::identity_capture(),
            Self::Dashboard => WorkflowAddress::dashboard(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_idle_and_failed_can_bind() {
        use EnrollmentState::*;
        for state in [Idle, Binding, Succeeded, AlreadyEnrolled, Failed, NoRoles] {
            assert_eq!(state.can_bind(), matches!(state, Idle | Failed), "{state:?}");
        }
    }

    #[test]
    fn test_navigation_only_after_enrollment() {
        assert!(EnrollmentState::Idle.next_actions().is_empty());
        assert!(EnrollmentState::Failed.next_actions().is_empty());
        assert_eq!(EnrollmentState::Succeeded.next_actions().len(), 2);
        assert_eq!(
            EnrollmentState::AlreadyEnrolled.next_actions(),
            EnrollmentState::Succeeded.next_actions()
        );
    }

    #[test]
    fn test_next_action_addresses() {
        assert_eq!(
            NextAction::NewEnrollment.address().to_string(),
            "/dashboard/users/enrollments/"
        );
        assert_eq!(NextAction::Dashboard.address().to_string(), "/dashboard/");
    }
}
