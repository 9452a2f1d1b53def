//! Role selection stage.
//!
//! Roles are toggled freely; validation runs only on submit. While the
//! forward transition is in flight the stage is locked: toggles are ignored
//! and a second submit is refused.

use crate::carrier::{WorkflowAddress, WorkflowToken};
use crate::identity::Identity;
use crate::role::{Role, RoleSet, RoleValidationError};

const SUBMITTING_MESSAGE: &str = "Assigning role(s)...";
const TRANSITION_FAILED_MESSAGE: &str = "Failed to assign roles. Please try again";

/// Whether the stage accepts input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPhase {
    Editing,
    Submitting,
}

/// Submit was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error(transparent)]
    Invalid(#[from] RoleValidationError),

    #[error("a submission is already in progress")]
    Busy,
}

/// State of the role selection stage for one identity.
#[derive(Debug, Clone)]
pub struct RoleSelection {
    identity: Identity,
    roles: RoleSet,
    phase: SelectionPhase,
    message: Option<String>,
}

impl RoleSelection {
    /// Mount the stage from a decoded address. Starts with no roles.
    pub fn mount(token: &WorkflowToken) -> Self {
        Self::new(token.identity().clone())
    }

    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            roles: RoleSet::new(),
            phase: SelectionPhase::Editing,
            message: None,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn roles(&self) -> &RoleSet {
        &self.roles
    }

    pub fn phase(&self) -> SelectionPhase {
        self.phase
    }

    /// Latest operator-facing message, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Toggle a role. Ignored while submitting.
    pub fn toggle(&mut self, role: Role) {
        if self.phase == SelectionPhase::Submitting {
            return;
        }
        self.roles.toggle(role);
    }

    /// Validate the selection and lock the stage for the forward transition.
    ///
    /// On success returns the biometric enrollment address; the caller
    /// reports the outcome through [`Self::transition_completed`] or
    /// [`Self::transition_failed`].
    pub fn submit(&mut self) -> Result<WorkflowAddress, SelectionError> {
        if self.phase == SelectionPhase::Submitting {
            return Err(SelectionError::Busy);
        }

        if let Err(e) = self.roles.validate() {
            self.message = Some(e.to_string());
            return Err(e.into());
        }

        self.phase = SelectionPhase::Submitting;
        self.message = Some(SUBMITTING_MESSAGE.to_string());

        Ok(WorkflowAddress::biometric_enrollment(&self.identity, &self.roles))
    }

    /// The forward navigation finished; unlock the stage.
    pub fn transition_completed(&mut self) {
        self.phase = SelectionPhase::Editing;
    }

    /// The forward navigation failed; unlock the stage for another try.
    pub fn transition_failed(&mut self) {
        self.phase = SelectionPhase::Editing;
        self.message = Some(TRANSITION_FAILED_MESSAGE.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carrier::Stage;

    fn stage() -> RoleSelection {
        let address = WorkflowAddress::parse(
            "/dashboard/users/enrollments/U19-EEE-110/assign_roles?fullname=Ada+Obi&email=ada%40afit.edu.ng&schID=U19-EEE-110",
        )
        .unwrap();
        RoleSelection::mount(&address.token())
    }

    #[test]
    fn test_empty_selection_is_refused() {
        let mut s = stage();
        assert_eq!(
            s.submit(),
            Err(SelectionError::Invalid(RoleValidationError::Empty))
        );
        assert_eq!(s.message(), Some("Please select at least one role."));
        assert_eq!(s.phase(), SelectionPhase::Editing);
    }

    #[test]
    fn test_qa_student_conflict_blocks_navigation() {
        let mut s = stage();
        s.toggle(Role::Student);
        s.toggle(Role::QaAdmin);

        let err = s.submit().unwrap_err();
        assert_eq!(err, SelectionError::Invalid(RoleValidationError::QaStudentConflict));
        assert_eq!(s.message(), Some("A user cannot be both an Admin and a Student."));
        assert_eq!(s.phase(), SelectionPhase::Editing);
    }

    #[test]
    fn test_valid_selection_produces_enrollment_address() {
        let mut s = stage();
        s.toggle(Role::Lecturer);

        let address = s.submit().unwrap();
        assert_eq!(address.stage(), Stage::BiometricEnrollment);
        assert_eq!(address.param("roles"), Some("Lecturer"));
        assert_eq!(address.token().roles(), ["lecturer"]);
        assert_eq!(address.token().identity(), s.identity());
        assert_eq!(s.message(), Some("Assigning role(s)..."));
    }

    #[test]
    fn test_stage_is_locked_while_submitting() {
        let mut s = stage();
        s.toggle(Role::Student);
        s.submit().unwrap();

        s.toggle(Role::Lecturer);
        assert!(!s.roles().contains(Role::Lecturer));
        assert_eq!(s.submit(), Err(SelectionError::Busy));

        s.transition_completed();
        s.toggle(Role::Lecturer);
        assert!(s.roles().contains(Role::Lecturer));
    }

    #[test]
    fn test_failed_transition_unlocks_with_message() {
        let mut s = stage();
        s.toggle(Role::Student);
        s.submit().unwrap();

        s.transition_failed();
        assert_eq!(s.phase(), SelectionPhase::Editing);
        assert_eq!(s.message(), Some("Failed to assign roles. Please try again"));
        assert!(s.submit().is_ok());
    }
}
