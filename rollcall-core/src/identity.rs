//! Identity capture and field validation.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::carrier::WorkflowAddress;

/// Minimum length (in characters) of a full name.
const MIN_FULL_NAME_CHARS: usize = 2;
/// Minimum length (in characters) of a school ID.
const MIN_SCHOOL_ID_CHARS: usize = 2;

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        // local part may hold `.` and `'` but must end on a word character;
        // domain labels start alphanumeric and the TLD is alphabetic
        Regex::new(
            r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@(?:[A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$",
        )
        .expect("email pattern compiles")
    })
}

/// Same acceptance as the web client's `z.string().email()`.
fn is_valid_email(email: &str) -> bool {
    !email.starts_with('.') && !email.contains("..") && email_regex().is_match(email)
}

/// A captured identity.
///
/// Created once by [`IdentityForm::validate`] (or decoded from a workflow
/// address) and never re-derived by later stages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    #[serde(rename = "fullname")]
    full_name: String,
    email: String,
    #[serde(rename = "sch_id")]
    school_id: String,
}

impl Identity {
    /// Assemble an identity from already-carried fields.
    ///
    /// Only the carrier and the capture form build identities; carried
    /// fields may be empty when an address was hand-edited.
    pub(crate) fn from_parts(
        full_name: impl Into<String>,
        email: impl Into<String>,
        school_id: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            email: email.into(),
            school_id: school_id.into(),
        }
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn school_id(&self) -> &str {
        &self.school_id
    }

    /// Returns true if every field carries a value.
    pub fn is_complete(&self) -> bool {
        !self.full_name.is_empty() && !self.email.is_empty() && !self.school_id.is_empty()
    }
}

/// Form field an error is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityField {
    FullName,
    Email,
    SchoolId,
}

impl IdentityField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullName => "fullname",
            Self::Email => "email",
            Self::SchoolId => "schID",
        }
    }
}

impl fmt::Display for IdentityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field-level rejection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: IdentityField,
    /// Text shown next to the field.
    pub message: String,
}

impl FieldError {
    fn new(field: IdentityField, message: &str) -> Self {
        Self {
            field,
            message: message.to_string(),
        }
    }
}

/// Identity capture rejected one or more fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid identity: {}", summarize(.errors))]
pub struct IdentityError {
    /// Every rejected field, in form order.
    pub errors: Vec<FieldError>,
}

impl IdentityError {
    /// Message attached to a field, if it was rejected.
    pub fn message_for(&self, field: IdentityField) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{} ({})", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Raw operator input for the identity capture stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityForm {
    pub full_name: String,
    pub email: String,
    pub school_id: String,
}

impl IdentityForm {
    pub fn new(
        full_name: impl Into<String>,
        email: impl Into<String>,
        school_id: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            email: email.into(),
            school_id: school_id.into(),
        }
    }

    /// Validate every field, collecting all failures.
    ///
    /// Input is taken as typed; nothing is trimmed.
    pub fn validate(&self) -> Result<Identity, IdentityError> {
        let mut errors = Vec::new();

        if self.full_name.chars().count() < MIN_FULL_NAME_CHARS {
            errors.push(FieldError::new(IdentityField::FullName, "sample John Doe"));
        }
        if !is_valid_email(&self.email) {
            errors.push(FieldError::new(
                IdentityField::Email,
                "sample: user@sample.com",
            ));
        }
        if self.school_id.chars().count() < MIN_SCHOOL_ID_CHARS {
            errors.push(FieldError::new(IdentityField::SchoolId, "sample U19-EEE-110"));
        }

        if !errors.is_empty() {
            return Err(IdentityError { errors });
        }

        Ok(Identity::from_parts(
            self.full_name.clone(),
            self.email.clone(),
            self.school_id.clone(),
        ))
    }

    /// Validate and produce the address of the role selection stage.
    ///
    /// No collaborator is contacted here.
    pub fn submit(&self) -> Result<WorkflowAddress, IdentityError> {
        let identity = self.validate()?;
        Ok(WorkflowAddress::role_selection(&identity))
    }
}
