//! Role tags and exclusivity rules.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role a person can hold in the access-control system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "Student")]
    Student,
    #[serde(rename = "Lecturer")]
    Lecturer,
    #[serde(rename = "QA_Admin")]
    QaAdmin,
    #[serde(rename = "Course_Admin")]
    CourseAdmin,
}

impl Role {
    /// Every role, in the order the selection stage offers them.
    pub const ALL: [Role; 4] = [
        Role::Student,
        Role::Lecturer,
        Role::QaAdmin,
        Role::CourseAdmin,
    ];

    /// Display tag, as offered to the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Lecturer => "Lecturer",
            Self::QaAdmin => "QA_Admin",
            Self::CourseAdmin => "Course_Admin",
        }
    }

    /// Lower-cased tag sent to the enrollment collaborator.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Lecturer => "lecturer",
            Self::QaAdmin => "qa_admin",
            Self::CourseAdmin => "course_admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised role tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        Role::ALL
            .into_iter()
            .find(|r| r.wire_name().eq_ignore_ascii_case(tag))
            .ok_or_else(|| UnknownRole(tag.to_string()))
    }
}

/// Reason a role set cannot advance past role selection.
///
/// Checks run in declaration order: emptiness before exclusivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum RoleValidationError {
    #[error("Please select at least one role.")]
    Empty,

    #[error("A user cannot be both an Admin and a Student.")]
    QaStudentConflict,

    #[error("A user cannot be a Lecturer and a Course_Admin")]
    LecturerCourseAdminConflict,
}

impl RoleValidationError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::QaStudentConflict => "qa_student_conflict",
            Self::LecturerCourseAdminConflict => "lecturer_course_admin_conflict",
        }
    }
}

/// Selected roles, kept in selection order without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSet(Vec<Role>);

impl RoleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the role if absent, remove it if present.
    pub fn toggle(&mut self, role: Role) {
        if let Some(pos) = self.0.iter().position(|r| *r == role) {
            self.0.remove(pos);
        } else {
            self.0.push(role);
        }
    }

    /// Add the role if absent.
    pub fn insert(&mut self, role: Role) {
        if !self.contains(role) {
            self.0.push(role);
        }
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.0.iter().copied()
    }

    /// Lower-cased tags in selection order.
    pub fn wire_names(&self) -> Vec<String> {
        self.iter().map(|r| r.wire_name().to_string()).collect()
    }

    /// Check the set may advance past role selection.
    pub fn validate(&self) -> Result<(), RoleValidationError> {
        if self.is_empty() {
            return Err(RoleValidationError::Empty);
        }
        if self.contains(Role::QaAdmin) && self.contains(Role::Student) {
            return Err(RoleValidationError::QaStudentConflict);
        }
        if self.contains(Role::Lecturer) && self.contains(Role::CourseAdmin) {
            return Err(RoleValidationError::LecturerCourseAdminConflict);
        }
        Ok(())
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        let mut set = RoleSet::new();
        for role in iter {
            set.insert(role);
        }
        set
    }
}
