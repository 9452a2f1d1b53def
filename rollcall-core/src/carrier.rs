//! Workflow state carrier.
//!
//! Stages hold no session. Identity and roles travel between stages in the
//! query string of the next stage's address, so any stage can be entered
//! from back/forward navigation, a reload, or a hand-built link.
//!
//! Wire format (query parameters):
//! - `fullname`, `email`
//! - `schID` on the hop into role selection, `schId` on the hop into
//!   biometric enrollment
//! - `roles`: comma-joined role tags
//!
//! Encoding is `application/x-www-form-urlencoded`. Decoding is total:
//! missing fields become empty strings and malformed role lists degrade to
//! fewer (possibly zero) roles.

use std::fmt;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use url::form_urlencoded;

use crate::identity::Identity;
use crate::role::{Role, RoleSet};

/// Characters escaped inside a path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

const DASHBOARD_SEGMENT: &str = "dashboard";
const ASSIGN_ROLES_SEGMENT: &str = "assign_roles";
const ENROLL_FINGERPRINT_SEGMENT: &str = "enroll_fingerprint";

pub const PARAM_FULL_NAME: &str = "fullname";
pub const PARAM_EMAIL: &str = "email";
/// School ID spelling on the hop into role selection.
pub const PARAM_SCHOOL_ID_UPPER: &str = "schID";
/// School ID spelling on the hop into biometric enrollment.
pub const PARAM_SCHOOL_ID: &str = "schId";
pub const PARAM_ROLES: &str = "roles";

/// Errors raised while parsing an address.
///
/// Only the path can be wrong; query decoding never fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CarrierError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("address does not name a workflow stage: {0}")]
    UnknownStage(String),
}

/// A navigable stage of the onboarding workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    IdentityCapture,
    RoleSelection,
    BiometricEnrollment,
    /// Exit point after a completed enrollment.
    Dashboard,
}

impl Stage {
    /// Returns true if the stage's path carries a `{userId}` segment.
    pub fn has_user_segment(&self) -> bool {
        matches!(self, Self::RoleSelection | Self::BiometricEnrollment)
    }
}

/// Address of a stage plus the state it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowAddress {
    stage: Stage,
    /// Path segment naming the user, for per-user stages.
    user_id: Option<String>,
    /// Query pairs in emission order.
    params: Vec<(String, String)>,
}

impl WorkflowAddress {
    fn new(stage: Stage, user_id: Option<String>, params: Vec<(String, String)>) -> Self {
        Self {
            stage,
            user_id,
            params,
        }
    }

    /// Start of the workflow.
    pub fn identity_capture() -> Self {
        Self::new(Stage::IdentityCapture, None, Vec::new())
    }

    /// Exit of the workflow.
    pub fn dashboard() -> Self {
        Self::new(Stage::Dashboard, None, Vec::new())
    }

    /// Hand a captured identity to role selection.
    pub fn role_selection(identity: &Identity) -> Self {
        Self::new(
            Stage::RoleSelection,
            Some(identity.school_id().to_string()),
            vec![
                (PARAM_FULL_NAME.into(), identity.full_name().into()),
                (PARAM_EMAIL.into(), identity.email().into()),
                (PARAM_SCHOOL_ID_UPPER.into(), identity.school_id().into()),
            ],
        )
    }

    /// Hand identity and validated roles to biometric enrollment.
    pub fn biometric_enrollment(identity: &Identity, roles: &RoleSet) -> Self {
        let joined = roles.iter().map(|r| r.as_str()).collect::<Vec<_>>().join(",");
        Self::new(
            Stage::BiometricEnrollment,
            Some(identity.school_id().to_string()),
            vec![
                (PARAM_FULL_NAME.into(), identity.full_name().into()),
                (PARAM_EMAIL.into(), identity.email().into()),
                (PARAM_SCHOOL_ID.into(), identity.school_id().into()),
                (PARAM_ROLES.into(), joined),
            ],
        )
    }

    /// Parse an address, relative (`/dashboard/...`) or absolute.
    ///
    /// The path is split as written. Dot segments and backslashes are not
    /// normalized, so a `{userId}` segment always decodes to the ID that
    /// was rendered into it.
    pub fn parse(input: &str) -> Result<Self, CarrierError> {
        let input = input.trim();
        let without_fragment = input.split_once('#').map_or(input, |(head, _)| head);
        let (target, query) = without_fragment
            .split_once('?')
            .unwrap_or((without_fragment, ""));

        let path = match target.split_once("://") {
            Some((_, rest)) => {
                let (authority, path) = rest.split_at(rest.find('/').unwrap_or(rest.len()));
                if authority.is_empty() {
                    return Err(CarrierError::InvalidAddress(input.to_string()));
                }
                path
            }
            None => target,
        };

        let trimmed = path.trim_matches('/');
        let segments: Vec<String> = if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed
                .split('/')
                .map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned())
                .collect()
        };

        let unknown = || CarrierError::UnknownStage(path.to_string());

        let (stage, user_id) = match segments.as_slice() {
            [d] if d == DASHBOARD_SEGMENT => (Stage::Dashboard, None),
            [d, u, e] if is_enrollments_root(d, u, e) => (Stage::IdentityCapture, None),
            [d, u, e, id, leaf] if is_enrollments_root(d, u, e) => {
                let stage = match leaf.as_str() {
                    ASSIGN_ROLES_SEGMENT => Stage::RoleSelection,
                    ENROLL_FINGERPRINT_SEGMENT => Stage::BiometricEnrollment,
                    _ => return Err(unknown()),
                };
                (stage, Some(id.clone()))
            }
            _ => return Err(unknown()),
        };

        let params = form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();

        Ok(Self::new(stage, user_id, params))
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// The `{userId}` path segment, if the stage has one.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// First value of a query parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Decode the carried state. Never fails.
    pub fn token(&self) -> WorkflowToken {
        let school_id = match self.stage {
            // role selection trusts the path segment, as the capture stage
            // routes by school ID
            Stage::RoleSelection => self
                .user_id()
                .filter(|id| !id.is_empty())
                .or_else(|| self.param(PARAM_SCHOOL_ID_UPPER))
                .or_else(|| self.param(PARAM_SCHOOL_ID)),
            _ => self
                .param(PARAM_SCHOOL_ID)
                .or_else(|| self.param(PARAM_SCHOOL_ID_UPPER))
                .or_else(|| self.user_id()),
        };

        let identity = Identity::from_parts(
            self.param(PARAM_FULL_NAME).unwrap_or_default(),
            self.param(PARAM_EMAIL).unwrap_or_default(),
            school_id.unwrap_or_default(),
        );

        WorkflowToken {
            identity,
            roles: normalize_roles(self.param(PARAM_ROLES).unwrap_or_default()),
        }
    }
}

fn is_dot_segment(segment: &str) -> bool {
    segment == "." || segment == ".."
}

fn is_enrollments_root(dashboard: &str, users: &str, enrollments: &str) -> bool {
    dashboard == DASHBOARD_SEGMENT && users == "users" && enrollments == "enrollments"
}

impl fmt::Display for WorkflowAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.stage, self.user_id.as_deref()) {
            (Stage::Dashboard, _) => f.write_str("/dashboard/")?,
            (Stage::IdentityCapture, _) => f.write_str("/dashboard/users/enrollments/")?,
            (stage, user_id) => {
                let leaf = if stage == Stage::RoleSelection {
                    ASSIGN_ROLES_SEGMENT
                } else {
                    ENROLL_FINGERPRINT_SEGMENT
                };
                let user_id = user_id.unwrap_or_default();
                f.write_str("/dashboard/users/enrollments/")?;
                if is_dot_segment(user_id) {
                    // `.` and `..` would be collapsed by any URL resolver
                    f.write_str(&"%2E".repeat(user_id.len()))?;
                } else {
                    write!(f, "{}", utf8_percent_encode(user_id, PATH_SEGMENT))?;
                }
                write!(f, "/{leaf}")?;
            }
        }

        if !self.params.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(&self.params)
                .finish();
            write!(f, "?{query}")?;
        }

        Ok(())
    }
}

/// Normalize a carried role list.
///
/// The value is percent-decoded once more (hand-built links are often
/// double-encoded), split on commas, trimmed and lower-cased. Empty
/// entries are dropped.
pub fn normalize_roles(raw: &str) -> Vec<String> {
    percent_decode_str(raw)
        .decode_utf8_lossy()
        .split(',')
        .map(|r| r.trim().to_lowercase())
        .filter(|r| !r.is_empty())
        .collect()
}

/// Identity and roles decoded from an address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowToken {
    identity: Identity,
    /// Lower-cased role tags, possibly empty.
    roles: Vec<String>,
}

impl WorkflowToken {
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Normalized (lower-cased) role tags, in carried order.
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    pub fn has_roles(&self) -> bool {
        !self.roles.is_empty()
    }

    /// Carried tags that name a known role.
    pub fn role_set(&self) -> RoleSet {
        self.roles
            .iter()
            .filter_map(|r| r.parse::<Role>().ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::IdentityForm;
    use crate::role::tests::all_subsets;

    fn identity() -> Identity {
        IdentityForm::new("Ada Obi", "ada@afit.edu.ng", "U19-EEE-110")
            .validate()
            .unwrap()
    }

    fn roles(list: &[Role]) -> RoleSet {
        list.iter().copied().collect()
    }

    #[test]
    fn test_biometric_address_encodes_roles_comma_joined() {
        let address = WorkflowAddress::biometric_enrollment(&identity(), &roles(&[Role::Lecturer]));
        assert_eq!(
            address.to_string(),
            "/dashboard/users/enrollments/U19-EEE-110/enroll_fingerprint?fullname=Ada+Obi&email=ada%40afit.edu.ng&schId=U19-EEE-110&roles=Lecturer"
        );

        let token = WorkflowAddress::parse(&address.to_string()).unwrap().token();
        assert_eq!(token.roles(), ["lecturer"]);
    }

    #[test]
    fn test_roundtrip_preserves_every_valid_role_set() {
        let plain = identity();
        let awkward = Identity::from_parts("Ada + Obi & Co, 100%", "a+b&c%d,e@x.io", "U19-EEE-110");

        for set in all_subsets().filter(|s| s.validate().is_ok()) {
            for identity in [&plain, &awkward] {
                let encoded = WorkflowAddress::biometric_enrollment(identity, &set).to_string();
                let decoded = WorkflowAddress::parse(&encoded).unwrap();
                assert_eq!(decoded.stage(), Stage::BiometricEnrollment);

                let token = decoded.token();
                assert_eq!(token.identity(), identity, "{encoded}");
                assert_eq!(token.roles(), set.wire_names().as_slice(), "{encoded}");
                assert_eq!(token.role_set(), set);
            }
        }
    }

    #[test]
    fn test_roundtrip_preserves_reserved_school_ids() {
        let ids = [
            "U19\\EEE", "..", "...", "a..b", "U19/EEE", "U19 EEE", "A&B", "A+B", "100%", "%2e%2e",
            "U19?x#y",
        ];

        for id in ids {
            let identity = Identity::from_parts("Ada Obi", "ada@afit.edu.ng", id);

            let selection = WorkflowAddress::role_selection(&identity).to_string();
            let parsed = WorkflowAddress::parse(&selection).unwrap();
            assert_eq!(parsed.stage(), Stage::RoleSelection, "{selection}");
            assert_eq!(parsed.user_id(), Some(id), "{selection}");
            assert_eq!(parsed.token().identity(), &identity, "{selection}");

            let enrollment =
                WorkflowAddress::biometric_enrollment(&identity, &roles(&[Role::Student]))
                    .to_string();
            let parsed = WorkflowAddress::parse(&enrollment).unwrap();
            assert_eq!(parsed.stage(), Stage::BiometricEnrollment, "{enrollment}");
            assert_eq!(parsed.user_id(), Some(id), "{enrollment}");
            assert_eq!(parsed.token().identity(), &identity, "{enrollment}");
        }
    }

    #[test]
    fn test_dot_segments_are_escaped() {
        let identity = Identity::from_parts("Ada", "a@b.io", "..");
        assert!(WorkflowAddress::role_selection(&identity)
            .to_string()
            .starts_with("/dashboard/users/enrollments/%2E%2E/assign_roles?"));
    }

    #[test]
    fn test_absolute_address_without_host_is_invalid() {
        assert!(matches!(
            WorkflowAddress::parse("http:///dashboard/"),
            Err(CarrierError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_role_selection_reads_school_id_from_path() {
        let address = WorkflowAddress::parse(
            "/dashboard/users/enrollments/U19-EEE-110/assign_roles?fullname=Ada&email=a%40b.io&schID=other",
        )
        .unwrap();
        assert_eq!(address.stage(), Stage::RoleSelection);
        assert_eq!(address.token().identity().school_id(), "U19-EEE-110");
    }

    #[test]
    fn test_biometric_stage_reads_lowercase_spelling() {
        let address = WorkflowAddress::parse(
            "/dashboard/users/enrollments/X/enroll_fingerprint?schId=U19-EEE-110&roles=student",
        )
        .unwrap();
        assert_eq!(address.token().identity().school_id(), "U19-EEE-110");
    }

    #[test]
    fn test_missing_fields_decode_as_empty() {
        let address =
            WorkflowAddress::parse("/dashboard/users/enrollments/U1/enroll_fingerprint").unwrap();
        let token = address.token();
        assert_eq!(token.identity().full_name(), "");
        assert_eq!(token.identity().email(), "");
        assert_eq!(token.identity().school_id(), "U1");
        assert!(!token.has_roles());
    }

    #[test]
    fn test_empty_roles_param_yields_no_roles() {
        let address =
            WorkflowAddress::parse("/dashboard/users/enrollments/U1/enroll_fingerprint?roles=")
                .unwrap();
        assert!(address.token().roles().is_empty());
        assert!(address.token().role_set().is_empty());
    }

    #[test]
    fn test_roles_are_trimmed_lowercased_and_filtered() {
        assert_eq!(
            normalize_roles(" Student ,, QA_Admin,  ,lecturer"),
            vec!["student", "qa_admin", "lecturer"]
        );
        // double-encoded comma from a hand-built link
        assert_eq!(normalize_roles("Student%2CLecturer"), vec!["student", "lecturer"]);
        // malformed escapes pass through
        assert_eq!(normalize_roles("%ZZ"), vec!["%zz"]);
    }

    #[test]
    fn test_unknown_tags_are_carried_but_not_typed() {
        let address = WorkflowAddress::parse(
            "/dashboard/users/enrollments/U1/enroll_fingerprint?roles=student%2Cjanitor",
        )
        .unwrap();
        let token = address.token();
        assert_eq!(token.roles(), ["student", "janitor"]);
        assert_eq!(token.role_set().iter().collect::<Vec<_>>(), vec![Role::Student]);
    }

    #[test]
    fn test_absolute_addresses_parse() {
        let address = WorkflowAddress::parse(
            "https://admin.example.edu/dashboard/users/enrollments/U1/assign_roles?fullname=Ada",
        )
        .unwrap();
        assert_eq!(address.stage(), Stage::RoleSelection);
        assert_eq!(address.param(PARAM_FULL_NAME), Some("Ada"));
    }

    #[test]
    fn test_terminal_addresses_render() {
        assert_eq!(WorkflowAddress::identity_capture().to_string(), "/dashboard/users/enrollments/");
        assert_eq!(WorkflowAddress::dashboard().to_string(), "/dashboard/");
        assert_eq!(
            WorkflowAddress::parse("/dashboard").unwrap().stage(),
            Stage::Dashboard
        );
        assert_eq!(
            WorkflowAddress::parse("/dashboard/users/enrollments").unwrap().stage(),
            Stage::IdentityCapture
        );
    }

    #[test]
    fn test_unknown_paths_are_rejected() {
        for bad in ["/", "/dashboard/courses/register", "/dashboard/users/enrollments/U1/delete"] {
            assert!(
                matches!(WorkflowAddress::parse(bad), Err(CarrierError::UnknownStage(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_user_segment_is_escaped() {
        let id = IdentityForm::new("Ada", "a@b.io", "U19/EEE 110").validate().unwrap();
        let address = WorkflowAddress::role_selection(&id);
        let rendered = address.to_string();
        assert!(rendered.starts_with("/dashboard/users/enrollments/U19%2FEEE%20110/assign_roles?"));

        let parsed = WorkflowAddress::parse(&rendered).unwrap();
        assert_eq!(parsed.user_id(), Some("U19/EEE 110"));
    }
}
