//! Identity capture.

use anyhow::Result;
use rollcall_core::IdentityForm;
use serde_json::json;

use super::print_json;

/// Validate the identity and print the role selection address.
pub fn run(form: IdentityForm, json: bool) -> Result<()> {
    let address = match form.submit() {
        Ok(address) => address,
        Err(e) => {
            if json {
                print_json(&json!({ "errors": e.errors }))?;
            } else {
                for error in &e.errors {
                    eprintln!("{}: {}", error.field, error.message);
                }
            }
            return Err(e.into());
        }
    };

    tracing::debug!(sch_id = %form.school_id, "identity captured");

    if json {
        print_json(&json!({ "address": address.to_string() }))?;
    } else {
        println!("{address}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_bad_field_is_reported() {
        let err = run(IdentityForm::new("A", "not-an-email", "U"), false).unwrap_err();
        let err = err.downcast::<rollcall_core::IdentityError>().unwrap();
        assert_eq!(err.errors.len(), 3);
    }

    #[test]
    fn test_valid_identity_is_accepted() {
        run(IdentityForm::new("Ada Obi", "ada@afit.edu.ng", "U19-EEE-110"), true).unwrap();
    }
}
