//! Role assignment.

use anyhow::{bail, Context, Result};
use rollcall_core::{Role, RoleSelection, Stage, WorkflowAddress};
use serde_json::json;

use super::print_json;

/// Toggle `roles` in order on the stage at `address` and print the
/// enrollment address.
pub fn run(address: &str, roles: &[Role], json: bool) -> Result<()> {
    let address = WorkflowAddress::parse(address).context("Invalid role selection address")?;
    if address.stage() != Stage::RoleSelection {
        bail!("not a role selection address: {address}");
    }

    let mut selection = RoleSelection::mount(&address.token());
    for role in roles {
        selection.toggle(*role);
    }

    let next = match selection.submit() {
        Ok(next) => next,
        Err(e) => {
            if json {
                print_json(&json!({ "error": e.to_string() }))?;
            }
            return Err(e.into());
        }
    };

    if let Some(message) = selection.message() {
        eprintln!("{message}");
    }
    selection.transition_completed();

    tracing::debug!(roles = ?selection.roles().wire_names(), "roles assigned");

    if json {
        print_json(&json!({
            "address": next.to_string(),
            "roles": selection.roles(),
        }))?;
    } else {
        println!("{next}");
    }

    Ok(())
}
