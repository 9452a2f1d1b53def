//! CLI commands.
//!
//! Each stage of the onboarding workflow has one command. Stages hand off
//! through the address printed on stdout; diagnostics go to stderr.

pub mod capture;
pub mod enroll;
pub mod roles;
pub mod status;

/// Print a JSON value as one line on stdout.
pub(crate) fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}
