//! Biometric enrollment.
//!
//! Mounts the enrollment stage for an address, reports every status change,
//! and triggers the bind once. Running the command again is the retry.

use anyhow::{bail, Context, Result};
use rollcall_core::{Stage, WorkflowAddress};
use rollcall_enroll::{
    BindOutcome, EnrollmentCollaborator, EnrollmentState, FixedLatency, Latency, LocalStore,
    Orchestrator,
};
use serde_json::json;

use super::print_json;
use crate::config::Config;
use crate::http::HttpCollaborator;
use crate::store::FileStore;

pub async fn run(config: &Config, address: &str, json: bool) -> Result<()> {
    let address = WorkflowAddress::parse(address).context("Invalid enrollment address")?;
    if address.stage() != Stage::BiometricEnrollment {
        bail!("not an enrollment address: {address}");
    }

    let store = FileStore::open(config.store_path()?);
    let collaborator = HttpCollaborator::new(&config.api_base_url, config.http_timeout())
        .context("Failed to build HTTP client")?;

    tracing::debug!(
        store = %store.path().display(),
        endpoint = %collaborator.endpoint(),
        "mounting enrollment stage"
    );

    let orchestrator = Orchestrator::mount(
        address.token(),
        store,
        collaborator,
        FixedLatency(config.sensor_latency()),
    );

    drive(&orchestrator, json).await
}

/// Report the mount state, bind if allowed, and report the outcome.
async fn drive<S, C, L>(orchestrator: &Orchestrator<S, C, L>, json: bool) -> Result<()>
where
    S: LocalStore,
    C: EnrollmentCollaborator,
    L: Latency,
{
    let mut rx = orchestrator.subscribe();
    report(*rx.borrow_and_update(), json)?;

    if !orchestrator.can_bind() {
        return finish(orchestrator.state(), json);
    }

    let outcome = {
        let bind = orchestrator.bind();
        tokio::pin!(bind);

        loop {
            tokio::select! {
                outcome = &mut bind => break Some(outcome),
                changed = rx.changed() => {
                    if changed.is_ok() {
                        report(*rx.borrow_and_update(), json)?;
                    }
                }
                _ = tokio::signal::ctrl_c() => break None,
            }
        }
    };

    if rx.has_changed().unwrap_or(false) {
        report(*rx.borrow_and_update(), json)?;
    }

    match outcome {
        Some(BindOutcome::Enrolled) | Some(BindOutcome::Refused(_)) => {
            finish(orchestrator.state(), json)
        }
        Some(BindOutcome::Failed(e)) => Err(e).context("Enrollment failed"),
        None => bail!("enrollment interrupted; run the command again to retry"),
    }
}

fn finish(state: EnrollmentState, json: bool) -> Result<()> {
    match state {
        EnrollmentState::NoRoles => bail!("nothing to enroll: the address carries no roles"),
        state if state.is_enrolled() => report_next_actions(state, json),
        _ => Ok(()),
    }
}

fn report(state: EnrollmentState, json: bool) -> Result<()> {
    if json {
        print_json(&json!({
            "state": state_name(state),
            "status": state.status_text(),
        }))
    } else {
        println!("{}", state.status_text());
        Ok(())
    }
}

fn report_next_actions(state: EnrollmentState, json: bool) -> Result<()> {
    let actions = state.next_actions();

    if json {
        let next: Vec<_> = actions
            .iter()
            .map(|a| json!({ "label": a.label(), "address": a.address().to_string() }))
            .collect();
        return print_json(&json!({ "next": next }));
    }

    for action in actions {
        println!("{}: {}", action.label(), action.address());
    }
    Ok(())
}

fn state_name(state: EnrollmentState) -> &'static str {
    match state {
        EnrollmentState::Idle => "idle",
        EnrollmentState::Binding => "binding",
        EnrollmentState::Succeeded => "succeeded",
        EnrollmentState::AlreadyEnrolled => "already_enrolled",
        EnrollmentState::Failed => "failed",
        EnrollmentState::NoRoles => "no_roles",
    }
}
