//! Biometric enrollment orchestrator.
//!
//! Drives the single long-running operation of the workflow: wait out the
//! sensor capture delay, then send one enrollment request.
//!
//! # Single flight
//!
//! State lives in a [`watch`] channel. Starting a bind is one atomic
//! check-and-set on that channel (`Idle | Failed` to `Binding`), so any
//! number of concurrent triggers collapse into the one in-flight bind.
//!
//! # Ordering
//!
//! On success the enrollment record is written before the state becomes
//! [`EnrollmentState::Succeeded`]; anything that observes success also
//! observes the record.
//!
//! # Abandonment
//!
//! There is no cancellation. If the bind future is dropped mid-flight the
//! state falls back to [`EnrollmentState::Failed`], nothing is recorded and
//! nothing is sent to compensate.

mod state;

pub use state::{EnrollmentState, NextAction};

use rollcall_core::carrier::WorkflowToken;
use tokio::sync::watch;
use tracing::Instrument;
use uuid::Uuid;

use crate::collaborator::{EnrollmentCollaborator, EnrollmentRequest, TransportError};
use crate::guard::{check_enrollment, record_enrollment, GuardDecision};
use crate::latency::Latency;
use crate::store::LocalStore;

/// Result of a bind trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindOutcome {
    /// The collaborator accepted the enrollment.
    Enrolled,
    /// The bind ran and failed; the operator may retry.
    Failed(TransportError),
    /// No bind was started; the state did not allow one.
    Refused(EnrollmentState),
}

/// Enrollment stage for one decoded workflow token.
pub struct Orchestrator<S, C, L> {
    token: WorkflowToken,
    request: EnrollmentRequest,
    store: S,
    collaborator: C,
    latency: L,
    state: watch::Sender<EnrollmentState>,
}

impl<S, C, L> Orchestrator<S, C, L>
where
    S: LocalStore,
    C: EnrollmentCollaborator,
    L: Latency,
{
    /// Mount the stage.
    ///
    /// An empty role list pre-empts everything else. Otherwise the guard is
    /// consulted once; a covering record short-circuits to
    /// [`EnrollmentState::AlreadyEnrolled`] without any request.
    pub fn mount(token: WorkflowToken, store: S, collaborator: C, latency: L) -> Self {
        let school_id = token.identity().school_id();

        let initial = if !token.has_roles() {
            EnrollmentState::NoRoles
        } else {
            match check_enrollment(&store, school_id) {
                GuardDecision::AlreadyEnrolled => EnrollmentState::AlreadyEnrolled,
                GuardDecision::NotEnrolled => EnrollmentState::Idle,
            }
        };

        tracing::debug!(
            sch_id = %school_id,
            roles = ?token.roles(),
            state = ?initial,
            "enrollment stage mounted"
        );

        let request = EnrollmentRequest::from_token(&token);
        let (state, _) = watch::channel(initial);

        Self {
            token,
            request,
            store,
            collaborator,
            latency,
            state,
        }
    }

    pub fn token(&self) -> &WorkflowToken {
        &self.token
    }

    pub fn state(&self) -> EnrollmentState {
        *self.state.borrow()
    }

    /// Watch state transitions.
    pub fn subscribe(&self) -> watch::Receiver<EnrollmentState> {
        self.state.subscribe()
    }

    /// Returns true if a bind trigger would start a bind right now.
    pub fn can_bind(&self) -> bool {
        self.state.borrow().can_bind()
    }

    /// Trigger the bind.
    ///
    /// Refused unless the stage is `Idle` or `Failed`. Errors are reported
    /// through the returned outcome and the `Failed` state, never retried.
    pub async fn bind(&self) -> BindOutcome {
        let mut refused_in = None;
        let started = self.state.send_if_modified(|state| {
            if state.can_bind() {
                *state = EnrollmentState::Binding;
                true
            } else {
                refused_in = Some(*state);
                false
            }
        });

        if !started {
            let state = refused_in.unwrap_or(EnrollmentState::Binding);
            tracing::debug!(state = ?state, "bind trigger ignored");
            return BindOutcome::Refused(state);
        }

        let span = tracing::info_span!(
            "bind",
            attempt = %Uuid::new_v4(),
            sch_id = %self.request.sch_id,
        );

        self.run_bind().instrument(span).await
    }

    async fn run_bind(&self) -> BindOutcome {
        let flight = InFlight::new(&self.state);

        tracing::info!("waiting for fingerprint capture");
        self.latency.wait().await;

        match self.collaborator.create_enrollment(&self.request).await {
            Ok(receipt) => {
                tracing::debug!(status = receipt.status, body = ?receipt.body, "enrollment accepted");

                if let Err(e) = record_enrollment(&self.store, &self.request.sch_id) {
                    tracing::warn!(error = %e, "enrollment record not saved");
                }

                flight.settle(EnrollmentState::Succeeded);
                tracing::info!("user enrolled");
                BindOutcome::Enrolled
            }
            Err(e) => {
                tracing::warn!(error = %e, "enrollment failed");
                flight.settle(EnrollmentState::Failed);
                BindOutcome::Failed(e)
            }
        }
    }
}

/// Marks a bind in flight; falls back to `Failed` if dropped unsettled.
struct InFlight<'a> {
    state: &'a watch::Sender<EnrollmentState>,
    settled: bool,
}

impl<'a> InFlight<'a> {
    fn new(state: &'a watch::Sender<EnrollmentState>) -> Self {
        Self {
            state,
            settled: false,
        }
    }

    fn settle(mut self, next: EnrollmentState) {
        self.state.send_replace(next);
        self.settled = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::warn!("bind abandoned before completion");
            self.state.send_replace(EnrollmentState::Failed);
        }
    }
}
