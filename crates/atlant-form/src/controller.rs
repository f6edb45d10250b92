//! The form behind the lead modal.
//!
//! All methods are meant to be called from one event loop, one event at a
//! time. Submission is split in two so a loop never has to hold the
//! controller across the transport call:
//!
//! 1. [`LeadFormController::begin_submit`] validates, moves to
//!    [`SubmissionStatus::Submitting`] and hands out the [`LeadRecord`].
//! 2. The caller delivers it (or lets [`LeadFormController::spawn_submit`] do
//!    it) and feeds the result back through [`LeadFormController::complete`].
//!
//! [`LeadFormController::submit`] does both in one call.

use std::sync::Arc;

use atlant_core::{
    format_phone_input, validate_draft, Field, FieldErrors, LeadDraft, LeadRecord, LeadTransport,
    SubmitOutcome, TransportError,
};
use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::auto_close::AutoClose;
use crate::coordinator::{ModalCoordinator, VisibilityState};
use crate::host::HostPage;
use crate::settings::FormSettings;
use crate::status::SubmissionStatus;

/// Shown when a submission fails. The cause goes to the logs only.
pub const FAILURE_MESSAGE: &str =
    "We could not send your request. Please try again or call us directly.";

/// Why a submit did not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitBlocked {
    #[error("the lead form is not open")]
    Closed,

    #[error("a submission is already in flight")]
    InFlight,

    #[error("the form is showing a {0} result")]
    Finished(SubmissionStatus),

    #[error("{0} field(s) failed validation")]
    Invalid(usize),
}

/// A lead that has been handed out for delivery.
#[derive(Debug)]
pub struct PendingSubmission {
    attempt: u64,
    record: LeadRecord,
}

impl PendingSubmission {
    #[must_use]
    pub fn record(&self) -> &LeadRecord {
        &self.record
    }

    /// Pairs the transport's answer with this attempt.
    #[must_use]
    pub fn resolve(self, result: Result<SubmitOutcome, TransportError>) -> Completion {
        Completion {
            attempt: self.attempt,
            result,
        }
    }
}

/// A transport answer waiting to be applied with [`LeadFormController::complete`].
#[derive(Debug)]
pub struct Completion {
    attempt: u64,
    result: Result<SubmitOutcome, TransportError>,
}

pub struct LeadFormController<T, H>
where
    T: LeadTransport,
    H: HostPage,
{
    coordinator: ModalCoordinator,
    visibility: watch::Receiver<VisibilityState>,
    transport: Arc<T>,
    host: Arc<H>,
    settings: FormSettings,
    draft: LeadDraft,
    errors: FieldErrors,
    status: SubmissionStatus,
    /// Session currently rendered; `None` while closed.
    session: Option<u64>,
    /// Bumped on every submit and every reopen; completions carrying an older
    /// value are dropped.
    attempt: u64,
    auto_close: Option<AutoClose>,
}

impl<T, H> std::fmt::Debug for LeadFormController<T, H>
where
    T: LeadTransport,
    H: HostPage,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeadFormController")
            .field("session", &self.session)
            .field("status", &self.status)
            .field("errors", &self.errors)
            .field("attempt", &self.attempt)
            .finish_non_exhaustive()
    }
}

impl<T, H> LeadFormController<T, H>
where
    T: LeadTransport,
    H: HostPage,
{
    /// Creates the controller and immediately picks up the coordinator's
    /// current state.
    pub fn new(
        coordinator: &ModalCoordinator,
        transport: Arc<T>,
        host: Arc<H>,
        settings: FormSettings,
    ) -> Self {
        let mut controller = Self {
            coordinator: coordinator.clone(),
            visibility: coordinator.subscribe(),
            transport,
            host,
            settings,
            draft: LeadDraft::default(),
            errors: FieldErrors::default(),
            status: SubmissionStatus::Idle,
            session: None,
            attempt: 0,
            auto_close: None,
        };
        controller.sync_visibility();
        controller
    }

    // -----------------------------------------------------------------------
    // Visibility
    // -----------------------------------------------------------------------

    /// Applies the coordinator's latest state.
    ///
    /// A new session resets the draft, errors and status and locks page
    /// scroll; a close restores scroll. Returns whether anything changed.
    pub fn sync_visibility(&mut self) -> bool {
        let state = self.visibility.borrow_and_update().clone();

        match (state.is_open, self.session) {
            (true, Some(session)) if session == state.session => false,
            (true, _) => {
                self.start_session(&state);
                true
            }
            (false, Some(_)) => {
                self.end_session();
                true
            }
            (false, None) => false,
        }
    }

    /// Waits for the next open/close and applies it.
    pub async fn visibility_changed(&mut self) -> bool {
        if self.visibility.changed().await.is_err() {
            return false;
        }
        self.sync_visibility()
    }

    /// The modal's own close control.
    pub fn close(&mut self) {
        self.coordinator.close();
        self.sync_visibility();
    }

    fn start_session(&mut self, state: &VisibilityState) {
        tracing::info!(form_type = %state.form_type, session = state.session, "lead form opened");
        self.session = Some(state.session);
        self.draft = LeadDraft::default();
        self.errors = FieldErrors::default();
        self.status = SubmissionStatus::Idle;
        self.attempt += 1;
        self.auto_close = None;
        self.host.set_scroll_locked(true);
    }

    fn end_session(&mut self) {
        tracing::info!(status = %self.status, "lead form closed");
        self.session = None;
        self.auto_close = None;
        self.host.set_scroll_locked(false);
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.draft.name = value.into();
        self.errors.clear(Field::Name);
    }

    /// Stores the phone field through the display mask and returns what the
    /// input should now show.
    pub fn set_phone(&mut self, raw: &str) -> &str {
        self.draft.phone = format_phone_input(raw);
        self.errors.clear(Field::Phone);
        &self.draft.phone
    }

    /// Recomputes all field errors. Returns `true` when there are none.
    pub fn validate(&mut self) -> bool {
        match validate_draft(&self.draft) {
            Ok(_) => {
                self.errors = FieldErrors::default();
                true
            }
            Err(errors) => {
                self.errors = errors;
                false
            }
        }
    }

    /// Error -> Idle. The draft is kept for the retry.
    pub fn dismiss_error(&mut self) -> bool {
        if self.status != SubmissionStatus::Error {
            return false;
        }
        self.status = SubmissionStatus::Idle;
        true
    }

    // -----------------------------------------------------------------------
    // Submission
    // -----------------------------------------------------------------------

    /// Validates the draft and, if it passes, moves to `Submitting` and
    /// builds the lead stamped with the current time.
    ///
    /// # Errors
    ///
    /// See [`LeadFormController::begin_submit_at`].
    pub fn begin_submit(&mut self) -> Result<PendingSubmission, SubmitBlocked> {
        self.begin_submit_at(Utc::now())
    }

    /// Like [`LeadFormController::begin_submit`] with an explicit timestamp.
    ///
    /// # Errors
    ///
    /// - [`SubmitBlocked::Closed`] when the modal is not open.
    /// - [`SubmitBlocked::InFlight`] while a previous submit is pending.
    /// - [`SubmitBlocked::Finished`] while a Success or Error result is shown.
    /// - [`SubmitBlocked::Invalid`] when validation fails; the errors are then
    ///   available from [`LeadFormController::errors`] and the status stays
    ///   `Idle`.
    pub fn begin_submit_at(
        &mut self,
        submitted_at: DateTime<Utc>,
    ) -> Result<PendingSubmission, SubmitBlocked> {
        self.sync_visibility();
        if self.session.is_none() {
            return Err(SubmitBlocked::Closed);
        }
        match self.status {
            SubmissionStatus::Idle => {}
            SubmissionStatus::Submitting => return Err(SubmitBlocked::InFlight),
            finished @ (SubmissionStatus::Success | SubmissionStatus::Error) => {
                return Err(SubmitBlocked::Finished(finished));
            }
        }

        let lead = match validate_draft(&self.draft) {
            Ok(lead) => lead,
            Err(errors) => {
                let failed: Vec<&str> = errors.iter().map(|(field, _)| field.as_str()).collect();
                tracing::debug!(fields = ?failed, "lead form validation failed");
                let count = errors.len();
                self.errors = errors;
                return Err(SubmitBlocked::Invalid(count));
            }
        };
        self.errors = FieldErrors::default();

        let form_type = self.coordinator.current_state().form_type;
        let page = self.host.page_context();
        let record = LeadRecord::new(lead, &form_type, &self.settings.source, &page, submitted_at);

        self.attempt += 1;
        self.status = SubmissionStatus::Submitting;
        tracing::info!(form_type = %form_type, attempt = self.attempt, "submitting lead");

        Ok(PendingSubmission {
            attempt: self.attempt,
            record,
        })
    }

    /// Applies a transport answer.
    ///
    /// Answers for an attempt that is no longer current (the modal was
    /// reopened meanwhile) are ignored. Returns whether it was applied.
    pub fn complete(&mut self, completion: Completion) -> bool {
        if self.status != SubmissionStatus::Submitting || completion.attempt != self.attempt {
            tracing::debug!(
                attempt = completion.attempt,
                current = self.attempt,
                "ignoring stale lead submission result"
            );
            return false;
        }

        match completion.result {
            Ok(outcome) if outcome.success => {
                tracing::info!(lead_id = ?outcome.lead_id, "lead accepted");
                self.status = SubmissionStatus::Success;
                self.schedule_auto_close();
            }
            Ok(_) => {
                tracing::warn!("lead was not accepted by the CRM");
                self.status = SubmissionStatus::Error;
            }
            Err(err) => {
                tracing::error!(error = %err, "lead submission failed");
                self.status = SubmissionStatus::Error;
            }
        }
        true
    }

    /// Validates, delivers and applies the answer in one call.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitBlocked`] if the submission could not start; transport
    /// failures are not errors here, they end in
    /// [`SubmissionStatus::Error`].
    pub async fn submit(&mut self) -> Result<SubmissionStatus, SubmitBlocked> {
        let pending = self.begin_submit()?;
        let result = self.transport.submit_lead(pending.record()).await;
        self.complete(pending.resolve(result));
        Ok(self.status)
    }

    fn schedule_auto_close(&mut self) {
        if let Some(session) = self.session {
            self.auto_close = Some(AutoClose::schedule(
                self.coordinator.clone(),
                session,
                self.settings.auto_close_delay,
            ));
        }
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn draft(&self) -> &LeadDraft {
        &self.draft
    }

    #[must_use]
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    #[must_use]
    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    /// Whether the submit control should be enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.is_open() && self.status.accepts_submit()
    }

    #[must_use]
    pub fn form_type(&self) -> String {
        self.coordinator.current_state().form_type
    }

    #[must_use]
    pub fn settings(&self) -> &FormSettings {
        &self.settings
    }

    /// The direct-call number, formatted for display.
    #[must_use]
    pub fn contact_phone_display(&self) -> String {
        format_phone_input(&self.settings.contact_phone)
    }

    /// The generic failure text while in [`SubmissionStatus::Error`].
    #[must_use]
    pub fn failure_message(&self) -> Option<&'static str> {
        (self.status == SubmissionStatus::Error).then_some(FAILURE_MESSAGE)
    }
}

impl<T, H> LeadFormController<T, H>
where
    T: LeadTransport + 'static,
    H: HostPage,
{
    /// Starts a submission and delivers it on a separate task.
    ///
    /// The controller stays usable meanwhile (further submits are refused as
    /// [`SubmitBlocked::InFlight`]); await the handle and pass its output to
    /// [`LeadFormController::complete`].
    ///
    /// # Errors
    ///
    /// Same as [`LeadFormController::begin_submit`].
    pub fn spawn_submit(&mut self) -> Result<JoinHandle<Completion>, SubmitBlocked> {
        let pending = self.begin_submit()?;
        let transport = Arc::clone(&self.transport);
        Ok(tokio::spawn(async move {
            let result = transport.submit_lead(pending.record()).await;
            pending.resolve(result)
        }))
    }
}

impl<T, H> Drop for LeadFormController<T, H>
where
    T: LeadTransport,
    H: HostPage,
{
    fn drop(&mut self) {
        if self.session.is_some() {
            self.host.set_scroll_locked(false);
        }
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
