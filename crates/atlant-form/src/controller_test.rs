use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use atlant_core::FieldError;
use chrono::TimeZone;

use super::*;
use crate::host::FixedPage;

/// Answers submissions from a script and records what it was sent.
/// Once the script runs out every lead is accepted.
#[derive(Default)]
struct ScriptedTransport {
    answers: Mutex<VecDeque<Result<SubmitOutcome, TransportError>>>,
    received: Mutex<Vec<LeadRecord>>,
}

impl ScriptedTransport {
    fn answering(answers: Vec<Result<SubmitOutcome, TransportError>>) -> Arc<Self> {
        Arc::new(Self {
            answers: Mutex::new(answers.into()),
            received: Mutex::default(),
        })
    }

    fn received(&self) -> Vec<LeadRecord> {
        self.received.lock().unwrap().clone()
    }
}

impl LeadTransport for ScriptedTransport {
    async fn submit_lead(&self, record: &LeadRecord) -> Result<SubmitOutcome, TransportError> {
        self.received.lock().unwrap().push(record.clone());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(SubmitOutcome::accepted(None)))
    }
}

type Controller = LeadFormController<ScriptedTransport, FixedPage>;

struct Harness {
    coordinator: ModalCoordinator,
    transport: Arc<ScriptedTransport>,
    page: Arc<FixedPage>,
    controller: Controller,
}

fn harness(answers: Vec<Result<SubmitOutcome, TransportError>>) -> Harness {
    let coordinator = ModalCoordinator::new();
    let transport = ScriptedTransport::answering(answers);
    let page = Arc::new(FixedPage::new(
        "https://atlant-metall.kz/#contact",
        "Mozilla/5.0 (test)",
    ));
    let controller = LeadFormController::new(
        &coordinator,
        Arc::clone(&transport),
        Arc::clone(&page),
        FormSettings::default(),
    );
    Harness {
        coordinator,
        transport,
        page,
        controller,
    }
}

fn open(h: &mut Harness, form_type: &str) {
    h.coordinator.open(form_type);
    h.controller.sync_visibility();
}

fn fill_valid(controller: &mut Controller) {
    controller.set_name("Ivan");
    controller.set_phone("89991234567");
}

fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 20, 8, 30, 0).unwrap()
}

// -----------------------------------------------------------------------
// Visibility
// -----------------------------------------------------------------------

#[test]
fn starts_closed_and_unlocked() {
    let h = harness(vec![]);
    assert!(!h.controller.is_open());
    assert!(!h.page.is_scroll_locked());
    assert_eq!(h.controller.status(), SubmissionStatus::Idle);
}

#[test]
fn picks_up_already_open_modal_on_creation() {
    let coordinator = ModalCoordinator::new();
    coordinator.open("hero");
    let page = Arc::new(FixedPage::default());
    let controller = LeadFormController::new(
        &coordinator,
        ScriptedTransport::answering(vec![]),
        Arc::clone(&page),
        FormSettings::default(),
    );
    assert!(controller.is_open());
    assert!(page.is_scroll_locked());
}

#[test]
fn opening_locks_scroll_and_closing_restores_it() {
    let mut h = harness(vec![]);
    open(&mut h, "hero");
    assert!(h.controller.is_open());
    assert!(h.page.is_scroll_locked());

    h.controller.close();
    assert!(!h.controller.is_open());
    assert!(!h.coordinator.is_open());
    assert!(!h.page.is_scroll_locked());
}

#[test]
fn reopening_resets_draft_errors_and_status() {
    let mut h = harness(vec![]);
    open(&mut h, "hero");
    h.controller.set_name("Ivan");
    h.controller.set_phone("12");
    assert!(!h.controller.validate());

    h.controller.close();
    open(&mut h, "hero");

    assert_eq!(h.controller.draft(), &LeadDraft::default());
    assert!(h.controller.errors().is_empty());
    assert_eq!(h.controller.status(), SubmissionStatus::Idle);
}

#[test]
fn reopen_is_detected_even_if_close_was_missed() {
    let mut h = harness(vec![]);
    open(&mut h, "hero");
    h.controller.set_name("Ivan");

    h.coordinator.close();
    h.coordinator.open("footer");
    assert!(h.controller.sync_visibility());

    assert_eq!(h.controller.draft().name, "");
    assert_eq!(h.controller.form_type(), "footer");
}

#[test]
fn open_while_open_changes_form_type_but_keeps_draft() {
    let mut h = harness(vec![]);
    open(&mut h, "hero");
    fill_valid(&mut h.controller);

    h.coordinator.open("calculator");
    assert!(!h.controller.sync_visibility());

    assert_eq!(h.controller.draft().name, "Ivan");
    assert_eq!(h.controller.form_type(), "calculator");
    let pending = h.controller.begin_submit_at(fixed_time()).unwrap();
    assert_eq!(pending.record().form_type(), "calculator");
}

#[tokio::test]
async fn visibility_changed_waits_for_coordinator() {
    let mut h = harness(vec![]);
    h.coordinator.open("hero");
    assert!(h.controller.visibility_changed().await);
    assert!(h.controller.is_open());
}

#[test]
fn dropping_the_controller_restores_scroll() {
    let mut h = harness(vec![]);
    open(&mut h, "hero");
    assert!(h.page.is_scroll_locked());

    let Harness { page, controller, .. } = h;
    drop(controller);
    assert!(!page.is_scroll_locked());
}

// -----------------------------------------------------------------------
// Editing and validation
// -----------------------------------------------------------------------

#[test]
fn set_phone_applies_display_mask() {
    let mut h = harness(vec![]);
    open(&mut h, "hero");
    assert_eq!(h.controller.set_phone("8999123"), "+7 (999) 123");
    assert_eq!(h.controller.set_phone("+7 (999) 1234567"), "+7 (999) 123-45-67");
    assert_eq!(h.controller.draft().phone, "+7 (999) 123-45-67");
}

#[test]
fn editing_a_field_clears_only_its_error() {
    let mut h = harness(vec![]);
    open(&mut h, "hero");
    h.controller.set_phone("1");
    assert!(!h.controller.validate());
    assert_eq!(h.controller.errors().len(), 2);

    h.controller.set_name("Ivan");
    assert_eq!(h.controller.errors().get(Field::Name), None);
    assert_eq!(
        h.controller.errors().get(Field::Phone),
        Some(FieldError::Format)
    );

    h.controller.set_phone("12");
    assert!(h.controller.errors().is_empty());
}

#[test]
fn invalid_submit_stays_idle_and_skips_transport() {
    let mut h = harness(vec![]);
    open(&mut h, "hero");
    h.controller.set_phone("89991234567");

    let result = h.controller.begin_submit();

    assert_eq!(result.unwrap_err(), SubmitBlocked::Invalid(1));
    assert_eq!(h.controller.status(), SubmissionStatus::Idle);
    assert_eq!(
        h.controller.errors().get(Field::Name),
        Some(FieldError::Required(Field::Name))
    );
    assert!(h.transport.received().is_empty());
}

#[test]
fn submit_requires_open_modal() {
    let mut h = harness(vec![]);
    fill_valid(&mut h.controller);
    assert_eq!(
        h.controller.begin_submit().unwrap_err(),
        SubmitBlocked::Closed
    );
}

// -----------------------------------------------------------------------
// Submission lifecycle
// -----------------------------------------------------------------------

#[tokio::test]
async fn record_is_built_from_draft_trigger_and_page() {
    let mut h = harness(vec![]);
    open(&mut h, "Заказ звонка!");
    h.controller.set_name("  Ivan Petrov ");
    h.controller.set_phone("8 999 123 45 67");

    let pending = h.controller.begin_submit_at(fixed_time()).unwrap();
    let record = pending.record();

    assert_eq!(record.name(), "Ivan Petrov");
    assert_eq!(record.phone(), "+79991234567");
    assert_eq!(record.form_type(), "Заказ звонка!");
    assert_eq!(record.comment(), "");
    assert_eq!(record.source(), "Сайт АТЛАНТ МЕТАЛЛ");
    assert_eq!(record.origin_url(), "https://atlant-metall.kz/#contact");
    assert_eq!(record.user_agent(), "Mozilla/5.0 (test)");
    assert_eq!(record.submitted_at(), fixed_time());
}

#[tokio::test]
async fn success_walks_idle_submitting_success() {
    let mut h = harness(vec![]);
    open(&mut h, "hero");
    fill_valid(&mut h.controller);
    assert_eq!(h.controller.status(), SubmissionStatus::Idle);
    assert!(h.controller.can_submit());

    let pending = h.controller.begin_submit().unwrap();
    assert_eq!(h.controller.status(), SubmissionStatus::Submitting);
    assert!(!h.controller.can_submit());

    assert!(h
        .controller
        .complete(pending.resolve(Ok(SubmitOutcome::accepted(Some(12))))));
    assert_eq!(h.controller.status(), SubmissionStatus::Success);
    assert_eq!(h.controller.failure_message(), None);
    assert_eq!(h.controller.draft().phone, "+7 (999) 123-45-67");
}

#[tokio::test]
async fn second_submit_while_in_flight_is_refused() {
    let mut h = harness(vec![]);
    open(&mut h, "hero");
    fill_valid(&mut h.controller);

    let handle = h.controller.spawn_submit().unwrap();
    assert_eq!(
        h.controller.begin_submit().unwrap_err(),
        SubmitBlocked::InFlight
    );

    let completion = handle.await.unwrap();
    assert!(h.controller.complete(completion));
    assert_eq!(h.controller.status(), SubmissionStatus::Success);
    assert_eq!(h.transport.received().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn success_closes_the_modal_after_the_delay() {
    let mut h = harness(vec![Ok(SubmitOutcome::accepted(Some(1)))]);
    open(&mut h, "hero");
    fill_valid(&mut h.controller);

    let status = h.controller.submit().await.unwrap();
    assert_eq!(status, SubmissionStatus::Success);

    tokio::time::sleep(Duration::from_millis(2_999)).await;
    assert!(h.coordinator.is_open());

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert!(!h.coordinator.is_open());

    assert!(h.controller.sync_visibility());
    assert!(!h.controller.is_open());
    assert!(!h.page.is_scroll_locked());
    assert_eq!(
        h.controller.status(),
        SubmissionStatus::Success,
        "status is only reset by reopening"
    );
}

#[tokio::test(start_paused = true)]
async fn reopening_before_the_delay_cancels_auto_close() {
    let mut h = harness(vec![Ok(SubmitOutcome::accepted(None))]);
    open(&mut h, "hero");
    fill_valid(&mut h.controller);
    h.controller.submit().await.unwrap();

    h.controller.close();
    open(&mut h, "footer");
    assert_eq!(h.controller.status(), SubmissionStatus::Idle);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(h.coordinator.is_open());
    assert!(h.controller.is_open());
}

#[tokio::test]
async fn transport_error_ends_in_error_and_dismiss_keeps_draft() {
    let mut h = harness(vec![
        Err(TransportError::Request("connection reset".to_owned())),
        Ok(SubmitOutcome::accepted(Some(3))),
    ]);
    open(&mut h, "hero");
    fill_valid(&mut h.controller);

    let status = h.controller.submit().await.unwrap();
    assert_eq!(status, SubmissionStatus::Error);
    assert_eq!(h.controller.failure_message(), Some(FAILURE_MESSAGE));
    assert!(!FAILURE_MESSAGE.contains("connection reset"));
    assert_eq!(
        h.controller.begin_submit().unwrap_err(),
        SubmitBlocked::Finished(SubmissionStatus::Error)
    );

    assert!(h.controller.dismiss_error());
    assert_eq!(h.controller.status(), SubmissionStatus::Idle);
    assert_eq!(h.controller.draft().name, "Ivan");
    assert_eq!(h.controller.draft().phone, "+7 (999) 123-45-67");

    let status = h.controller.submit().await.unwrap();
    assert_eq!(status, SubmissionStatus::Success);
    assert_eq!(h.transport.received().len(), 2);
}

#[tokio::test]
async fn explicit_rejection_ends_in_error() {
    let mut h = harness(vec![Ok(SubmitOutcome::rejected())]);
    open(&mut h, "hero");
    fill_valid(&mut h.controller);

    let status = h.controller.submit().await.unwrap();
    assert_eq!(status, SubmissionStatus::Error);
}

#[test]
fn dismiss_is_a_no_op_outside_error() {
    let mut h = harness(vec![]);
    open(&mut h, "hero");
    assert!(!h.controller.dismiss_error());
    assert_eq!(h.controller.status(), SubmissionStatus::Idle);
}

#[tokio::test]
async fn finished_success_refuses_new_submit() {
    let mut h = harness(vec![]);
    open(&mut h, "hero");
    fill_valid(&mut h.controller);
    h.controller.submit().await.unwrap();

    assert_eq!(
        h.controller.submit().await.unwrap_err(),
        SubmitBlocked::Finished(SubmissionStatus::Success)
    );
    assert_eq!(h.transport.received().len(), 1);
}

#[test]
fn result_for_a_previous_session_is_ignored() {
    let mut h = harness(vec![]);
    open(&mut h, "hero");
    fill_valid(&mut h.controller);
    let pending = h.controller.begin_submit().unwrap();

    h.controller.close();
    open(&mut h, "hero");

    let applied = h
        .controller
        .complete(pending.resolve(Ok(SubmitOutcome::accepted(None))));
    assert!(!applied);
    assert_eq!(h.controller.status(), SubmissionStatus::Idle);
}

#[test]
fn contact_phone_is_shown_formatted() {
    let h = harness(vec![]);
    assert_eq!(h.controller.contact_phone_display(), "+7 (747) 219-93-69");
}
