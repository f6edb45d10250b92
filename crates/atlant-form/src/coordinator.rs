//! Process-wide visibility of the lead modal.
//!
//! One [`ModalCoordinator`] is created by the host and cloned into every
//! trigger and into the modal's controller. Clones share state. Mutation is
//! limited to [`ModalCoordinator::open`] and [`ModalCoordinator::close`].

use std::sync::Arc;

use tokio::sync::watch;

/// Snapshot of the modal's visibility.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityState {
    pub is_open: bool,
    /// Label of the trigger that opened the modal most recently.
    pub form_type: String,
    /// Bumped on every closed -> open transition. Lets observers tell a
    /// reopen apart from an uninterrupted open even if they missed the close.
    pub session: u64,
}

#[derive(Debug, Clone)]
pub struct ModalCoordinator {
    state: Arc<watch::Sender<VisibilityState>>,
}

impl Default for ModalCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl ModalCoordinator {
    /// Creates a closed coordinator.
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(VisibilityState::default());
        Self {
            state: Arc::new(state),
        }
    }

    /// Opens the modal for `form_type`.
    ///
    /// Calling this while already open only replaces the form type; the last
    /// caller wins.
    pub fn open(&self, form_type: impl Into<String>) {
        let form_type = form_type.into();
        tracing::debug!(form_type = %form_type, "lead modal open requested");
        self.state.send_modify(|state| {
            if !state.is_open {
                state.is_open = true;
                state.session += 1;
            }
            state.form_type = form_type;
        });
    }

    /// Closes the modal. A no-op when already closed.
    pub fn close(&self) {
        self.state.send_if_modified(|state| {
            if !state.is_open {
                return false;
            }
            state.is_open = false;
            true
        });
    }

    /// Closes the modal only if it is still showing `session`.
    ///
    /// Returns whether it closed anything.
    pub fn close_session(&self, session: u64) -> bool {
        self.state.send_if_modified(|state| {
            if !state.is_open || state.session != session {
                return false;
            }
            state.is_open = false;
            true
        })
    }

    #[must_use]
    pub fn current_state(&self) -> VisibilityState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state.borrow().is_open
    }

    /// A receiver that is notified on every open/close.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<VisibilityState> {
        self.state.subscribe()
    }
}
