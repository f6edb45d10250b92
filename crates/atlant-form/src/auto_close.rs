use std::time::Duration;

use tokio::task::JoinHandle;

use crate::coordinator::ModalCoordinator;

/// A pending delayed close of one modal session.
///
/// Dropping it (or calling [`AutoClose::cancel`]) calls the close off. Even
/// if it fires late, it only closes the session it was scheduled for.
#[derive(Debug)]
pub struct AutoClose {
    handle: JoinHandle<()>,
}

impl AutoClose {
    /// Schedules `coordinator.close_session(session)` after `delay`.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn schedule(coordinator: ModalCoordinator, session: u64, delay: Duration) -> Self {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if coordinator.close_session(session) {
                tracing::debug!(session, "lead modal auto-closed");
            }
        });
        Self { handle }
    }

    pub fn cancel(self) {
        drop(self);
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for AutoClose {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
