use std::sync::atomic::{AtomicBool, Ordering};

use atlant_core::PageContext;

/// What the lead form needs from the page it is embedded in.
pub trait HostPage: Send + Sync {
    /// Current page URL and the visitor's client identification string.
    fn page_context(&self) -> PageContext;

    /// Suspends (`true`) or restores (`false`) page scrolling behind the modal.
    fn set_scroll_locked(&self, locked: bool);
}

/// A host with a fixed page context that only remembers the scroll lock.
///
/// For hosts that are not a browser, and for tests.
#[derive(Debug, Default)]
pub struct FixedPage {
    context: PageContext,
    scroll_locked: AtomicBool,
}

impl FixedPage {
    #[must_use]
    pub fn new(origin_url: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            context: PageContext {
                origin_url: origin_url.into(),
                user_agent: user_agent.into(),
            },
            scroll_locked: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locked.load(Ordering::SeqCst)
    }
}

impl HostPage for FixedPage {
    fn page_context(&self) -> PageContext {
        self.context.clone()
    }

    fn set_scroll_locked(&self, locked: bool) {
        self.scroll_locked.store(locked, Ordering::SeqCst);
    }
}
