//! The lead-capture modal: who opened it, what the visitor typed, and where
//! the submission stands.
//!
//! - [`ModalCoordinator`] - shared open/closed state any trigger can set
//! - [`LeadFormController`] - the form behind the modal
//! - [`HostPage`] - what the form needs from the page it is embedded in

pub mod auto_close;
pub mod controller;
pub mod coordinator;
pub mod host;
pub mod settings;
pub mod status;

pub use auto_close::AutoClose;
pub use controller::{Completion, LeadFormController, PendingSubmission, SubmitBlocked};
pub use coordinator::{ModalCoordinator, VisibilityState};
pub use host::{FixedPage, HostPage};
pub use settings::FormSettings;
pub use status::SubmissionStatus;
