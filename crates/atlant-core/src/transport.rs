//! The contract between the lead form and whatever delivers leads to the CRM.

use std::future::Future;

use thiserror::Error;

use crate::lead::LeadRecord;

/// The answer to a delivered lead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub success: bool,
    /// CRM-side identifier of the created lead, when the CRM reports one.
    pub lead_id: Option<u64>,
}

impl SubmitOutcome {
    #[must_use]
    pub fn accepted(lead_id: Option<u64>) -> Self {
        Self {
            success: true,
            lead_id,
        }
    }

    #[must_use]
    pub fn rejected() -> Self {
        Self::default()
    }
}

/// A lead could not be delivered at all.
///
/// A CRM that answers "not accepted" is not an error; that is
/// [`SubmitOutcome::rejected`].
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("lead request failed: {0}")]
    Request(String),

    #[error("unreadable CRM response: {0}")]
    Response(String),
}

/// Delivers a [`LeadRecord`] to the CRM.
///
/// Implementations should resolve expected failures (validation errors on
/// the CRM side, error statuses) as `Ok(SubmitOutcome::rejected())` and keep
/// `Err` for cases where no answer could be obtained. Callers treat both the
/// same way.
pub trait LeadTransport: Send + Sync {
    fn submit_lead(
        &self,
        record: &LeadRecord,
    ) -> impl Future<Output = Result<SubmitOutcome, TransportError>> + Send;
}
