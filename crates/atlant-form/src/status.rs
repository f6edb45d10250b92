use std::fmt;

/// Where the current submission attempt stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SubmissionStatus {
    /// Editing; a submit may be attempted.
    #[default]
    Idle,
    /// A lead is with the transport. Further submits are refused.
    Submitting,
    /// The CRM accepted the lead. Stays until the modal is reopened.
    Success,
    /// Delivery failed. Dismissing returns to [`SubmissionStatus::Idle`].
    Error,
}

impl SubmissionStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionStatus::Idle => "idle",
            SubmissionStatus::Submitting => "submitting",
            SubmissionStatus::Success => "success",
            SubmissionStatus::Error => "error",
        }
    }

    /// The submit control is enabled only while idle.
    #[must_use]
    pub fn accepts_submit(self) -> bool {
        self == SubmissionStatus::Idle
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
