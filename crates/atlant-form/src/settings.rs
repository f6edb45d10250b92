use std::time::Duration;

use atlant_core::config::{DEFAULT_CONTACT_PHONE, DEFAULT_LEAD_SOURCE};
use atlant_core::AppConfig;

/// Per-site settings of the lead form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSettings {
    /// Fixed site identifier written into every lead.
    pub source: String,
    /// How long the success confirmation stays up before the modal closes.
    pub auto_close_delay: Duration,
    /// Number offered for a direct call when submission fails.
    pub contact_phone: String,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            source: DEFAULT_LEAD_SOURCE.to_string(),
            auto_close_delay: Duration::from_secs(3),
            contact_phone: DEFAULT_CONTACT_PHONE.to_string(),
        }
    }
}

impl FormSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            source: config.lead_source.clone(),
            auto_close_delay: Duration::from_millis(config.auto_close_ms),
            contact_phone: config.contact_phone.clone(),
        }
    }
}
