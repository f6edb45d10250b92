//! The lead snapshot handed to the CRM transport.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

use crate::validation::ValidLead;

/// Where the form is being shown: the page URL and the visitor's client
/// identification string. Supplied by the host page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContext {
    pub origin_url: String,
    pub user_agent: String,
}

/// An immutable, fully validated lead.
///
/// Built once per submission attempt from a [`ValidLead`]; there is no way to
/// construct one from an unvalidated draft or to change it afterwards.
/// Serialises with the field names the site has always sent
/// (`formType`, `url`, `userAgent`, `timestamp`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadRecord {
    name: String,
    phone: String,
    form_type: String,
    comment: String,
    source: String,
    #[serde(rename = "url")]
    origin_url: String,
    user_agent: String,
    #[serde(rename = "timestamp", serialize_with = "serialize_iso8601")]
    submitted_at: DateTime<Utc>,
}

impl LeadRecord {
    #[must_use]
    pub fn new(
        lead: ValidLead,
        form_type: &str,
        source: &str,
        page: &PageContext,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name: lead.name().to_owned(),
            phone: lead.phone().to_owned(),
            form_type: form_type.to_owned(),
            comment: String::new(),
            source: source.to_owned(),
            origin_url: page.origin_url.clone(),
            user_agent: page.user_agent.clone(),
            submitted_at,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }

    #[must_use]
    pub fn form_type(&self) -> &str {
        &self.form_type
    }

    #[must_use]
    pub fn comment(&self) -> &str {
        &self.comment
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn origin_url(&self) -> &str {
        &self.origin_url
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    #[must_use]
    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    /// Submission time as `YYYY-MM-DDTHH:MM:SS.sssZ`.
    #[must_use]
    pub fn submitted_at_iso8601(&self) -> String {
        self.submitted_at
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

fn serialize_iso8601<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
}
