//! Mapping from a [`LeadRecord`] to the Bitrix24 lead fields.

use atlant_core::LeadRecord;

use crate::types::{LeadAddRequest, LeadFields, LeadParams, PhoneField};

const SOURCE_ID_WEB: &str = "WEB";
const PHONE_VALUE_TYPE: &str = "WORK";

/// Builds the `crm.lead.add` payload for `record`.
///
/// Bitrix has no dedicated fields for the page URL, user agent or submission
/// time, so they are appended to `COMMENTS` after the visitor's comment.
#[must_use]
pub fn build_lead_request(record: &LeadRecord) -> LeadAddRequest {
    LeadAddRequest {
        fields: LeadFields {
            title: format!("{}: {}", record.source(), record.form_type()),
            name: record.name().to_owned(),
            phone: vec![PhoneField {
                value: record.phone().to_owned(),
                value_type: PHONE_VALUE_TYPE.to_owned(),
            }],
            comments: build_comments(record),
            source_id: SOURCE_ID_WEB.to_owned(),
            source_description: record.source().to_owned(),
        },
        params: LeadParams {
            register_sonet_event: "Y".to_owned(),
        },
    }
}

fn build_comments(record: &LeadRecord) -> String {
    let mut lines = Vec::with_capacity(5);
    if !record.comment().is_empty() {
        lines.push(record.comment().to_owned());
    }
    lines.push(format!("Form: {}", record.form_type()));
    lines.push(format!("Page: {}", record.origin_url()));
    lines.push(format!("User-Agent: {}", record.user_agent()));
    lines.push(format!("Submitted: {}", record.submitted_at_iso8601()));
    lines.join("\n")
}
