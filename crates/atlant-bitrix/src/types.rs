//! Wire types for the `crm.lead.add` REST method.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadAddRequest {
    pub fields: LeadFields,
    pub params: LeadParams,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct LeadFields {
    pub title: String,
    pub name: String,
    pub phone: Vec<PhoneField>,
    pub comments: String,
    pub source_id: String,
    pub source_description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct PhoneField {
    pub value: String,
    pub value_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct LeadParams {
    /// `"Y"` posts the new lead to the portal's activity stream.
    pub register_sonet_event: String,
}

/// Envelope returned by every Bitrix24 REST method.
///
/// Success carries `result`; failure carries `error` and usually
/// `error_description`.
#[derive(Debug, Clone, Deserialize)]
pub struct LeadAddResponse {
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl LeadAddResponse {
    /// The id of the created lead. Bitrix sends it as a number, some portal
    /// versions as a numeric string.
    #[must_use]
    pub fn lead_id(&self) -> Option<u64> {
        match self.result.as_ref()? {
            serde_json::Value::Number(n) => n.as_u64(),
            serde_json::Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}
