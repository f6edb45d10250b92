//! HTTP client for a Bitrix24 inbound webhook.
//!
//! A webhook URL looks like `https://<portal>/rest/<user>/<token>/`; REST
//! methods are called by appending `<method>.json`. The token lives in the
//! URL, so the client never prints it.

use std::time::Duration;

use atlant_core::{AppConfig, LeadRecord, LeadTransport, SubmitOutcome, TransportError};
use reqwest::{Client, Url};

use crate::error::BitrixError;
use crate::mapping::build_lead_request;
use crate::types::LeadAddResponse;

const LEAD_ADD_METHOD: &str = "crm.lead.add";

/// What Bitrix said about a lead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeadAddOutcome {
    Created {
        lead_id: u64,
    },
    /// Bitrix answered with an error envelope (bad token, missing scope,
    /// field validation).
    Rejected {
        error: String,
        description: Option<String>,
    },
}

/// Client for the Bitrix24 REST API through an inbound webhook.
///
/// Only a connect timeout is set. Once connected, a request waits for the
/// portal's answer however long it takes.
pub struct BitrixClient {
    client: Client,
    webhook_url: Url,
}

impl std::fmt::Debug for BitrixClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitrixClient")
            .field("host", &self.webhook_url.host_str())
            .field("webhook_url", &"[redacted]")
            .finish()
    }
}

impl BitrixClient {
    /// Creates a client for the given webhook base URL.
    ///
    /// # Errors
    ///
    /// Returns [`BitrixError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`BitrixError::InvalidWebhookUrl`] if
    /// `webhook_url` does not parse.
    pub fn new(
        webhook_url: &str,
        user_agent: &str,
        connect_timeout_secs: u64,
    ) -> Result<Self, BitrixError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash, so `join` appends the method instead of
        // replacing the token segment.
        let normalised = format!("{}/", webhook_url.trim().trim_end_matches('/'));
        let webhook_url = Url::parse(&normalised)
            .map_err(|e| BitrixError::InvalidWebhookUrl(e.to_string()))?;
        if webhook_url.cannot_be_a_base() {
            return Err(BitrixError::InvalidWebhookUrl(
                "URL cannot be used as a base".to_string(),
            ));
        }

        Ok(Self {
            client,
            webhook_url,
        })
    }

    /// Creates a client from the application configuration.
    ///
    /// # Errors
    ///
    /// Same as [`BitrixClient::new`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, BitrixError> {
        Self::new(
            &config.bitrix_webhook_url,
            &config.crm_user_agent,
            config.crm_connect_timeout_secs,
        )
    }

    /// Creates a lead via `crm.lead.add`.
    ///
    /// An error envelope is returned as [`LeadAddOutcome::Rejected`] whatever
    /// the HTTP status.
    ///
    /// # Errors
    ///
    /// - [`BitrixError::Http`] on network failure.
    /// - [`BitrixError::UnexpectedStatus`] for a non-2xx answer without an
    ///   error envelope.
    /// - [`BitrixError::Deserialize`] or [`BitrixError::MissingResult`] for a
    ///   2xx answer that is not a usable envelope.
    pub async fn add_lead(&self, record: &LeadRecord) -> Result<LeadAddOutcome, BitrixError> {
        let url = self.method_url(LEAD_ADD_METHOD)?;
        let payload = build_lead_request(record);

        let response = self.client.post(url).json(&payload).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let parsed = serde_json::from_str::<LeadAddResponse>(&body);
        match parsed {
            Ok(envelope) => {
                if let Some(error) = envelope.error.clone() {
                    return Ok(LeadAddOutcome::Rejected {
                        error,
                        description: envelope.error_description,
                    });
                }
                if !status.is_success() {
                    return Err(BitrixError::UnexpectedStatus {
                        status: status.as_u16(),
                        method: LEAD_ADD_METHOD.to_string(),
                    });
                }
                envelope
                    .lead_id()
                    .map(|lead_id| LeadAddOutcome::Created { lead_id })
                    .ok_or_else(|| BitrixError::MissingResult {
                        method: LEAD_ADD_METHOD.to_string(),
                    })
            }
            Err(_) if !status.is_success() => Err(BitrixError::UnexpectedStatus {
                status: status.as_u16(),
                method: LEAD_ADD_METHOD.to_string(),
            }),
            Err(source) => Err(BitrixError::Deserialize {
                context: LEAD_ADD_METHOD.to_string(),
                source,
            }),
        }
    }

    /// Full URL of a REST method, e.g. `<webhook>/crm.lead.add.json`.
    fn method_url(&self, method: &str) -> Result<Url, BitrixError> {
        self.webhook_url
            .join(&format!("{method}.json"))
            .map_err(|e| BitrixError::InvalidWebhookUrl(e.to_string()))
    }
}

impl LeadTransport for BitrixClient {
    /// Error envelopes and bare error statuses resolve as
    /// `success = false`; only failures to get any answer are `Err`.
    async fn submit_lead(&self, record: &LeadRecord) -> Result<SubmitOutcome, TransportError> {
        match self.add_lead(record).await {
            Ok(LeadAddOutcome::Created { lead_id }) => {
                tracing::debug!(lead_id, "Bitrix created lead");
                Ok(SubmitOutcome::accepted(Some(lead_id)))
            }
            Ok(LeadAddOutcome::Rejected { error, description }) => {
                tracing::warn!(
                    error = %error,
                    description = description.as_deref().unwrap_or(""),
                    "Bitrix rejected lead"
                );
                Ok(SubmitOutcome::rejected())
            }
            Err(BitrixError::UnexpectedStatus { status, .. }) => {
                tracing::warn!(status, "Bitrix answered with an error status");
                Ok(SubmitOutcome::rejected())
            }
            Err(err) => {
                tracing::warn!(error = %err, "Bitrix lead request failed");
                Err(err.into())
            }
        }
    }
}

impl From<BitrixError> for TransportError {
    fn from(err: BitrixError) -> Self {
        match err {
            BitrixError::Http(_) | BitrixError::InvalidWebhookUrl(_) => {
                TransportError::Request(err.to_string())
            }
            BitrixError::Deserialize { .. }
            | BitrixError::MissingResult { .. }
            | BitrixError::UnexpectedStatus { .. } => TransportError::Response(err.to_string()),
        }
    }
}
