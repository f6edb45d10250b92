use thiserror::Error;

/// Errors returned by the Bitrix24 webhook client.
#[derive(Debug, Error)]
pub enum BitrixError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured webhook URL cannot be used as a request base.
    #[error("invalid webhook URL: {0}")]
    InvalidWebhookUrl(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A 2xx answer that carries neither a lead id nor an error.
    #[error("response from {method} has no result")]
    MissingResult { method: String },

    /// A non-2xx answer without a Bitrix error envelope.
    #[error("unexpected HTTP status {status} from {method}")]
    UnexpectedStatus { status: u16, method: String },
}
