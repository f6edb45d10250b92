pub mod app_config;
pub mod config;
pub mod error;
pub mod lead;
pub mod logging;
pub mod phone;
pub mod transport;
pub mod validation;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use lead::{LeadRecord, PageContext};
pub use logging::init_tracing;
pub use phone::{canonicalize_phone, digits_only, format_phone_input};
pub use transport::{LeadTransport, SubmitOutcome, TransportError};
pub use validation::{validate_draft, Field, FieldError, FieldErrors, LeadDraft, ValidLead};
