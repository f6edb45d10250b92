pub mod client;
pub mod error;
pub mod mapping;
pub mod types;

pub use client::{BitrixClient, LeadAddOutcome};
pub use error::BitrixError;
pub use mapping::build_lead_request;
pub use types::{LeadAddRequest, LeadAddResponse};
