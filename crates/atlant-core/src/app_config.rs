#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub bitrix_webhook_url: String,
    pub lead_source: String,
    pub auto_close_ms: u64,
    pub contact_phone: String,
    pub crm_user_agent: String,
    pub crm_connect_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The webhook URL embeds the access token.
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("bitrix_webhook_url", &"[redacted]")
            .field("lead_source", &self.lead_source)
            .field("auto_close_ms", &self.auto_close_ms)
            .field("contact_phone", &self.contact_phone)
            .field("crm_user_agent", &self.crm_user_agent)
            .field("crm_connect_timeout_secs", &self.crm_connect_timeout_secs)
            .finish()
    }
}
