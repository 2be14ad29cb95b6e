use std::net::SocketAddr;

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
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub max_concurrent_audits: usize,
    pub page_timeout_secs: u64,
    pub probe_timeout_secs: u64,
    pub link_check_limit: usize,
    pub search_base_url: String,
    pub user_agent: String,
    pub report_ttl_days: i64,
    pub lead_webhook_url: Option<String>,
    pub rate_limit_max: usize,
    pub rate_limit_window_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("max_concurrent_audits", &self.max_concurrent_audits)
            .field("page_timeout_secs", &self.page_timeout_secs)
            .field("probe_timeout_secs", &self.probe_timeout_secs)
            .field("link_check_limit", &self.link_check_limit)
            .field("search_base_url", &self.search_base_url)
            .field("user_agent", &self.user_agent)
            .field("report_ttl_days", &self.report_ttl_days)
            .field(
                "lead_webhook_url",
                &self.lead_webhook_url.as_ref().map(|_| "[redacted]"),
            )
            .field("rate_limit_max", &self.rate_limit_max)
            .field("rate_limit_window_secs", &self.rate_limit_window_secs)
            .finish()
    }
}
