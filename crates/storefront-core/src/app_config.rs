use std::path::PathBuf;

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
    /// Root of the remote REST API, without a trailing slash.
    pub api_base_url: String,
    /// Directory holding the durable cart and session files.
    pub data_dir: PathBuf,
    pub log_level: String,
    pub http_timeout_secs: u64,
    /// Hard deadline for one order submission, independent of the HTTP timeout.
    pub checkout_timeout_secs: u64,
    pub user_agent: String,
    /// Retries for idempotent GET requests. Order creation is never retried.
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
}

impl AppConfig {
    #[must_use]
    pub fn cart_path(&self) -> PathBuf {
        self.data_dir.join("cart.json")
    }

    #[must_use]
    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join("session.json")
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("api_base_url", &self.api_base_url)
            .field("data_dir", &self.data_dir)
            .field("log_level", &self.log_level)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("checkout_timeout_secs", &self.checkout_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .finish()
    }
}
