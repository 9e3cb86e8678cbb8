use std::net::SocketAddr;

use serde::Deserialize;

/// User-Agent sent with every webhook delivery unless overridden.
pub const DEFAULT_USER_AGENT: &str = "Teamcity chime notification plugin";

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Build server root URL used for build-log links (no trailing slash)
    pub root_url: String,

    /// User-Agent header for outbound webhook requests
    pub user_agent: String,

    /// Transport timeout for a single webhook request, in seconds (default: 10)
    pub http_timeout_secs: u64,

    /// Address the HTTP host adapter listens on
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let root_url = var("CHIME_ROOT_URL")
            .unwrap_or_else(|| "http://localhost:8111".to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();
        if root_url.is_empty() {
            anyhow::bail!("CHIME_ROOT_URL must not be empty");
        }

        Ok(Self {
            root_url,
            user_agent: var("CHIME_USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            http_timeout_secs: var("CHIME_HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|| "10".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("CHIME_HTTP_TIMEOUT_SECS must be a valid u64"))?,
            bind_addr: var("CHIME_BIND_ADDR")
                .unwrap_or_else(|| "0.0.0.0:3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("CHIME_BIND_ADDR must be a valid socket address"))?,
        })
    }
}
