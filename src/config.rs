use crate::auth::DEFAULT_SESSION_TTL;
use anyhow::{Context, Result};
use derive_getters::Getters;
use std::net::SocketAddr;
use std::time::Duration;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
const DEFAULT_CONSULTANT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Getters)]
pub struct Config {
    host: String,
    port: u16,
    session_ttl: Duration,
    consultant: ConsultantConfig,
}

/// Settings for the hosted chat-completion API.
#[derive(Debug, Clone, Getters)]
pub struct ConsultantConfig {
    api_key: Option<String>,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl Config {
    /// Reads settings from the process environment. Call `dotenvy::dotenv()`
    /// first to pick up a `.env` file.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("PORT must be a port number, got {raw:?}"))?,
            None => DEFAULT_PORT,
        };
        let timeout_secs = match lookup("CONSULTANT_TIMEOUT_SECS") {
            Some(raw) => raw.parse().with_context(|| {
                format!("CONSULTANT_TIMEOUT_SECS must be a number of seconds, got {raw:?}")
            })?,
            None => DEFAULT_CONSULTANT_TIMEOUT_SECS,
        };
        let session_ttl_secs = match lookup("SESSION_TTL_SECS") {
            Some(raw) => raw.parse().with_context(|| {
                format!("SESSION_TTL_SECS must be a number of seconds, got {raw:?}")
            })?,
            None => DEFAULT_SESSION_TTL.as_secs(),
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            session_ttl: Duration::from_secs(session_ttl_secs),
            consultant: ConsultantConfig {
                api_key: lookup("OPENAI_API_KEY").filter(|key| !key.is_empty()),
                base_url: lookup("OPENAI_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
                model: lookup("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

impl ConsultantConfig {
    pub fn new(api_key: Option<String>, base_url: &str, model: &str, timeout: Duration) -> Self {
        Self {
            api_key,
            base_url: base_url.to_string(),
            model: model.to_string(),
            timeout,
        }
    }
}
