//! Startup configuration, read once from the environment.

use std::time::Duration;

use carebridge_tasks::ollama::DEFAULT_BASE_URL;
use thiserror::Error;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_MODEL: &str = "mistral";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{key} must be {expected}, got {value:?}")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    /// Ollama model used for every task.
    pub model: String,
    pub ollama_base_url: String,
    /// Upper bound on a single generation call. Unset means no deadline.
    pub generation_timeout: Option<Duration>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            model: DEFAULT_MODEL.to_string(),
            ollama_base_url: DEFAULT_BASE_URL.to_string(),
            generation_timeout: None,
        }
    }
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from `lookup`, falling back to defaults for absent keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match read("PORT") {
            Some(value) => value.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                expected: "a port number",
                value,
            })?,
            None => defaults.port,
        };

        let generation_timeout = match read("GENERATION_TIMEOUT_SECS") {
            Some(value) => {
                let secs = value.trim().parse::<u64>();
                match secs {
                    Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                    _ => {
                        return Err(ConfigError::Invalid {
                            key: "GENERATION_TIMEOUT_SECS",
                            expected: "a positive number of seconds",
                            value,
                        });
                    }
                }
            }
            None => defaults.generation_timeout,
        };

        Ok(Self {
            host: read("HOST").unwrap_or(defaults.host),
            port,
            model: read("OLLAMA_MODEL").unwrap_or(defaults.model),
            ollama_base_url: read("OLLAMA_BASE_URL").unwrap_or(defaults.ollama_base_url),
            generation_timeout,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
