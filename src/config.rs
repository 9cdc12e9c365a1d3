//! Process configuration
//!
//! Host, port and artifact path come from environment variables with
//! defaults matching the original deployment, so a bare `clf-api serve`
//! works out of the box.

use crate::core::{ClfError, Result};
use std::path::PathBuf;

/// Default location of the serialized model artifact
pub const DEFAULT_MODEL_PATH: &str = "model/clf_lin_svc.json";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

const ENV_MODEL_PATH: &str = "CLF_API_MODEL_PATH";
const ENV_HOST: &str = "CLF_API_HOST";
const ENV_PORT: &str = "CLF_API_PORT";

/// Configuration for the serving process
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Path of the model artifact loaded at startup
    pub model_path: PathBuf,
    /// Interface to bind
    pub host: String,
    /// TCP port to bind
    pub port: u16,
}

impl ServerConfig {
    /// Load configuration from the environment
    ///
    /// Recognized variables: `CLF_API_MODEL_PATH`, `CLF_API_HOST`,
    /// `CLF_API_PORT`. Unset variables fall back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let model_path = lookup(ENV_MODEL_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH));

        let host = lookup(ENV_HOST).unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup(ENV_PORT) {
            Some(raw) => raw.parse::<u16>().map_err(|_| {
                ClfError::ConfigError(format!("{ENV_PORT} must be a port number, got '{raw}'"))
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            model_path,
            host,
            port,
        })
    }

    /// Socket address string for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}
