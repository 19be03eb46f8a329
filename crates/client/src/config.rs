use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::client::ClientError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Where and how to reach the record store.
///
/// ```toml
/// api_base = "https://registry.example.org/api"
/// token_env = "REGSCREEN_TOKEN"
/// timeout_secs = 20
///
/// [sources]
/// registry = "added-users"
/// blacklist = "black-list"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    pub api_base: String,
    /// Environment variable holding the bearer token. Tokens are never
    /// stored in the config file itself.
    #[serde(default)]
    pub token_env: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub sources: SourcePaths,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// URL path segment searched for each source: `{api_base}/search/{path}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourcePaths {
    #[serde(default = "default_registry_path")]
    pub registry: String,
    #[serde(default = "default_blacklist_path")]
    pub blacklist: String,
}

impl Default for SourcePaths {
    fn default() -> Self {
        Self {
            registry: default_registry_path(),
            blacklist: default_blacklist_path(),
        }
    }
}

fn default_registry_path() -> String {
    "registry".into()
}

fn default_blacklist_path() -> String {
    "blacklist".into()
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ClientConfig {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            token_env: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            sources: SourcePaths::default(),
        }
    }

    pub fn from_toml(input: &str) -> Result<Self, ClientError> {
        let config: ClientConfig =
            toml::from_str(input).map_err(|e| ClientError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ClientError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ClientError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml(&text)
    }

    /// `~/.config/regscreen/config.toml` (platform config dir).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|c| c.join("regscreen/config.toml"))
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if !(self.api_base.starts_with("http://") || self.api_base.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "api_base must be an http(s) URL, got '{}'",
                self.api_base
            )));
        }

        if self.timeout_secs == 0 {
            return Err(ClientError::Config("timeout_secs must be positive".into()));
        }

        for (label, path) in [("registry", &self.sources.registry), ("blacklist", &self.sources.blacklist)] {
            if path.trim().is_empty() || path.contains('/') {
                return Err(ClientError::Config(format!(
                    "sources.{label} must be a single path segment, got '{path}'"
                )));
            }
        }

        if let Some(var) = &self.token_env {
            if var.trim().is_empty() {
                return Err(ClientError::Config("token_env must not be empty".into()));
            }
        }

        Ok(())
    }

    /// Resolve the bearer token from the configured environment variable.
    pub fn resolve_token(&self) -> Result<Option<String>, ClientError> {
        match &self.token_env {
            None => Ok(None),
            Some(var) => std::env::var(var)
                .map(Some)
                .map_err(|_| ClientError::MissingToken(var.clone())),
        }
    }
}
