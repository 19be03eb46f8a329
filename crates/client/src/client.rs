//! Record store HTTP client.
//!
//! Blocking reqwest client (no Tokio runtime required). One GET per
//! source per request; no retries.

use std::time::Duration;

use thiserror::Error;

use regscreen_screen::source::parse_records;
use regscreen_screen::{CollaboratorError, PersonRecord, SearchClient, SearchCriteria, Source};

use crate::config::ClientConfig;

/// Error type for record store calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Config file missing, unreadable or invalid
    #[error("config error: {0}")]
    Config(String),
    /// `token_env` names a variable that is not set
    #[error("token variable {0} is not set")]
    MissingToken(String),
    /// Connection-level failure
    #[error("network error: {0}")]
    Network(String),
    /// Request exceeded `timeout_secs`
    #[error("timed out: {0}")]
    Timeout(String),
    /// Non-2xx response
    #[error("HTTP {0}: {1}")]
    Http(u16, String),
    /// Body was not the JSON we expected
    #[error("parse error: {0}")]
    Parse(String),
}

/// Search client for a registry exposing `GET {api_base}/search/{source}`.
#[derive(Clone)]
pub struct RegistryClient {
    http: reqwest::blocking::Client,
    config: ClientConfig,
    token: Option<String>,
}

impl RegistryClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let token = config.resolve_token()?;
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("regscreen/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self { http, config, token })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn source_url(&self, source: Source) -> String {
        let path = match source {
            Source::Registry => &self.config.sources.registry,
            Source::Blacklist => &self.config.sources.blacklist,
        };
        format!("{}/search/{}", self.config.api_base.trim_end_matches('/'), path)
    }

    /// Fetch raw candidates for one source.
    pub fn fetch(
        &self,
        source: Source,
        criteria: &SearchCriteria,
    ) -> Result<serde_json::Value, ClientError> {
        let url = self.source_url(source);
        let query: Vec<(&str, &str)> = [
            ("name", criteria.name.as_deref()),
            ("birth_date", criteria.birth_date.as_deref()),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.map(str::trim).filter(|v| !v.is_empty()).map(|v| (k, v)))
        .collect();

        log::debug!("GET {url} {query:?}");

        let mut request = self
            .http
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&query);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout(url.clone())
            } else {
                ClientError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ClientError::Http(status.as_u16(), error_message(&body)));
        }

        response
            .json::<serde_json::Value>()
            .map_err(|e| ClientError::Parse(e.to_string()))
    }
}

impl SearchClient for RegistryClient {
    fn search(
        &self,
        source: Source,
        criteria: &SearchCriteria,
    ) -> Result<Vec<PersonRecord>, CollaboratorError> {
        let body = self
            .fetch(source, criteria)
            .map_err(|e| CollaboratorError::new(source.name(), e.to_string()))?;
        parse_records(source, body)
    }
}

/// Pull `error` or `message` out of a JSON error body; fall back to the
/// raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .or_else(|| v.get("message"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| body.trim().to_string())
}
