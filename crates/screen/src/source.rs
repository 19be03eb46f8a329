//! The search collaborator seam.
//!
//! The engine never talks to a registry directly. It asks a [`SearchClient`]
//! for candidates from one [`Source`] at a time. `regscreen-client` provides
//! the HTTP implementation; [`MemorySearchClient`] serves fixtures.

use std::sync::Mutex;

use crate::error::CollaboratorError;
use crate::fingerprint::format_birth_date;
use crate::model::{PersonRecord, SearchCriteria, Source};

/// Returns candidate records from one source for free-text criteria.
///
/// Implementations decide how loosely criteria match. Each returned record
/// must carry the name and birth-date fields the fingerprint is built from.
pub trait SearchClient {
    fn search(
        &self,
        source: Source,
        criteria: &SearchCriteria,
    ) -> Result<Vec<PersonRecord>, CollaboratorError>;
}

impl<T: SearchClient + ?Sized> SearchClient for &T {
    fn search(
        &self,
        source: Source,
        criteria: &SearchCriteria,
    ) -> Result<Vec<PersonRecord>, CollaboratorError> {
        (**self).search(source, criteria)
    }
}

/// Decode a search response body: either a bare array of records or a
/// `{"data": [...]}` resource envelope.
pub fn parse_records(
    source: Source,
    body: serde_json::Value,
) -> Result<Vec<PersonRecord>, CollaboratorError> {
    let items = match body {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut obj) => match obj.remove("data") {
            Some(serde_json::Value::Array(items)) => items,
            _ => {
                return Err(CollaboratorError::new(
                    source.name(),
                    "malformed response: expected an array or a \"data\" array",
                ))
            }
        },
        other => {
            return Err(CollaboratorError::new(
                source.name(),
                format!("malformed response: expected an array, got {}", json_kind(&other)),
            ))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value(item).map_err(|e| {
                CollaboratorError::new(source.name(), format!("malformed record #{i}: {e}"))
            })
        })
        .collect()
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// In-memory client
// ---------------------------------------------------------------------------

/// Fixture-backed search client.
///
/// Name criteria match when every whitespace-separated term occurs
/// (case-insensitively) in the record's full name. Birth-date criteria
/// match the `DD/MM/YYYY` rendering exactly. Calls are recorded so callers
/// can see which sources a request touched.
#[derive(Debug, Default)]
pub struct MemorySearchClient {
    registry: Vec<PersonRecord>,
    blacklist: Vec<PersonRecord>,
    failure: Option<(Source, String)>,
    calls: Mutex<Vec<Source>>,
}

impl MemorySearchClient {
    pub fn new(registry: Vec<PersonRecord>, blacklist: Vec<PersonRecord>) -> Self {
        Self {
            registry,
            blacklist,
            ..Self::default()
        }
    }

    /// Load both sources from JSON documents (array or `data` envelope).
    pub fn from_json(registry_json: &str, blacklist_json: &str) -> Result<Self, CollaboratorError> {
        let decode = |source: Source, text: &str| {
            let body: serde_json::Value = serde_json::from_str(text).map_err(|e| {
                CollaboratorError::new(source.name(), format!("invalid JSON: {e}"))
            })?;
            parse_records(source, body)
        };
        Ok(Self::new(
            decode(Source::Registry, registry_json)?,
            decode(Source::Blacklist, blacklist_json)?,
        ))
    }

    /// Make every search against `source` fail with `message`.
    pub fn failing_on(mut self, source: Source, message: impl Into<String>) -> Self {
        self.failure = Some((source, message.into()));
        self
    }

    /// Sources searched so far, in call order.
    pub fn calls(&self) -> Vec<Source> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl SearchClient for MemorySearchClient {
    fn search(
        &self,
        source: Source,
        criteria: &SearchCriteria,
    ) -> Result<Vec<PersonRecord>, CollaboratorError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(source);
        }

        if let Some((failing, message)) = &self.failure {
            if *failing == source {
                return Err(CollaboratorError::new(source.name(), message.clone()));
            }
        }

        let records = match source {
            Source::Registry => &self.registry,
            Source::Blacklist => &self.blacklist,
        };
        Ok(records
            .iter()
            .filter(|r| matches_criteria(r, criteria))
            .cloned()
            .collect())
    }
}

fn matches_criteria(record: &PersonRecord, criteria: &SearchCriteria) -> bool {
    let name_ok = match criteria.name.as_deref().map(str::trim) {
        None | Some("") => true,
        Some(query) => {
            let full = format!(
                "{} {} {}",
                record.last_name, record.first_name, record.middle_name
            )
            .to_lowercase();
            query
                .split_whitespace()
                .all(|term| full.contains(&term.to_lowercase()))
        }
    };

    let birth_ok = match criteria.birth_date.as_deref().map(str::trim) {
        None | Some("") => true,
        Some(query) => record
            .birth_date
            .map(format_birth_date)
            .is_some_and(|d| d == query),
    };

    name_ok && birth_ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ivanov() -> PersonRecord {
        PersonRecord::new("Ivanov", "Ivan", "Ivanovich", NaiveDate::from_ymd_opt(1980, 1, 1), None)
    }

    fn criteria(name: Option<&str>, birth_date: Option<&str>) -> SearchCriteria {
        SearchCriteria {
            name: name.map(String::from),
            birth_date: birth_date.map(String::from),
        }
    }

    #[test]
    fn parse_bare_array_and_envelope() {
        let bare = serde_json::json!([{ "last_name": "A" }, { "last_name": "B" }]);
        assert_eq!(parse_records(Source::Registry, bare).unwrap().len(), 2);

        let wrapped = serde_json::json!({ "data": [{ "last_name": "A" }] });
        assert_eq!(parse_records(Source::Blacklist, wrapped).unwrap().len(), 1);
    }

    #[test]
    fn parse_rejects_wrong_shape() {
        let err = parse_records(Source::Blacklist, serde_json::json!("nope")).unwrap_err();
        assert_eq!(err.source_name, "blacklist");
        assert!(err.message.contains("a string"));

        let err = parse_records(Source::Registry, serde_json::json!({ "items": [] })).unwrap_err();
        assert!(err.message.contains("\"data\""));
    }

    #[test]
    fn parse_reports_bad_record_index() {
        let body = serde_json::json!([{ "last_name": "A" }, { "birth_date": "soon" }]);
        let err = parse_records(Source::Registry, body).unwrap_err();
        assert!(err.message.starts_with("malformed record #1"));
    }

    #[test]
    fn name_terms_match_case_insensitively() {
        let client = MemorySearchClient::new(vec![ivanov()], Vec::new());
        let hits = client
            .search(Source::Registry, &criteria(Some("ivan IVANOVICH"), None))
            .unwrap();
        assert_eq!(hits.len(), 1);
        let misses = client
            .search(Source::Registry, &criteria(Some("Petrov"), None))
            .unwrap();
        assert!(misses.is_empty());
    }

    #[test]
    fn birth_date_matches_exactly() {
        let client = MemorySearchClient::new(vec![ivanov()], Vec::new());
        assert_eq!(
            client
                .search(Source::Registry, &criteria(None, Some("01/01/1980")))
                .unwrap()
                .len(),
            1
        );
        assert!(client
            .search(Source::Registry, &criteria(None, Some("02/01/1980")))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn records_calls_and_failures() {
        let client = MemorySearchClient::new(Vec::new(), Vec::new())
            .failing_on(Source::Blacklist, "connection refused");
        assert!(client.search(Source::Registry, &SearchCriteria::default()).is_ok());
        let err = client
            .search(Source::Blacklist, &SearchCriteria::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "blacklist search failed: connection refused");
        assert_eq!(client.calls(), vec![Source::Registry, Source::Blacklist]);
    }
}
