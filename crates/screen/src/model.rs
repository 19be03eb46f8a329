use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::fingerprint::fingerprint;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A candidate match returned by either source.
///
/// Field names follow the registry's wire format (`hash`, `black_list`,
/// `type`). Anything else the source sends (ids, country, passport data)
/// is kept in `extra` and written back out untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub middle_name: String,
    #[serde(default, with = "birth_date_format")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default, with = "timestamp_format")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hash: String,
    #[serde(default, deserialize_with = "flag")]
    pub black_list: bool,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub match_type: String,
    /// Sanction level, already resolved by whoever created the record.
    #[serde(default, deserialize_with = "level")]
    pub sanction: i32,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PersonRecord {
    /// Build a record with its fingerprint already computed.
    pub fn new(
        last_name: impl Into<String>,
        first_name: impl Into<String>,
        middle_name: impl Into<String>,
        birth_date: Option<NaiveDate>,
        created_at: Option<NaiveDateTime>,
    ) -> Self {
        let mut record = Self {
            last_name: last_name.into(),
            first_name: first_name.into(),
            middle_name: middle_name.into(),
            birth_date,
            created_at,
            hash: String::new(),
            black_list: false,
            match_type: String::new(),
            sanction: 0,
            extra: serde_json::Map::new(),
        };
        record.rehash();
        record
    }

    /// Recompute `hash` from this record's own name and birth-date fields.
    pub fn rehash(&mut self) {
        self.hash = fingerprint(
            &self.last_name,
            &self.first_name,
            &self.middle_name,
            self.birth_date,
        );
    }

    pub fn with_match_type(mut self, match_type: impl Into<String>) -> Self {
        self.match_type = match_type.into();
        self
    }

    pub fn with_black_list(mut self, black_list: bool) -> Self {
        self.black_list = black_list;
        self
    }

    pub fn with_sanction(mut self, sanction: i32) -> Self {
        self.sanction = sanction;
        self
    }
}

// ---------------------------------------------------------------------------
// Sources + requests
// ---------------------------------------------------------------------------

/// The two record sources a screening request consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Internal registry ("whitelist").
    Registry,
    /// Sanctions registry; every entry carries a match type.
    Blacklist,
}

impl Source {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Registry => "registry",
            Self::Blacklist => "blacklist",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Free-text criteria forwarded to the search collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
}

impl SearchCriteria {
    /// True when neither `name` nor `birth_date` carries any text.
    /// Blank strings count as absent.
    pub fn is_empty(&self) -> bool {
        is_blank(&self.name) && is_blank(&self.birth_date)
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// One inbound screening request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRequest {
    pub criteria: SearchCriteria,
    /// Range start, `DD/MM/YYYY` or `DD/MM/YYYY HH:MM`.
    pub date1: Option<String>,
    /// Range end, same formats as `date1`.
    pub date2: Option<String>,
}

/// Result of a successful search.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SearchOutcome {
    /// Empty query: deduplicated registry records, not screened.
    Passthrough(Vec<PersonRecord>),
    /// Registry and blacklist reconciled into one record per person.
    Screened(Vec<PersonRecord>),
}

impl SearchOutcome {
    pub fn records(&self) -> &[PersonRecord] {
        match self {
            Self::Passthrough(r) | Self::Screened(r) => r,
        }
    }

    pub fn into_records(self) -> Vec<PersonRecord> {
        match self {
            Self::Passthrough(r) | Self::Screened(r) => r,
        }
    }

    pub fn is_screened(&self) -> bool {
        matches!(self, Self::Screened(_))
    }
}

// ---------------------------------------------------------------------------
// Serde helpers
// ---------------------------------------------------------------------------

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Registries send `black_list` as a bool, a 0/1 number, a string, or null.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(false),
        Some(serde_json::Value::Bool(b)) => Ok(b),
        Some(serde_json::Value::Number(n)) => match n.as_i64().or_else(|| whole(n.as_f64())) {
            Some(v) => Ok(v != 0),
            None => Err(D::Error::custom(format!("invalid black_list flag {n}"))),
        },
        Some(serde_json::Value::String(s)) => match s.as_str() {
            "" | "0" | "false" => Ok(false),
            "1" | "true" => Ok(true),
            other => Err(D::Error::custom(format!("invalid black_list flag '{other}'"))),
        },
        Some(other) => Err(D::Error::custom(format!("invalid black_list flag {other}"))),
    }
}

/// Sanction levels arrive as an integer, a numeric string, or null.
fn level<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let parsed = match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => return Ok(0),
        Some(serde_json::Value::Number(n)) => n.as_i64().or_else(|| whole(n.as_f64())),
        Some(serde_json::Value::String(s)) => match s.trim() {
            "" => return Ok(0),
            digits => digits.parse::<i64>().ok(),
        },
        Some(_) => None,
    };
    parsed
        .and_then(|v| i32::try_from(v).ok())
        .ok_or_else(|| D::Error::custom("invalid sanction level"))
}

fn whole(value: Option<f64>) -> Option<i64> {
    value.filter(|v| v.fract() == 0.0).map(|v| v as i64)
}

/// Birth dates go out as `DD/MM/YYYY`; `YYYY-MM-DD` (optionally followed by
/// a time part) is accepted on the way in.
pub(crate) mod birth_date_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::fingerprint::{format_birth_date, BIRTH_DATE_FORMAT};

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(d) => serializer.serialize_str(&format_birth_date(*d)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        parse(raw)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid birth_date '{raw}'")))
    }

    pub fn parse(raw: &str) -> Option<NaiveDate> {
        if let Ok(d) = NaiveDate::parse_from_str(raw, BIRTH_DATE_FORMAT) {
            return Some(d);
        }
        let iso = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(iso, "%Y-%m-%d").ok()
    }
}

/// `created_at` goes out as `YYYY-MM-DD HH:MM:SS`. RFC 3339 and the
/// space-separated forms (with or without seconds) are accepted.
pub(crate) mod timestamp_format {
    use chrono::{DateTime, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_str(&ts.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        parse(raw)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid created_at '{raw}'")))
    }

    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.naive_utc());
        }
        [FORMAT, "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    }
}
