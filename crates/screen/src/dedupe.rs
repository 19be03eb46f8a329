use std::collections::HashSet;

use crate::model::PersonRecord;

/// Drop every record whose fingerprint was already seen, keeping the first
/// occurrence and the relative order of survivors.
///
/// Only applied to registry results. Blacklist entries sharing a
/// fingerprint carry distinct match types and must reach the merger.
pub fn dedupe(records: Vec<PersonRecord>) -> Vec<PersonRecord> {
    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|r| seen.insert(r.hash.clone()))
        .collect()
}
