//! Cross-source merge: registry + blacklist → one record per person.
//!
//! 1. concatenate registry and blacklist candidates
//! 2. count how often each fingerprint occurs
//! 3. reject non-blacklisted records whose fingerprint occurs more than once
//! 4. group survivors by fingerprint; the first member represents the group
//!    and carries the group's distinct match types, comma-joined

use std::collections::HashMap;

use crate::model::PersonRecord;

/// Survivors sharing one fingerprint, in combined order.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchGroup {
    pub hash: String,
    pub members: Vec<PersonRecord>,
}

impl MatchGroup {
    /// Distinct non-empty match types in first-seen order, comma-joined.
    pub fn aggregated_type(&self) -> String {
        let mut types: Vec<&str> = Vec::new();
        for member in &self.members {
            let t = member.match_type.as_str();
            if !t.is_empty() && !types.contains(&t) {
                types.push(t);
            }
        }
        types.join(",")
    }

    /// The first member, with `type` replaced by the group's aggregate.
    pub fn into_representative(self) -> Option<PersonRecord> {
        let match_type = self.aggregated_type();
        log::debug!(
            "group {}: {} member(s), type {:?}",
            self.hash,
            self.members.len(),
            match_type
        );
        let mut representative = self.members.into_iter().next()?;
        representative.match_type = match_type;
        Some(representative)
    }
}

/// Merge registry and blacklist candidates into one record per person.
pub fn merge(whitelist: Vec<PersonRecord>, blacklist: Vec<PersonRecord>) -> Vec<PersonRecord> {
    let combined: Vec<PersonRecord> = whitelist.into_iter().chain(blacklist).collect();
    let total = combined.len();

    let counts = occurrence_counts(&combined);
    let survivors = reject_ambiguous(combined, &counts);
    log::debug!(
        "merge: {total} candidate(s), {} rejected as ambiguous",
        total - survivors.len()
    );

    group_by_fingerprint(survivors)
        .into_iter()
        .filter_map(MatchGroup::into_representative)
        .collect()
}

/// How many records carry each fingerprint.
pub fn occurrence_counts(records: &[PersonRecord]) -> HashMap<String, usize> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.hash.clone()).or_insert(0) += 1;
    }
    counts
}

/// Drop records that collide with another record and are not themselves
/// blacklist hits. A unique fingerprint always survives.
pub fn reject_ambiguous(
    records: Vec<PersonRecord>,
    counts: &HashMap<String, usize>,
) -> Vec<PersonRecord> {
    records
        .into_iter()
        .filter(|r| r.black_list || counts.get(&r.hash).copied().unwrap_or(0) <= 1)
        .collect()
}

/// Partition records by fingerprint. Groups are ordered by the first
/// appearance of their fingerprint; members keep their input order.
pub fn group_by_fingerprint(records: Vec<PersonRecord>) -> Vec<MatchGroup> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<MatchGroup> = Vec::new();

    for record in records {
        match slots.get(&record.hash) {
            Some(&idx) => groups[idx].members.push(record),
            None => {
                slots.insert(record.hash.clone(), groups.len());
                groups.push(MatchGroup {
                    hash: record.hash.clone(),
                    members: vec![record],
                });
            }
        }
    }

    groups
}
