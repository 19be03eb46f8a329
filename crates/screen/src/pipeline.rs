use crate::dates::{filter_by_range, sort_newest_first};
use crate::dedupe::dedupe;
use crate::error::ScreenError;
use crate::merge::merge;
use crate::model::{PersonRecord, SearchCriteria, SearchOutcome, SearchRequest, Source};
use crate::source::SearchClient;

/// Run one screening request.
///
/// Registry results are rehashed and deduplicated. With no name and no
/// birth date the deduplicated registry set is returned as-is and the
/// blacklist is never queried. Otherwise the registry set is range-filtered,
/// the blacklist is fetched and rehashed, and both are merged.
pub fn search<C: SearchClient + ?Sized>(
    client: &C,
    request: &SearchRequest,
) -> Result<SearchOutcome, ScreenError> {
    let registry = fetch(client, Source::Registry, &request.criteria)?;
    let whitelist = dedupe(registry);
    log::debug!("registry: {} distinct record(s)", whitelist.len());

    if request.criteria.is_empty() {
        return Ok(SearchOutcome::Passthrough(whitelist));
    }

    let whitelist = filter_by_range(
        whitelist,
        request.date1.as_deref(),
        request.date2.as_deref(),
    )?;
    let blacklist = fetch(client, Source::Blacklist, &request.criteria)?;
    log::debug!("blacklist: {} candidate(s)", blacklist.len());

    let merged = merge(whitelist, blacklist);
    log::info!(
        "screened: {} result(s), {} blacklisted",
        merged.len(),
        merged.iter().filter(|r| r.black_list).count()
    );
    Ok(SearchOutcome::Screened(merged))
}

/// Plain registry listing, optionally restricted to one sanction level,
/// newest first. No dedupe, no screening.
pub fn list_registry<C: SearchClient + ?Sized>(
    client: &C,
    risk: Option<i32>,
) -> Result<Vec<PersonRecord>, ScreenError> {
    let mut records = fetch(client, Source::Registry, &SearchCriteria::default())?;
    if let Some(level) = risk {
        records.retain(|r| r.sanction == level);
    }
    sort_newest_first(&mut records);
    Ok(records)
}

/// Query one source and normalize what comes back: fingerprints are
/// recomputed from the record fields and the blacklist flag follows the
/// source. Registry records carry no match type.
fn fetch<C: SearchClient + ?Sized>(
    client: &C,
    source: Source,
    criteria: &SearchCriteria,
) -> Result<Vec<PersonRecord>, ScreenError> {
    let mut records = client.search(source, criteria).map_err(|e| {
        log::warn!("{e}");
        e
    })?;

    for record in &mut records {
        record.rehash();
        match source {
            Source::Registry => {
                record.black_list = false;
                record.match_type.clear();
            }
            Source::Blacklist => record.black_list = true,
        }
    }
    Ok(records)
}
