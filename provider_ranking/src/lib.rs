mod config;
mod normalizer;

pub mod builder;
pub mod manual;

use log::{debug, info};

use std::{
    cmp::Reverse,
    collections::HashMap,
    ops::{Add, AddAssign},
};

pub use crate::config::*;
pub use crate::normalizer::{normalize_name, AliasMap};

// **** Private structures ****

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
struct ProviderId(u32);

#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash)]
struct AccessCount(u64);

impl AccessCount {
    const EMPTY: AccessCount = AccessCount(0);
}

impl std::iter::Sum for AccessCount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        AccessCount(iter.map(|ac| ac.0).sum())
    }
}

impl AddAssign for AccessCount {
    fn add_assign(&mut self, rhs: AccessCount) {
        self.0 += rhs.0;
    }
}

impl Add for AccessCount {
    type Output = AccessCount;
    fn add(self: AccessCount, rhs: AccessCount) -> AccessCount {
        AccessCount(self.0 + rhs.0)
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
struct RecordInternal {
    provider: ProviderId,
    count: AccessCount,
}

/// Aggregates the given records into one row per canonical provider name.
///
/// Arguments:
/// * `coll` the records to process, in file order
/// * `options` the options governing the output (sort order)
/// * `aliases` the alias table used to canonicalize the raw names
///
/// Every raw name is canonicalized exactly once. The grand total of the
/// result is always the sum of the input counts. An empty input produces an
/// empty ranking, not an error.
pub fn run_ranking_stats(
    coll: &[ProviderRecord],
    options: &RankingOptions,
    aliases: &AliasMap,
) -> Result<RankingResult, RankingErrors> {
    info!(
        "Processing {:?} records, options: {:?}, {:?} aliases",
        coll.len(),
        options,
        aliases.len()
    );

    // The providers in first-seen order. This order defines the ids and the
    // tie-breaking of the final sort.
    let mut provider_ids: HashMap<String, ProviderId> = HashMap::new();
    let mut ordered_providers: Vec<(String, ProviderId)> = Vec::new();
    let mut internal: Vec<RecordInternal> = Vec::with_capacity(coll.len());
    for r in coll.iter() {
        let canonical = aliases.canonicalize(&r.raw_name);
        let pid = match provider_ids.get(&canonical) {
            Some(pid) => *pid,
            None => {
                let pid = ProviderId(ordered_providers.len() as u32);
                provider_ids.insert(canonical.clone(), pid);
                ordered_providers.push((canonical, pid));
                pid
            }
        };
        internal.push(RecordInternal {
            provider: pid,
            count: AccessCount(r.access_count),
        });
    }
    debug!(
        "run_ranking_stats: {:?} distinct providers out of {:?} records",
        ordered_providers.len(),
        internal.len()
    );

    let tally = compute_tally(&internal, &ordered_providers);
    let total: AccessCount = tally.values().cloned().sum();

    let mut rows: Vec<AggregateRow> = ordered_providers
        .iter()
        .map(|(name, pid)| AggregateRow {
            canonical_name: name.clone(),
            total_access_count: tally.get(pid).cloned().unwrap_or(AccessCount::EMPTY).0,
        })
        .collect();

    match options.sort_order {
        SortOrder::FirstSeen => {}
        SortOrder::TotalDescending => {
            // The sort is stable: equal totals keep the first-seen order.
            rows.sort_by_key(|r| Reverse(r.total_access_count));
        }
    }

    Ok(RankingResult {
        total_access_count: total.0,
        rows,
    })
}

fn compute_tally(
    records: &[RecordInternal],
    providers: &[(String, ProviderId)],
) -> HashMap<ProviderId, AccessCount> {
    let mut tally: HashMap<ProviderId, AccessCount> = HashMap::new();
    for (_, pid) in providers.iter() {
        tally.insert(*pid, AccessCount::EMPTY);
    }
    for r in records.iter() {
        if let Some(ac) = tally.get_mut(&r.provider) {
            *ac += r.count;
        }
    }
    tally
}

/// Returns the rows whose canonical name contains the query as a substring.
///
/// The query goes through the same normalization as the provider names, so
/// the match ignores case, accents and punctuation. The empty query is not
/// treated specially: it matches every row, and callers who want a "no
/// query" behavior must guard for it. An empty result set means that no
/// provider matched.
pub fn search_rows(rows: &[AggregateRow], query: &str) -> Vec<AggregateRow> {
    let needle = normalize_name(query);
    rows.iter()
        .filter(|r| r.canonical_name.contains(&needle))
        .cloned()
        .collect()
}
