use std::collections::HashSet;

use tracing::debug;

use crate::clock::RunClock;
use crate::listing::ListingRecord;

/// Turn the raw pool into the final feed.
///
/// Drops anything at or before the run threshold, keeps the first record
/// per [`ListingRecord::dedupe_key`], and orders newest first. Records with
/// equal timestamps keep their pool order.
#[must_use]
pub fn aggregate(raw: Vec<ListingRecord>, clock: &RunClock) -> Vec<ListingRecord> {
    let total = raw.len();
    let mut seen = HashSet::new();

    let mut feed: Vec<ListingRecord> = raw
        .into_iter()
        .filter(|record| clock.is_recent(record.posted_at) && !record.url.is_empty())
        .filter(|record| seen.insert(record.dedupe_key()))
        .collect();
    feed.sort_by(|a, b| b.posted_at.cmp(&a.posted_at));

    debug!(raw = total, kept = feed.len(), "Aggregated listings");
    feed
}
