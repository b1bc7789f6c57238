// Search helpers for the external search collaborator
// Operates only on TrackMetadata, never on live tracks.

use crate::project::types::TrackMetadata;
use std::cmp::Ordering;

/// Ordering contract: lexicographic on title, then author, and when both
/// match, most recent first
pub fn compare_results(a: &TrackMetadata, b: &TrackMetadata) -> Ordering {
    a.title
        .cmp(&b.title)
        .then_with(|| a.author.cmp(&b.author))
        .then_with(|| b.timestamp.cmp(&a.timestamp))
}

/// Sort search results in place per the ordering contract
pub fn sort_results(results: &mut [TrackMetadata]) {
    results.sort_by(compare_results);
}

/// Case-insensitive match against title or author
pub fn matches_query(metadata: &TrackMetadata, query: &str) -> bool {
    let query = query.to_lowercase();
    metadata.title.to_lowercase().contains(&query)
        || metadata.author.to_lowercase().contains(&query)
}

/// Filter and sort results for a query
pub fn search(mut results: Vec<TrackMetadata>, query: &str) -> Vec<TrackMetadata> {
    results.retain(|m| matches_query(m, query));
    sort_results(&mut results);
    results
}
