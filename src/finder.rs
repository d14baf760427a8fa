use crate::listing::{discover, ListingTransport};
use crate::models::{BlobRecord, SearchQuery};
use crate::query::{filter_by_range, interpret};
use tracing::info;

/// Result of one search: the interpreted query and the blobs that matched it.
#[derive(Debug, Clone)]
pub struct FoundBlobs {
    pub query: SearchQuery,
    pub records: Vec<BlobRecord>,
}

/// Interpret `raw_query`, list everything under its prefix, then narrow the
/// listing to the requested date range.
pub async fn find_blobs<T>(transport: &T, raw_query: &str, max_pages: usize) -> FoundBlobs
where
    T: ListingTransport + ?Sized,
{
    let query = interpret(raw_query);
    info!(
        "Searching prefix '{}' (start: {}, end: {})",
        query.prefix, query.range.start_date, query.range.end_date
    );

    let listed = discover(transport, &query.prefix, max_pages).await;
    let listed_count = listed.len();
    let records = filter_by_range(listed, &query.range);

    info!(
        "Found {} blobs, {} within the requested dates",
        listed_count,
        records.len()
    );

    FoundBlobs { query, records }
}
