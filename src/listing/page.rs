//! Parsing of a single listing page

use crate::dates::{extract_date_from_url, parse_date};
use crate::listing::markup::extract_first;
use crate::models::BlobRecord;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// `<Blob>` entries and the `<NextMarker>` in one pass, so their relative
/// order in the page is kept.
static BLOB_OR_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<Blob>(.*?)</Blob>|<NextMarker>(.*?)</NextMarker>").expect("valid regex")
});

/// Records found on one page plus the marker of the following page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    pub records: Vec<BlobRecord>,
    /// `None` when this is the last page
    pub next_marker: Option<String>,
}

pub fn parse_page(doc: &str) -> ListingPage {
    let mut page = ListingPage::default();

    for caps in BLOB_OR_MARKER.captures_iter(doc) {
        if let Some(blob) = caps.get(1) {
            page.records.push(parse_blob(blob.as_str()));
        } else if let Some(marker) = caps.get(2) {
            let marker = marker.as_str();
            page.next_marker = (!marker.is_empty()).then(|| marker.to_string());
        }
    }

    debug!(
        "Parsed listing page: {} records, next marker: {:?}",
        page.records.len(),
        page.next_marker
    );
    page
}

fn parse_blob(inner: &str) -> BlobRecord {
    let url = extract_first("Url", inner);
    let last_modified = extract_first("Last-Modified", inner);

    BlobRecord {
        embedded_date: extract_date_from_url(&url),
        last_modified: parse_date(&last_modified),
        url,
    }
}
