//! Paginated discovery of blobs under a prefix

use crate::config::Config;
use crate::listing::errors::ListingError;
use crate::listing::page::parse_page;
use crate::models::BlobRecord;
use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::{debug, info, warn};

/// Source of raw listing pages.
#[async_trait]
pub trait ListingTransport {
    /// Fetch one listing page for `prefix`, continuing from `marker` when given.
    async fn fetch_page(&self, prefix: &str, marker: Option<&str>) -> Result<String, ListingError>;
}

/// Listing transport backed by the blob service's HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpListingClient {
    client: Client,
    listing_url: Url,
}

impl HttpListingClient {
    pub fn new(config: &Config) -> Result<Self, ListingError> {
        let listing_url =
            Url::parse(&config.listing_url).map_err(|e| ListingError::InvalidUrl {
                url: config.listing_url.clone(),
                message: e.to_string(),
            })?;

        let client = Client::builder()
            .user_agent(&config.http.user_agent)
            .timeout(config.http_timeout())
            .build()?;

        Ok(Self {
            client,
            listing_url,
        })
    }

    fn page_url(&self, prefix: &str, marker: Option<&str>) -> Url {
        let mut url = self.listing_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("prefix", prefix);
            if let Some(marker) = marker {
                query.append_pair("marker", marker);
            }
        }
        url
    }
}

#[async_trait]
impl ListingTransport for HttpListingClient {
    async fn fetch_page(&self, prefix: &str, marker: Option<&str>) -> Result<String, ListingError> {
        let url = self.page_url(prefix, marker);
        debug!("Requesting listing page: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ListingError::Status {
                status: status.as_u16(),
                prefix: prefix.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

/// Collect every blob under `prefix`, following continuation markers until
/// the listing reports no further pages.
///
/// Records keep server order and are not deduplicated. A failed request ends
/// the walk early and the records gathered so far are returned. `max_pages`
/// bounds the walk in case a server never stops handing out markers.
pub async fn discover<T>(transport: &T, prefix: &str, max_pages: usize) -> Vec<BlobRecord>
where
    T: ListingTransport + ?Sized,
{
    let mut records = Vec::new();
    let mut marker: Option<String> = None;

    for page_number in 1..=max_pages {
        let body = match transport.fetch_page(prefix, marker.as_deref()).await {
            Ok(body) => body,
            Err(e) => {
                warn!(
                    "Listing stopped at page {} for prefix '{}': {} ({} records kept)",
                    page_number,
                    prefix,
                    e,
                    records.len()
                );
                return records;
            }
        };

        let page = parse_page(&body);
        info!("Listing page {}: {} blobs", page_number, page.records.len());
        records.extend(page.records);

        match page.next_marker {
            Some(next) => marker = Some(next),
            None => return records,
        }
    }

    warn!(
        "Listing for prefix '{}' still had more pages after {} requests, results are incomplete",
        prefix, max_pages
    );
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned pages and records every request it receives.
    struct ScriptedTransport {
        pages: Mutex<VecDeque<Result<String, ListingError>>>,
        requests: Mutex<Vec<(String, Option<String>)>>,
    }

    impl ScriptedTransport {
        fn new(pages: Vec<Result<String, ListingError>>) -> Self {
            Self {
                pages: Mutex::new(pages.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<(String, Option<String>)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ListingTransport for ScriptedTransport {
        async fn fetch_page(&self, prefix: &str, marker: Option<&str>) -> Result<String, ListingError> {
            self.requests
                .lock()
                .unwrap()
                .push((prefix.to_string(), marker.map(str::to_string)));
            self.pages
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(String::new()))
        }
    }

    fn page(urls: &[&str], marker: &str) -> Result<String, ListingError> {
        let blobs: String = urls
            .iter()
            .map(|url| format!("<Blob><Url>{url}</Url></Blob>"))
            .collect();
        Ok(format!(
            "<EnumerationResults><Blobs>{blobs}</Blobs><NextMarker>{marker}</NextMarker></EnumerationResults>"
        ))
    }

    fn unavailable() -> Result<String, ListingError> {
        Err(ListingError::Status {
            status: 503,
            prefix: "Datasets".to_string(),
        })
    }

    fn urls(records: &[BlobRecord]) -> Vec<&str> {
        records.iter().map(|r| r.url.as_str()).collect()
    }

    #[tokio::test]
    async fn test_follows_marker_across_pages() {
        let transport = ScriptedTransport::new(vec![
            page(&["Datasets/a/20230101_a.csv", "Datasets/a/20230102_b.csv"], "marker-1"),
            page(&["Datasets/a/20230103_c.csv"], ""),
        ]);

        let records = discover(&transport, "Datasets/a", 100).await;

        assert_eq!(
            urls(&records),
            vec![
                "Datasets/a/20230101_a.csv",
                "Datasets/a/20230102_b.csv",
                "Datasets/a/20230103_c.csv"
            ]
        );
        assert_eq!(
            transport.requests(),
            vec![
                ("Datasets/a".to_string(), None),
                ("Datasets/a".to_string(), Some("marker-1".to_string())),
            ]
        );
    }

    #[tokio::test]
    async fn test_transport_failure_keeps_partial_results() {
        let transport = ScriptedTransport::new(vec![
            page(&["Datasets/a/one.csv"], "m1"),
            unavailable(),
            page(&["Datasets/a/never.csv"], ""),
        ]);

        let records = discover(&transport, "Datasets/a", 100).await;

        assert_eq!(urls(&records), vec!["Datasets/a/one.csv"]);
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_failure_on_first_page_returns_nothing() {
        let transport = ScriptedTransport::new(vec![unavailable()]);
        assert!(discover(&transport, "Datasets", 100).await.is_empty());
    }

    #[tokio::test]
    async fn test_duplicates_are_kept() {
        let transport = ScriptedTransport::new(vec![
            page(&["Datasets/x.csv"], "m1"),
            page(&["Datasets/x.csv"], ""),
        ]);

        let records = discover(&transport, "Datasets", 100).await;
        assert_eq!(urls(&records), vec!["Datasets/x.csv", "Datasets/x.csv"]);
    }

    #[tokio::test]
    async fn test_page_cap_stops_endless_listing() {
        let transport = ScriptedTransport::new(vec![
            page(&["Datasets/1.csv"], "m1"),
            page(&["Datasets/2.csv"], "m2"),
            page(&["Datasets/3.csv"], "m3"),
        ]);

        let records = discover(&transport, "Datasets", 2).await;

        assert_eq!(urls(&records), vec!["Datasets/1.csv", "Datasets/2.csv"]);
        assert_eq!(transport.requests().len(), 2);
    }

    #[test]
    fn test_page_url_appends_prefix_and_marker() {
        let client = HttpListingClient::new(&Config::default()).unwrap();

        let first = client.page_url("Datasets/Wholesale", None);
        assert_eq!(
            first.as_str(),
            "https://emidatasets.blob.core.windows.net/publicdata?restype=container&comp=list&prefix=Datasets%2FWholesale"
        );

        let next = client.page_url("Datasets/Wholesale", Some("2!96!abc"));
        let pairs: Vec<(String, String)> = next.query_pairs().into_owned().collect();
        assert_eq!(pairs.last().unwrap(), &("marker".to_string(), "2!96!abc".to_string()));
    }

    #[test]
    fn test_invalid_listing_url_is_rejected() {
        let config = Config {
            listing_url: "::not-a-url".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            HttpListingClient::new(&config),
            Err(ListingError::InvalidUrl { .. })
        ));
    }
}
