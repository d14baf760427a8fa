use eagrab::config::Config;
use eagrab::finder::find_blobs;
use eagrab::listing::{discover, HttpListingClient, ListingError, ListingTransport};
use eagrab::models::CalendarDate;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn listing_page(server: &MockServer, names: &[&str], marker: &str) -> String {
    let blobs: String = names
        .iter()
        .map(|name| {
            format!(
                "<Blob><Name>{name}</Name><Url>{}/publicdata/{name}</Url><Properties>\
                 <Last-Modified>Mon, 02 Jan 2023 10:00:00 GMT</Last-Modified></Properties></Blob>",
                server.uri()
            )
        })
        .collect();

    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?><EnumerationResults><Blobs>{blobs}</Blobs>\
         <NextMarker>{marker}</NextMarker></EnumerationResults>"
    )
}

fn config_for(server: &MockServer) -> Config {
    Config {
        listing_url: format!("{}/publicdata?restype=container&comp=list", server.uri()),
        ..Config::default()
    }
}

#[tokio::test]
async fn test_discover_follows_markers_over_http() {
    let server = MockServer::start().await;

    // Marker-specific mock first so it wins over the generic first-page mock
    Mock::given(method("GET"))
        .and(path("/publicdata"))
        .and(query_param("prefix", "Datasets/Wholesale"))
        .and(query_param("marker", "2!96!page-two"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(
            &server,
            &["Datasets/Wholesale/Bids/20230301_Bids.csv"],
            "",
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/publicdata"))
        .and(query_param("restype", "container"))
        .and(query_param("comp", "list"))
        .and(query_param("prefix", "Datasets/Wholesale"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(
            &server,
            &[
                "Datasets/Wholesale/Bids/20230101_Bids.csv",
                "Datasets/Wholesale/Bids/20230201_Bids.csv",
            ],
            "2!96!page-two",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpListingClient::new(&config_for(&server)).unwrap();
    let records = discover(&transport, "Datasets/Wholesale", 100).await;

    let embedded: Vec<CalendarDate> = records.iter().map(|r| r.embedded_date).collect();
    assert_eq!(
        embedded,
        vec![
            CalendarDate::from_ymd(2023, 1, 1),
            CalendarDate::from_ymd(2023, 2, 1),
            CalendarDate::from_ymd(2023, 3, 1),
        ]
    );
    assert!(records
        .iter()
        .all(|r| r.last_modified == CalendarDate::from_ymd(2023, 1, 2)));
}

#[tokio::test]
async fn test_server_error_is_a_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let transport = HttpListingClient::new(&config_for(&server)).unwrap();

    let page = transport.fetch_page("Datasets", None).await;
    assert!(matches!(page, Err(ListingError::Status { status: 503, .. })));

    assert!(discover(&transport, "Datasets", 100).await.is_empty());
}

#[tokio::test]
async fn test_find_blobs_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/publicdata"))
        .and(query_param("prefix", "Datasets/Environment"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(
            &server,
            &[
                "Datasets/Environment/Hydro/2_Flows_20221231",
                "Datasets/Environment/Hydro/2_Flows_20231231",
                "Datasets/Environment/Hydro/Readme.pdf",
            ],
            "",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpListingClient::new(&config_for(&server)).unwrap();
    let found = find_blobs(&transport, "Datasets/Environment -SD 2023-01-01", 100).await;

    assert_eq!(found.query.prefix, "Datasets/Environment");
    assert_eq!(found.records.len(), 1);
    assert!(found.records[0].url.ends_with("2_Flows_20231231"));
}
