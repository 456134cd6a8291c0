use tweetminer_api::{ArchiveSearchQuery, Client, Error, RecentSearchQuery};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

fn client_for(server: &MockServer) -> Client {
    Client::new(
        &format!("{}/2/tweets/search/recent", server.uri()),
        &format!("{}/1.1/tweets/search/30day/prod.json", server.uri()),
        "test-bearer-token",
    )
}

#[tokio::test]
async fn recent_tweets_success() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("recent.json");

    Mock::given(method("GET"))
        .and(path("/2/tweets/search/recent"))
        .and(query_param("query", "from:alice"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-rate-limit-remaining", "299")
                .set_body_string(&body),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let query = RecentSearchQuery::new("alice", "2021-11-07T00:00:00Z");
    let fetched = client.recent_tweets(&query).await.unwrap();

    assert_eq!(fetched.rate_remaining, Some(299));
    let entries = fetched.payload.data.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["id"], "1457621234567890944");
}

#[tokio::test]
async fn recent_tweets_without_data_field() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2/tweets/search/recent"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"meta":{"result_count":0}}"#),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let query = RecentSearchQuery::new("alice", "2021-11-07T00:00:00Z");
    let fetched = client.recent_tweets(&query).await.unwrap();

    assert!(fetched.payload.data.is_none());
    assert_eq!(fetched.rate_remaining, None);
}

#[tokio::test]
async fn recent_tweets_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2/tweets/search/recent"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let query = RecentSearchQuery::new("alice", "2021-11-07T00:00:00Z");
    let result = client.recent_tweets(&query).await;

    assert!(matches!(result, Err(Error::HttpStatus { status: 500, .. })));
}

#[tokio::test]
async fn recent_tweets_malformed_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2/tweets/search/recent"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json}"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let query = RecentSearchQuery::new("alice", "2021-11-07T00:00:00Z");
    assert!(client.recent_tweets(&query).await.is_err());
}

#[tokio::test]
async fn archive_search_first_page() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("archive_page1.json");

    Mock::given(method("POST"))
        .and(path("/1.1/tweets/search/30day/prod.json"))
        .and(body_partial_json(serde_json::json!({
            "query": "from:alice",
            "maxResults": "100",
            "toDate": "202111010000"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-rate-limit-remaining", "58")
                .set_body_string(&body),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let query = ArchiveSearchQuery::new("alice", "202111010000");
    let fetched = client.archive_search(&query).await.unwrap();

    assert_eq!(fetched.rate_remaining, Some(58));
    assert_eq!(fetched.payload.results.unwrap().len(), 1);
    assert_eq!(
        fetched.payload.next.as_deref(),
        Some("eyJtYXhJZCI6MTQ1NjIwOTg3NjU0MzIxMDQ5Nn0")
    );
}

#[tokio::test]
async fn archive_search_carries_cursor() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("archive_page2.json");

    Mock::given(method("POST"))
        .and(path("/1.1/tweets/search/30day/prod.json"))
        .and(body_partial_json(serde_json::json!({
            "next": "eyJtYXhJZCI6MTQ1NjIwOTg3NjU0MzIxMDQ5Nn0"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let query = ArchiveSearchQuery::new("alice", "202111010000")
        .with_next("eyJtYXhJZCI6MTQ1NjIwOTg3NjU0MzIxMDQ5Nn0");
    let fetched = client.archive_search(&query).await.unwrap();

    // Final page: no cursor means the backlog is exhausted.
    assert!(fetched.payload.next.is_none());
    assert_eq!(fetched.payload.results.unwrap().len(), 1);
}

#[tokio::test]
async fn archive_search_rate_limited_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/1.1/tweets/search/30day/prod.json"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("x-rate-limit-remaining", "0")
                .set_body_string(r#"{"errors":[{"message":"Rate limit exceeded"}]}"#),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let query = ArchiveSearchQuery::new("alice", "202111010000");
    let result = client.archive_search(&query).await;

    assert!(matches!(result, Err(Error::HttpStatus { status: 429, .. })));
}
