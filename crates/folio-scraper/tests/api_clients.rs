//! Integration tests for the GitHub and iTunes clients using `wiremock`.

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use folio_scraper::{AppStoreClient, GithubClient, HttpClient, ScraperError};

fn http() -> HttpClient {
    HttpClient::new(5, "folio-test/0.1", 0, 0).expect("failed to build test HttpClient")
}

fn repo(server: &MockServer, name: &str, stars: u64, fork: bool, language: Option<&str>) -> serde_json::Value {
    json!({
        "name": name,
        "stargazers_count": stars,
        "fork": fork,
        "language": language,
        "languages_url": format!("{}/repos/octo/{name}/languages", server.uri()),
    })
}

// ---------------------------------------------------------------------------
// GitHub
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_all_repos_follows_pages_until_short_page() {
    let server = MockServer::start().await;
    let full_page: Vec<_> = (0..100)
        .map(|i| repo(&server, &format!("r{i}"), 1, false, None))
        .collect();

    Mock::given(method("GET"))
        .and(path("/users/octo/repos"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&full_page))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/octo/repos"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([repo(&server, "last", 5, false, None)])),
        )
        .mount(&server)
        .await;

    let client = GithubClient::new(http()).with_base_url(server.uri());
    let repos = client.fetch_all_repos("octo").await.unwrap();
    assert_eq!(repos.len(), 101);
    assert_eq!(repos.last().map(|r| r.name.as_str()), Some("last"));
}

#[tokio::test]
async fn fetch_all_repos_propagates_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octo/repos"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = GithubClient::new(http()).with_base_url(server.uri());
    let err = client.fetch_all_repos("octo").await.unwrap_err();
    assert!(matches!(err, ScraperError::UnexpectedStatus { status: 403, .. }));
}

#[tokio::test]
async fn fetch_user_stats_sums_stars_and_reads_search_totals() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/commits"))
        .and(query_param("q", "author:octo"))
        .and(header("accept", "application/vnd.github.cloak-preview+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "total_count": 1234 })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/issues"))
        .and(query_param("q", "author:octo type:pr"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "total_count": 56 })))
        .mount(&server)
        .await;

    let repos: Vec<folio_scraper::GithubRepo> = serde_json::from_value(json!([
        repo(&server, "a", 10, false, Some("Rust")),
        repo(&server, "b", 32, true, None),
    ]))
    .unwrap();

    let client = GithubClient::new(http()).with_base_url(server.uri());
    let stats = client.fetch_user_stats("octo", &repos).await.unwrap();
    assert_eq!(stats.stars, 42);
    assert_eq!(stats.commits, 1234);
    assert_eq!(stats.prs, 56);
}

#[tokio::test]
async fn fetch_top_languages_skips_forks_and_failed_lookups() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/app/languages"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "Dart": 700, "Swift": 100 })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/site/languages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "JavaScript": 200 })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/broken/languages"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/forked/languages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "C": 1_000_000 })))
        .expect(0)
        .mount(&server)
        .await;

    let repos: Vec<folio_scraper::GithubRepo> = serde_json::from_value(json!([
        repo(&server, "app", 0, false, Some("Dart")),
        repo(&server, "site", 0, false, Some("JavaScript")),
        repo(&server, "broken", 0, false, Some("Go")),
        repo(&server, "forked", 0, true, Some("C")),
        repo(&server, "docs", 0, false, None),
    ]))
    .unwrap();

    let client = GithubClient::new(http()).with_base_url(server.uri());
    let languages = client.fetch_top_languages(&repos, 2).await.unwrap();

    assert_eq!(languages.len(), 2);
    assert_eq!(languages[0].name, "Dart");
    assert_eq!(languages[0].percentage, "77.8");
    assert_eq!(languages[0].color, "#00B4AB");
    assert_eq!(languages[1].name, "JavaScript");
    assert_eq!(languages[1].percentage, "22.2");
}

#[tokio::test]
async fn fetch_top_languages_fails_when_every_lookup_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/app/languages"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let repos: Vec<folio_scraper::GithubRepo> =
        serde_json::from_value(json!([repo(&server, "app", 0, false, Some("Dart"))])).unwrap();

    let client = GithubClient::new(http()).with_base_url(server.uri());
    let err = client.fetch_top_languages(&repos, 3).await.unwrap_err();
    assert!(matches!(err, ScraperError::NotFound { .. }));
}

// ---------------------------------------------------------------------------
// iTunes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn app_lookup_reads_name_and_screenshots() {
    let server = MockServer::start().await;
    let body = json!({
        "resultCount": 1,
        "results": [{
            "trackName": "Bucketize",
            "screenshotUrls": ["https://a", "https://b", "https://c"]
        }]
    });
    Mock::given(method("GET"))
        .and(path("/lookup"))
        .and(query_param("id", "6602886816"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = AppStoreClient::new(http()).with_lookup_url(format!("{}/lookup", server.uri()));
    let lookup = client.lookup("6602886816").await.unwrap();
    assert_eq!(lookup.app_name.as_deref(), Some("Bucketize"));
    assert_eq!(lookup.screenshots, 3);
    assert_eq!(lookup.raw, body);
}

#[tokio::test]
async fn app_lookup_with_no_results_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lookup"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "resultCount": 0, "results": [] })),
        )
        .mount(&server)
        .await;

    let client = AppStoreClient::new(http()).with_lookup_url(format!("{}/lookup", server.uri()));
    let err = client.lookup("1").await.unwrap_err();
    assert!(matches!(err, ScraperError::AppNotFound { .. }));
    assert_eq!(err.to_string(), "App not found in iTunes response");
}

#[tokio::test]
async fn app_lookup_surfaces_status_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lookup"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let client = AppStoreClient::new(http()).with_lookup_url(format!("{}/lookup", server.uri()));
    let err = client.lookup("1").await.unwrap_err();
    assert!(matches!(err, ScraperError::UnexpectedStatus { status: 400, .. }));
}
