use super::*;

#[test]
fn domain_of_extracts_host() {
    assert_eq!(domain_of("https://www.youtube.com/@someone/about"), "www.youtube.com");
    assert_eq!(domain_of("http://127.0.0.1:4321/path"), "127.0.0.1");
}

#[test]
fn domain_of_falls_back_to_input() {
    assert_eq!(domain_of("not-a-url"), "not-a-url");
}

#[test]
fn client_builds_with_zero_retries() {
    let client = HttpClient::new(5, "folio-test/0.1", 0, 0).unwrap();
    assert_eq!(client.max_retries, 0);
    assert_eq!(client.backoff_base_secs, 0);
}

#[test]
fn client_from_app_config_uses_scraper_settings() {
    let mut map = std::collections::HashMap::new();
    map.insert("FOLIO_SCRAPER_MAX_RETRIES", "4");
    map.insert("FOLIO_SCRAPER_RETRY_BACKOFF_BASE_SECS", "1");
    let config = folio_core::build_app_config(|key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(std::env::VarError::NotPresent)
    })
    .unwrap();

    let client = HttpClient::from_app_config(&config).unwrap();
    assert_eq!(client.max_retries, 4);
    assert_eq!(client.backoff_base_secs, 1);
}
