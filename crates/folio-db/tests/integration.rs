//! Offline tests for folio-db pool configuration and the in-memory store.
//! These tests do not require a live database connection.

use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use folio_core::{AppConfig, AppCacheEntry, Environment};
use folio_db::{get_json, put_json, KvStore, MemoryKvStore, PoolConfig};
use serde_json::json;

fn app_config() -> AppConfig {
    AppConfig {
        database_url: Some("postgres://example".to_string()),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        api_keys: Vec::new(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        scraper_request_timeout_secs: 30,
        scraper_user_agent: "ua".to_string(),
        scraper_max_retries: 2,
        scraper_retry_backoff_base_secs: 2,
        social_handles: BTreeMap::new(),
        github_username: None,
        github_top_langs: 3,
        app_ids: Vec::new(),
        social_cron: "0 0 6 * * *".to_string(),
        github_cron: "0 10 6 * * *".to_string(),
        apps_cron: "0 20 6 * * *".to_string(),
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let pool_config = PoolConfig::from_app_config(&app_config());
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[tokio::test]
async fn typed_helpers_round_trip_app_cache_entry() {
    let store = MemoryKvStore::new();
    let entry = AppCacheEntry {
        data: json!({ "resultCount": 1 }),
        fetched_at: 1_740_808_800_000,
        app_name: Some("Tally".to_string()),
    };

    let version = put_json(&store, "app:441599004", &entry).await.unwrap();
    assert_eq!(version, 1);

    let loaded: Option<AppCacheEntry> = get_json(&store, "app:441599004").await.unwrap();
    assert_eq!(loaded, Some(entry));
}

#[tokio::test]
async fn get_json_reports_decode_failure_with_key() {
    let store = MemoryKvStore::new();
    store.put("app:1", json!("not an object")).await.unwrap();

    let err = get_json::<AppCacheEntry>(&store, "app:1").await.unwrap_err();
    assert!(err.to_string().contains("app:1"), "unexpected error: {err}");
}

#[tokio::test]
async fn concurrent_cas_writers_only_one_wins() {
    let store: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
    store.put("k", json!(0)).await.unwrap();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.compare_and_swap("k", Some(1), json!(i)).await })
        })
        .collect();

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);
    assert_eq!(store.get("k").await.unwrap().unwrap().version, 2);
}

#[tokio::test]
async fn memory_store_is_always_healthy() {
    let store = MemoryKvStore::new();
    store.health_check().await.unwrap();
    assert_eq!(store.backend(), "memory");
}
