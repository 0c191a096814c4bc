//! Live integration tests for folio-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/folio-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory. Run with `DATABASE_URL` set and `--ignored`.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use folio_core::{Platform, PlatformStat, StatsSnapshot};
use folio_db::{KvStore, PgKvStore, SnapshotStore};
use serde_json::json;

fn snapshot(count: u64) -> StatsSnapshot {
    StatsSnapshot::new(
        Utc.with_ymd_and_hms(2025, 3, 1, 6, 0, 0).unwrap(),
        [(Platform::Youtube, PlatformStat::ok(count))]
            .into_iter()
            .collect(),
    )
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn put_and_get_round_trip(pool: sqlx::PgPool) {
    let store = PgKvStore::new(pool);

    assert!(store.get("missing").await.unwrap().is_none());

    assert_eq!(store.put("k", json!({ "a": 1 })).await.unwrap(), 1);
    assert_eq!(store.put("k", json!({ "a": 2 })).await.unwrap(), 2);

    let entry = store.get("k").await.unwrap().expect("entry should exist");
    assert_eq!(entry.value, json!({ "a": 2 }));
    assert_eq!(entry.version, 2);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn compare_and_swap_honours_version(pool: sqlx::PgPool) {
    let store = PgKvStore::new(pool);

    assert!(store.compare_and_swap("k", None, json!(1)).await.unwrap());
    assert!(!store.compare_and_swap("k", None, json!(2)).await.unwrap());
    assert!(!store.compare_and_swap("k", Some(7), json!(3)).await.unwrap());
    assert!(store.compare_and_swap("k", Some(1), json!(4)).await.unwrap());

    let entry = store.get("k").await.unwrap().unwrap();
    assert_eq!(entry.value, json!(4));
    assert_eq!(entry.version, 2);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn delete_removes_entry(pool: sqlx::PgPool) {
    let store = PgKvStore::new(pool);
    store.put("k", json!(true)).await.unwrap();

    assert!(store.delete("k").await.unwrap());
    assert!(!store.delete("k").await.unwrap());
    assert!(store.get("k").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn snapshot_store_writes_wire_layout(pool: sqlx::PgPool) {
    let snapshots = SnapshotStore::new(Arc::new(PgKvStore::new(pool)));

    assert!(snapshots.write_if_version(&snapshot(5000), None).await.unwrap());
    let (read, version) = snapshots.read().await;
    assert_eq!(read, Some(snapshot(5000)));
    assert_eq!(version, Some(1));

    assert_eq!(
        snapshots.load_raw().await.unwrap(),
        Some(json!({
            "updatedAt": "2025-03-01T06:00:00.000Z",
            "youtube": { "subscribers": 5000 }
        }))
    );
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn health_check_pings_database(pool: sqlx::PgPool) {
    let store = PgKvStore::new(pool);
    store.health_check().await.unwrap();
    assert_eq!(store.backend(), "postgres");
}
