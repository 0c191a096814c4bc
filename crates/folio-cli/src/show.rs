use folio_core::{
    app_cache_key, is_numeric_id, StatsSnapshot, APPS_SUMMARY_KEY, GITHUB_STATS_KEY,
    SOCIAL_SNAPSHOT_KEY,
};
use folio_db::KvStore;
use serde_json::Value;

pub(crate) async fn social(store: &dyn KvStore) -> anyhow::Result<()> {
    let Some(entry) = store.get(SOCIAL_SNAPSHOT_KEY).await? else {
        println!("no social snapshot stored yet");
        return Ok(());
    };
    if let Err(e) = StatsSnapshot::from_value(&entry.value) {
        tracing::warn!(error = %e, "stored snapshot does not parse");
    }
    print_entry(&entry.value, entry.version)
}

pub(crate) async fn github(store: &dyn KvStore) -> anyhow::Result<()> {
    match store.get(GITHUB_STATS_KEY).await? {
        Some(entry) => print_entry(&entry.value, entry.version),
        None => {
            println!("no github record stored yet");
            Ok(())
        }
    }
}

pub(crate) async fn apps(store: &dyn KvStore, app_id: Option<&str>) -> anyhow::Result<()> {
    let key = match app_id {
        Some(id) if !is_numeric_id(id) => anyhow::bail!("invalid app id \"{id}\""),
        Some(id) => app_cache_key(id),
        None => APPS_SUMMARY_KEY.to_string(),
    };
    match store.get(&key).await? {
        Some(entry) => print_entry(&entry.value, entry.version),
        None => {
            println!("nothing stored under \"{key}\"");
            Ok(())
        }
    }
}

fn print_entry(value: &Value, version: i64) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    println!("(version {version})");
    Ok(())
}
