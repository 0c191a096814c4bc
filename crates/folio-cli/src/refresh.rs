//! Foreground refresh runs.
//!
//! Each handler builds the same refresher the server schedules and prints a
//! short report of the outcome to stdout.

use std::sync::Arc;

use folio_core::{AppConfig, Platform, PlatformStat};
use folio_db::KvStore;
use folio_refresh::{AppsRefresher, GithubRefresher, SocialRefresher};
use folio_scraper::{AppStoreClient, GithubClient, HttpClient, SocialClient};

pub(crate) async fn run_social(
    config: &AppConfig,
    store: Arc<dyn KvStore>,
    dry_run: bool,
) -> anyhow::Result<()> {
    if config.social_handles.is_empty() {
        anyhow::bail!("no social handles configured; set FOLIO_<PLATFORM>_HANDLE");
    }
    let client = SocialClient::new(HttpClient::from_app_config(config)?);

    if dry_run {
        let candidate = client.fetch_all(&config.social_handles).await;
        for (platform, stat) in &candidate {
            println!("{}", format_stat(*platform, stat));
        }
        println!("dry-run: nothing written");
        return Ok(());
    }

    let refresher = SocialRefresher::new(client, store, config.social_handles.clone());
    let outcome = refresher.refresh().await;

    for (platform, stat) in &outcome.snapshot.stats {
        println!("{}", format_stat(*platform, stat));
    }
    if !outcome.preserved.is_empty() {
        let kept: Vec<&str> = outcome.preserved.iter().map(|p| p.as_str()).collect();
        println!("kept previous counts for: {}", kept.join(", "));
    }

    match outcome.write_error {
        Some(e) => anyhow::bail!("snapshot not written: {e}"),
        None => {
            println!("snapshot written at {}", outcome.snapshot.updated_at_iso());
            Ok(())
        }
    }
}

pub(crate) async fn run_github(config: &AppConfig, store: Arc<dyn KvStore>) -> anyhow::Result<()> {
    let Some(username) = &config.github_username else {
        anyhow::bail!("FOLIO_GITHUB_USERNAME is not set");
    };
    let client = GithubClient::new(HttpClient::from_app_config(config)?);
    let refresher = GithubRefresher::new(client, store, username.clone(), config.github_top_langs);

    let outcome = refresher.refresh().await?;
    if outcome.was_skipped() {
        println!("github refresh skipped: no repositories returned");
        return Ok(());
    }

    println!(
        "stats updated: {}, languages updated: {}",
        outcome.stats_updated, outcome.languages_updated
    );
    if let Some(stats) = outcome.record.as_ref().and_then(|r| r.stats.as_ref()) {
        println!(
            "stars {} / commits {} / prs {}",
            stats.stars, stats.commits, stats.prs
        );
    }
    Ok(())
}

pub(crate) async fn run_apps(config: &AppConfig, store: Arc<dyn KvStore>) -> anyhow::Result<()> {
    if config.app_ids.is_empty() {
        anyhow::bail!("no app ids configured; set FOLIO_APP_IDS");
    }
    let client = AppStoreClient::new(HttpClient::from_app_config(config)?);
    let refresher = AppsRefresher::new(client, store, config.app_ids.clone());

    let summary = refresher.refresh().await?;
    for ok in &summary.success {
        println!(
            "{}: {} ({} screenshots)",
            ok.app_id, ok.app_name, ok.screenshots
        );
    }
    for failed in &summary.errors {
        println!("{}: error: {}", failed.app_id, failed.error);
    }
    Ok(())
}

pub(crate) fn format_stat(platform: Platform, stat: &PlatformStat) -> String {
    match &stat.error {
        Some(e) => format!("{platform}: {} (error: {e})", stat.count),
        None => format!("{platform}: {}", stat.count),
    }
}
