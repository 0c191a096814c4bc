//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and registers the daily
//! refresh jobs.

use std::sync::Arc;

use folio_core::AppConfig;
use folio_refresh::{AppsRefresher, GithubRefresher, SocialRefresher};
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::api::AppState;

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process. Dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// a cron expression is invalid, or the scheduler fails to start.
pub async fn build_scheduler(
    state: &AppState,
    config: &AppConfig,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_social_job(&scheduler, &config.social_cron, Arc::clone(&state.social)).await?;
    match &state.github {
        Some(github) => {
            register_github_job(&scheduler, &config.github_cron, Arc::clone(github)).await?;
        }
        None => tracing::info!("scheduler: FOLIO_GITHUB_USERNAME not set; github job disabled"),
    }
    register_apps_job(&scheduler, &config.apps_cron, Arc::clone(&state.apps)).await?;

    scheduler.start().await?;
    Ok(scheduler)
}

async fn register_social_job(
    scheduler: &JobScheduler,
    schedule: &str,
    social: Arc<SocialRefresher>,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async(schedule, move |_uuid, _lock| {
        let social = Arc::clone(&social);

        Box::pin(async move {
            tracing::info!("scheduler: starting social stats refresh");
            let outcome = social.refresh().await;
            tracing::info!(
                written = outcome.written,
                preserved = outcome.preserved.len(),
                "scheduler: social stats refresh complete"
            );
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(schedule, "scheduler: social stats job registered");
    Ok(())
}

async fn register_github_job(
    scheduler: &JobScheduler,
    schedule: &str,
    github: Arc<GithubRefresher>,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async(schedule, move |_uuid, _lock| {
        let github = Arc::clone(&github);

        Box::pin(async move {
            tracing::info!("scheduler: starting github stats refresh");
            match github.refresh().await {
                Ok(outcome) if outcome.was_skipped() => {
                    tracing::warn!("scheduler: github stats refresh skipped");
                }
                Ok(outcome) => tracing::info!(
                    stats_updated = outcome.stats_updated,
                    languages_updated = outcome.languages_updated,
                    "scheduler: github stats refresh complete"
                ),
                Err(e) => tracing::error!(error = %e, "scheduler: github stats refresh failed"),
            }
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(schedule, "scheduler: github stats job registered");
    Ok(())
}

async fn register_apps_job(
    scheduler: &JobScheduler,
    schedule: &str,
    apps: Arc<AppsRefresher>,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async(schedule, move |_uuid, _lock| {
        let apps = Arc::clone(&apps);

        Box::pin(async move {
            if apps.app_ids().is_empty() {
                tracing::info!("scheduler: no app ids configured; skipping apps refresh");
                return;
            }
            tracing::info!(count = apps.app_ids().len(), "scheduler: starting apps refresh");
            if let Err(e) = apps.refresh().await {
                tracing::error!(error = %e, "scheduler: apps refresh failed");
            }
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(schedule, "scheduler: apps job registered");
    Ok(())
}
