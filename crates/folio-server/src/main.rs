mod api;
mod middleware;
mod scheduler;

use std::sync::Arc;

use folio_core::AppConfig;
use folio_db::{KvStore, MemoryKvStore};
use folio_refresh::{AppsRefresher, GithubRefresher, SocialRefresher};
use folio_scraper::{AppStoreClient, GithubClient, HttpClient, SocialClient};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, default_rate_limit_state, AppState},
    middleware::AuthState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = folio_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let store = open_store(&config).await?;
    let state = build_state(&config, store)?;

    let _scheduler = scheduler::build_scheduler(&state, &config).await?;

    let auth = AuthState::from_config(&config)?;
    let app = build_app(state, auth, default_rate_limit_state());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "folio-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Postgres when `DATABASE_URL` is set, otherwise a process-local store.
async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn KvStore>> {
    match &config.database_url {
        Some(url) => {
            let pool_config = folio_db::PoolConfig::from_app_config(config);
            let store = folio_db::connect_kv_store(url, pool_config).await?;
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory store, data is lost on restart");
            Ok(Arc::new(MemoryKvStore::new()))
        }
    }
}

fn build_state(config: &AppConfig, store: Arc<dyn KvStore>) -> anyhow::Result<AppState> {
    let http = HttpClient::from_app_config(config)?;

    let social = SocialRefresher::new(
        SocialClient::new(http.clone()),
        Arc::clone(&store),
        config.social_handles.clone(),
    );
    if config.social_handles.is_empty() {
        tracing::warn!("no social handles configured; social refresh will scrape nothing");
    }

    let github = config.github_username.as_ref().map(|username| {
        Arc::new(GithubRefresher::new(
            GithubClient::new(http.clone()),
            Arc::clone(&store),
            username.clone(),
            config.github_top_langs,
        ))
    });

    let apps = AppsRefresher::new(
        AppStoreClient::new(http),
        Arc::clone(&store),
        config.app_ids.clone(),
    );

    Ok(AppState {
        store,
        social: Arc::new(social),
        github,
        apps: Arc::new(apps),
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
