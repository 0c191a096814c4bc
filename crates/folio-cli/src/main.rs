mod refresh;
mod show;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use folio_core::AppConfig;
use folio_db::{KvStore, MemoryKvStore};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "folio-cli")]
#[command(about = "Run folio refresh cycles and inspect stored data")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Run a refresh cycle once, in the foreground
    Refresh {
        #[command(subcommand)]
        command: RefreshCommands,
    },
    /// Print stored data
    Show {
        #[command(subcommand)]
        command: ShowCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    Ping,
    Migrate,
}

#[derive(Debug, Subcommand)]
enum RefreshCommands {
    Social {
        /// Scrape and print the counts without merging or writing
        #[arg(long)]
        dry_run: bool,
    },
    Github,
    Apps,
}

#[derive(Debug, Subcommand)]
enum ShowCommands {
    Social,
    Github,
    Apps {
        /// Print the cached lookup for this app instead of the run summary
        #[arg(long)]
        id: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = folio_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("folio-cli: no command given; try --help");
        return Ok(());
    };

    match command {
        Commands::Db { command } => run_db(&config, command).await,
        Commands::Refresh { command } => {
            let store = open_store(&config).await?;
            match command {
                RefreshCommands::Social { dry_run } => {
                    refresh::run_social(&config, store, dry_run).await
                }
                RefreshCommands::Github => refresh::run_github(&config, store).await,
                RefreshCommands::Apps => refresh::run_apps(&config, store).await,
            }
        }
        Commands::Show { command } => {
            let store = open_store(&config).await?;
            match command {
                ShowCommands::Social => show::social(store.as_ref()).await,
                ShowCommands::Github => show::github(store.as_ref()).await,
                ShowCommands::Apps { id } => show::apps(store.as_ref(), id.as_deref()).await,
            }
        }
    }
}

async fn run_db(config: &AppConfig, command: DbCommands) -> anyhow::Result<()> {
    let url = config
        .database_url
        .as_deref()
        .ok_or(folio_db::DbError::MissingDatabaseUrl)?;
    let pool = folio_db::connect_pool(url, folio_db::PoolConfig::from_app_config(config)).await?;

    match command {
        DbCommands::Ping => {
            folio_db::ping(&pool).await?;
            println!("database reachable");
        }
        DbCommands::Migrate => {
            let applied = folio_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
    }
    Ok(())
}

async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn KvStore>> {
    match &config.database_url {
        Some(url) => {
            let pool_config = folio_db::PoolConfig::from_app_config(config);
            Ok(Arc::new(folio_db::connect_kv_store(url, pool_config).await?))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; results are kept in memory for this run only");
            Ok(Arc::new(MemoryKvStore::new()))
        }
    }
}

#[cfg(test)]
mod tests;
