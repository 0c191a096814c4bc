use folio_core::{Platform, PlatformStat};

use super::*;

#[test]
fn parses_db_ping_command() {
    let cli = Cli::try_parse_from(["folio-cli", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli =
        Cli::try_parse_from(["folio-cli", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["folio-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn refresh_social_defaults_to_writing() {
    let cli = Cli::try_parse_from(["folio-cli", "refresh", "social"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Refresh {
            command: RefreshCommands::Social { dry_run: false }
        })
    ));
}

#[test]
fn refresh_social_accepts_dry_run() {
    let cli = Cli::try_parse_from(["folio-cli", "refresh", "social", "--dry-run"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Refresh {
            command: RefreshCommands::Social { dry_run: true }
        })
    ));
}

#[test]
fn parses_refresh_github_and_apps() {
    let cli = Cli::try_parse_from(["folio-cli", "refresh", "github"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Refresh {
            command: RefreshCommands::Github
        })
    ));

    let cli = Cli::try_parse_from(["folio-cli", "refresh", "apps"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Refresh {
            command: RefreshCommands::Apps
        })
    ));
}

#[test]
fn show_apps_takes_optional_id() {
    let cli = Cli::try_parse_from(["folio-cli", "show", "apps", "--id", "441599004"]).unwrap();
    match cli.command {
        Some(Commands::Show {
            command: ShowCommands::Apps { id },
        }) => assert_eq!(id.as_deref(), Some("441599004")),
        other => panic!("unexpected command: {other:?}"),
    }

    let cli = Cli::try_parse_from(["folio-cli", "show", "apps"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Show {
            command: ShowCommands::Apps { id: None }
        })
    ));
}

#[test]
fn unknown_refresh_target_is_rejected() {
    assert!(Cli::try_parse_from(["folio-cli", "refresh", "myspace"]).is_err());
}

#[test]
fn format_stat_includes_error_when_present() {
    assert_eq!(
        refresh::format_stat(Platform::Youtube, &PlatformStat::ok(5000)),
        "youtube: 5000"
    );
    assert_eq!(
        refresh::format_stat(Platform::Tiktok, &PlatformStat::failed("HTTP 403")),
        "tiktok: 0 (error: HTTP 403)"
    );
}

#[tokio::test]
async fn show_apps_rejects_non_numeric_id() {
    let store = MemoryKvStore::new();
    assert!(show::apps(&store, Some("abc")).await.is_err());
    assert!(show::apps(&store, Some("123")).await.is_ok());
}
