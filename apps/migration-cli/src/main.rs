use clap::Parser;
use migration::sea_orm::{ConnectOptions, Database};
use migration::{migrate, MigrationCommand};

#[derive(Parser)]
#[command(name = "migration-cli")]
#[command(about = "Werewolf room database migration tool")]
struct Args {
    /// Migration command to run: up | down | fresh | reset | refresh | status
    command: MigrationCommand,

    /// Database URL (postgres://... or sqlite://path?mode=rwc)
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .with_env_filter("migration=info,sqlx=warn")
        .init();

    let args = Args::parse();

    if args.database_url.starts_with("sqlite::memory:") {
        eprintln!("❌ SQLite in-memory databases are not supported for CLI operations.");
        eprintln!("Each CLI run would migrate a fresh database that is discarded on exit.");
        std::process::exit(1);
    }

    let mut options = ConnectOptions::new(args.database_url);
    options.sqlx_logging(false);

    let db = match Database::connect(options).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("❌ Failed to connect to database: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = migrate(&db, args.command).await {
        eprintln!("Migration failed: {e}");
        std::process::exit(1);
    }
}
