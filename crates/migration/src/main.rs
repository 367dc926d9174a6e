use clap::{Parser, Subcommand};
use migration::Migrator;
use sea_orm::Database;
use sea_orm_migration::prelude::*;

const DEFAULT_DATABASE_URL: &str = "sqlite:./expenses.db?mode=rwc";

/// Applies or rolls back the expense store schema.
#[derive(Debug, Parser)]
#[command(name = "migration", disable_version_flag = true)]
struct Args {
    /// Database to migrate.
    #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    database_url: String,
    #[command(subcommand)]
    action: Option<Action>,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum Action {
    /// Apply every pending migration (default).
    Up,
    /// Roll back every applied migration.
    Down,
    /// Drop all tables and apply every migration again.
    Fresh,
    /// List applied and pending migrations.
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();
    let db = Database::connect(&args.database_url).await?;

    match args.action.unwrap_or(Action::Up) {
        Action::Up => Migrator::up(&db, None).await?,
        Action::Down => Migrator::down(&db, None).await?,
        Action::Fresh => Migrator::fresh(&db).await?,
        Action::Status => Migrator::status(&db).await?,
    }

    Ok(())
}
