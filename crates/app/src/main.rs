use chrono_tz::Tz;
use migration::{Migrator, MigratorTrait};

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "expense_bot={level},telegram_bot={level},engine={level}",
            level = settings.level
        ))
        .init();

    let timezone: Tz = settings
        .timezone
        .parse()
        .map_err(|err| format!("invalid timezone {}: {err}", settings.timezone))?;

    let db = connect_database(&settings.database_url).await?;
    let engine = engine::Engine::builder()
        .database(db)
        .timezone(timezone)
        .build()?;
    tracing::info!("Expense store ready, reference timezone {timezone}");

    let bot = telegram_bot::Bot::builder()
        .token(&settings.telegram_bot_token)
        .allowed_users(&settings.allowed_users)
        .engine(engine)
        .build()?;
    bot.run().await?;

    Ok(())
}

async fn connect_database(
    url: &str,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
