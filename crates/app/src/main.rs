use std::sync::Arc;

use engine::OpendalUploadGateway;
use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "walletbook={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let db = parse_database(&settings.server.database).await?;

    let mut builder = engine::Engine::builder().database(db);
    if let Some(uploads) = &settings.uploads {
        tracing::info!(root = %uploads.root, "image uploads enabled");
        let gateway = OpendalUploadGateway::filesystem(&uploads.root, &uploads.public_url)?;
        builder = builder.uploads(Arc::new(gateway));
    } else {
        tracing::info!("no upload settings, only image URLs are accepted");
    }
    let engine = builder.build()?;

    let bind = settings
        .server
        .bind
        .as_deref()
        .unwrap_or("127.0.0.1");
    let addr = format!("{}:{}", bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    server::run_with_listener(engine, listener).await?;

    Ok(())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    tracing::info!("database ready");
    Ok(database)
}
