use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;
    let mut tasks = tokio::task::JoinSet::new();

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "fleetledger={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let db = parse_database(&settings.server.database).await?;

    let sweep_minutes = settings.server.sweep_minutes.unwrap_or(60);
    {
        let db = db.clone();
        tasks.spawn(async move {
            let engine = engine::Engine::builder().database(db).build();
            let mut ticker = tokio::time::interval(Duration::from_secs(sweep_minutes * 60));
            loop {
                ticker.tick().await;
                match engine.run_maintenance_sweep().await {
                    Ok(summary) => tracing::info!(
                        "maintenance sweep: {} checked, {} due, {} overdue, {} alerts opened",
                        summary.checked,
                        summary.due,
                        summary.overdue,
                        summary.alerts_opened
                    ),
                    Err(err) => tracing::error!("maintenance sweep failed: {err}"),
                }
            }
        });
    }

    {
        let bind = settings
            .server
            .bind
            .unwrap_or_else(|| "127.0.0.1".to_string());
        let addr = format!("{}:{}", bind, settings.server.port);
        tasks.spawn(async move {
            let engine = engine::Engine::builder().database(db.clone()).build();
            let listener = match tokio::net::TcpListener::bind(addr).await {
                Ok(listener) => listener,
                Err(err) => {
                    tracing::error!("failed to bind server listener: {err}");
                    return;
                }
            };
            if let Err(err) = server::run_with_listener(engine, db, listener).await {
                tracing::error!("server failed: {err}");
            }
        });
    }

    while tasks.join_next().await.is_some() {
        tasks.shutdown().await;
    }

    Ok(())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
