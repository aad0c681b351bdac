use fleetdesk::{AppState, Migrator, Settings, app};
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("fleetdesk=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env()?;
    let db = Database::connect(&settings.database_url).await?;
    Migrator::up(&db, None).await?;
    tracing::info!("Database schema is up to date");

    let listener = tokio::net::TcpListener::bind(settings.bind_address).await?;
    tracing::info!(
        address = %settings.bind_address,
        "API listening, documentation at /docs"
    );
    axum::serve(listener, app(AppState::new(db, settings))).await?;
    Ok(())
}
