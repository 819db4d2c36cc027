use chrono::TimeDelta;
use migration::{Migrator, MigratorTrait};
use server::TokenKeys;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "budget_tracker={level},server={level},engine={level},tower_http={level}",
            level = settings.app.level
        ))
        .init();

    let server_cfg = settings.server;
    if server_cfg.jwt_secret == settings::DEFAULT_JWT_SECRET {
        tracing::warn!("JWT_SECRET_KEY not set, signing tokens with the default secret");
    }

    let db = connect_database(&server_cfg.database).await?;
    let engine = engine::Engine::builder()
        .database(db)
        .password_cost(server_cfg.bcrypt_cost)
        .build()
        .await?;
    let ttl = TimeDelta::try_minutes(server_cfg.token_ttl_minutes)
        .filter(|ttl| *ttl > TimeDelta::zero())
        .ok_or("server.token_ttl_minutes must be a positive number of minutes")?;
    let tokens = TokenKeys::new(server_cfg.jwt_secret.as_bytes(), ttl);

    let addr = format!("{}:{}", server_cfg.bind, server_cfg.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|err| {
        tracing::error!("failed to bind server listener on {addr}: {err}");
        err
    })?;

    server::run_with_listener(engine, tokens, listener).await?;
    Ok(())
}

async fn connect_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let database = sea_orm::Database::connect(config.url()).await?;
    Migrator::up(&database, None).await?;
    tracing::info!("database ready, migrations applied");
    Ok(database)
}
