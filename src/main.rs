use ecoswap::{
    app::build_router,
    config::{validate_production_config, ServerConfig, SessionConfig, SESSION_TABLE},
    db, AppState,
};

use tower_sessions_sqlx_store::SqliteStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ecoswap=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    validate_production_config();

    // Database connection
    let pool = db::create_pool(&config.database_url).await?;
    db::migrate(&pool).await?;

    // Session store
    let session_store = SqliteStore::new(pool.clone())
        .with_table_name(SESSION_TABLE)
        .map_err(anyhow::Error::msg)?;
    session_store.migrate().await?;
    let session_layer = SessionConfig::from_env().create_layer(session_store);

    let app = build_router(AppState::new(pool), session_layer, &config.static_dir);

    let addr = config.bind_addr()?;
    tracing::info!("Server running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
