use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hultagram_server::{config::Settings, db::Database, router, seed, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hultagram_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::new().context("Failed to load settings")?;

    let db = Database::new(&settings.database.path).context("Failed to create database")?;
    db.initialize().context("Failed to initialize database schema")?;
    tracing::info!("Database initialized at {}", settings.database.path);

    if settings.database.seed_demo_data {
        seed::seed_demo_data(&db, settings.security.bcrypt_cost)
            .context("Failed to seed demo data")?;
    }

    let state = AppState::from_settings(db, &settings);

    match state.session_manager.cleanup_expired_sessions() {
        Ok(count) if count > 0 => {
            tracing::info!("Cleaned up {} expired sessions on startup", count)
        }
        Ok(_) => tracing::debug!("No expired sessions to clean up"),
        Err(e) => tracing::error!("Failed to cleanup expired sessions on startup: {}", e),
    }

    // Hourly session cleanup
    let cleanup_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(3600));
        loop {
            interval.tick().await;
            match cleanup_state.session_manager.cleanup_expired_sessions() {
                Ok(count) if count > 0 => {
                    tracing::info!("Periodic cleanup: removed {} expired sessions", count)
                }
                Ok(_) => {}
                Err(e) => tracing::error!("Periodic session cleanup failed: {}", e),
            }
        }
    });

    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Failed to parse server address")?;
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
