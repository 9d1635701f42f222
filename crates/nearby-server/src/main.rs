use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use nearby_api::notify::Notifier;
use nearby_api::state::{AppState, AppStateInner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nearby=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let db_path = std::env::var("NEARBY_DB_PATH").unwrap_or_else(|_| "nearby.db".into());
    let host = std::env::var("NEARBY_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("NEARBY_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;
    let admin_code = std::env::var("NEARBY_ADMIN_CODE").unwrap_or_else(|_| {
        warn!("NEARBY_ADMIN_CODE not set, using the default code");
        "HELP2025".into()
    });
    let payment_card =
        std::env::var("NEARBY_PAYMENT_CARD").unwrap_or_else(|_| "0000000000000000".into());

    // Init database
    let db = nearby_db::Database::open(&PathBuf::from(&db_path))?;

    // Shared state
    let state: AppState = Arc::new(AppStateInner {
        db,
        admin_code,
        payment_card,
        notifier: Notifier::from_env(),
    });

    let app = nearby_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Nearby server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
