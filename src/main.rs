use meetup_server::core::{AppState, Config, database};
use meetup_server::create_router;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("meetup_server=debug,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting meetup server...");

    let config = Config::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;
    config.log_summary();

    let pool = database::connect(
        &config.database_url,
        config.max_connections,
        Some(Duration::from_secs(config.connection_lifetime_secs)),
    )
    .await?;

    let state = Arc::new(AppState::new(pool, config.jwt_secret.clone()));

    let app = create_router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let address = config.server_address();
    let listener = TcpListener::bind(&address).await?;
    info!("Server listening on http://{}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
