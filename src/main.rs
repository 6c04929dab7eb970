use std::sync::Arc;
use storefront_rust::config::Config;
use storefront_rust::logging::init_tracing;
use storefront_rust::router::create_app_router;
use storefront_rust::state::AppState;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing("info,storefront_rust=debug")?;

    // Load configuration from the environment (and .env)
    let config = Config::from_env();

    // Initialize application state
    let state = Arc::new(AppState::from_config(&config));

    // Build application router with all routes and middleware
    let app = create_app_router(state);

    // Start the server
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
