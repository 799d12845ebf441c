use std::sync::Arc;

use axum::Router;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use event_catalogue::config::Config;
use event_catalogue::gateway::RestGateway;
use event_catalogue::routes::{create_routes, AppState};

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    let gateway = RestGateway::new(config.data_service_url.clone());
    tracing::info!(data_service = %gateway.base_url(), "Using data service");

    let app: Router = create_routes(AppState::new(Arc::new(gateway)));

    tracing::info!("Event catalogue running at http://{}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
