mod api;
mod models;
mod settings;
mod store;
mod validate;

use api::{AppState, SharedState};
use axum::{
    routing::{get, patch},
    Router,
};
use settings::Settings;
use std::net::SocketAddr;
use std::sync::Arc;
use store::Store;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // ── Boot the store ─────────────────────────────────────────
    let settings = Settings::load().expect("Failed to load settings");

    let store = Store::open(&settings.database_path)
        .expect("Failed to open database");

    let state: SharedState = Arc::new(AppState { store });

    // ── Router ─────────────────────────────────────────────────
    let app = Router::new()
        .route("/api/tasks", get(api::list_tasks).post(api::create_task))
        .route(
            "/api/tasks/:id",
            get(api::get_task).patch(api::update_task).delete(api::delete_task),
        )
        .route("/api/labels", get(api::list_labels).post(api::create_label))
        .route("/api/labels/:id", patch(api::update_label).delete(api::delete_label))
        // Static files
        .fallback_service(
            ServeDir::new(&settings.static_dir).append_index_html_on_directories(true),
        )
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // ── Start ──────────────────────────────────────────────────
    let ip = settings.bind_address.parse().expect("Invalid bind address");
    let addr = SocketAddr::new(ip, settings.port);
    tracing::info!("Server running on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
