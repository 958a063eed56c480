pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod ordering;
pub mod validation;

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};
use db::DbPool;
use tower_http::services::ServeDir;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub assets_dir: Arc<PathBuf>,
}

pub fn create_app(state: AppState) -> Router {
    let assets = ServeDir::new(&*state.assets_dir);

    tracing::info!(assets_dir = %state.assets_dir.display(), "serving static assets");

    Router::new()
        .route("/api", get(handlers::api::greeting))
        .route("/api/", get(handlers::api::greeting))
        .route(
            "/api/todos",
            get(handlers::api::list_all_todos).post(handlers::api::create_new_todo),
        )
        .route(
            "/api/todos/{id}",
            patch(handlers::api::update_existing_todo).delete(handlers::api::delete_existing_todo),
        )
        .fallback_service(assets)
        .layer(
            tower::ServiceBuilder::new()
                .layer(tower_http::trace::TraceLayer::new_for_http())
                .layer(tower_http::compression::CompressionLayer::new()),
        )
        .with_state(state)
}
