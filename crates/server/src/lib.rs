pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;

use std::{path::Path, sync::Arc};

use axum::{Router, response::Json as ResponseJson, routing::get};
use db::DBService;
use services::services::{
    auth::AuthService, storage::AssetStore, translation::TranslationClient,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use utils::response::ApiResponse;

#[derive(Clone)]
pub struct AppState {
    pub db: DBService,
    pub assets: Arc<dyn AssetStore>,
    pub auth: AuthService,
    pub translator: Option<Arc<TranslationClient>>,
}

async fn health() -> ResponseJson<ApiResponse<&'static str>> {
    ResponseJson(ApiResponse::success("ok"))
}

/// Assembles the full application: public API, cookie-gated admin API, and static
/// serving of the uploaded asset root.
pub fn app(state: AppState, asset_root: &Path) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .merge(routes::achievements::public_router())
        .merge(routes::categories::public_router())
        .merge(routes::auth::router());

    let admin = Router::new()
        .merge(routes::achievements::admin_router())
        .merge(routes::categories::admin_router())
        .merge(routes::assets::router())
        .merge(routes::translate::router())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_admin,
        ));

    Router::new()
        .nest("/api", public.nest("/admin", admin))
        .nest_service("/assets", ServeDir::new(asset_root))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
