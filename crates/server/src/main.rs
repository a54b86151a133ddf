use std::sync::Arc;

use db::DBService;
use server::{AppState, config::Config};
use services::services::{
    auth::AuthService,
    storage::LocalAssetStore,
    translation::TranslationClient,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let db = DBService::new(&config.database_url).await?;

    let assets = LocalAssetStore::new(&config.asset_root);
    assets.ensure_root().await?;

    let translator = match &config.anthropic_api_key {
        Some(key) => Some(Arc::new(TranslationClient::new(key.clone(), None)?)),
        None => {
            warn!("ANTHROPIC_API_KEY not set, translation endpoint disabled");
            None
        }
    };

    let auth = AuthService::new(
        db.clone(),
        config.admin_password.clone(),
        config.session_ttl_hours,
    );

    let state = AppState {
        db,
        assets: Arc::new(assets),
        auth,
        translator,
    };
    let app = server::app(state, &config.asset_root);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
