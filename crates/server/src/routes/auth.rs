use axum::{
    Router,
    extract::State,
    response::Json as ResponseJson,
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use services::services::auth::AuthError;
use ts_rs::TS;
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError};

pub const SESSION_COOKIE: &str = "portfolio_session";

#[derive(Debug, Deserialize, TS)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Debug, Serialize, TS)]
pub struct MeResponse {
    pub authenticated: bool,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    axum::Json(payload): axum::Json<LoginRequest>,
) -> Result<(CookieJar, ResponseJson<ApiResponse<()>>), ApiError> {
    let token = state.auth.login(&payload.password).await?;

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    Ok((jar.add(cookie), ResponseJson(ApiResponse::success(()))))
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, ResponseJson<ApiResponse<()>>), ApiError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.auth.logout(cookie.value()).await?;
    }
    let removal = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    Ok((jar.remove(removal), ResponseJson(ApiResponse::success(()))))
}

pub async fn me(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<ResponseJson<ApiResponse<MeResponse>>, ApiError> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or(ApiError::Auth(AuthError::Unauthorized))?;
    state.auth.validate(&token).await?;
    Ok(ResponseJson(ApiResponse::success(MeResponse {
        authenticated: true,
    })))
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/auth",
        Router::new()
            .route("/login", post(login))
            .route("/logout", post(logout))
            .route("/me", get(me)),
    )
}
