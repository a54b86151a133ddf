use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use services::services::auth::AuthError;

use crate::{AppState, error::ApiError, routes::auth::SESSION_COOKIE};

/// Gate for the admin surface: a valid, unexpired session cookie or 401.
pub async fn require_admin(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or(ApiError::Auth(AuthError::Unauthorized))?;

    state.auth.validate(&token).await?;
    Ok(next.run(request).await)
}
