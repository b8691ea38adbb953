use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

/// Session key holding the backend bearer token.
pub const SESSION_TOKEN_KEY: &str = "sigecon_token";
/// Session key holding the logged-in user profile.
pub const SESSION_USER_KEY: &str = "sigecon_user";

pub async fn auth_middleware(
    session: Session,
    request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let token: Option<String> = session.get(SESSION_TOKEN_KEY).await.unwrap_or(None);

    if token.is_none() {
        return Ok(Redirect::to("/login").into_response());
    }

    Ok(next.run(request).await)
}
