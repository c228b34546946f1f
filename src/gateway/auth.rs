use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use super::AppState;
use crate::error::Error;

/// Authenticates the request and attaches its [`AuthContext`](crate::AuthContext).
///
/// Handlers behind this layer take `Extension<AuthContext>`; the context is
/// built fresh for each request and never shared between them.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Error> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let ctx = state.sessions.authenticate(header.as_deref()).await?;
    request.extensions_mut().insert(ctx);

    Ok(next.run(request).await)
}
