// src/web/mw_auth.rs
use crate::{error::AppError, services::token_service::Claims, state::AppState};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

// Claims do token validado, postas nas extensões para os handlers
#[derive(Clone, Debug)]
pub struct CurrentUser(pub Claims);

impl CurrentUser {
    pub fn username(&self) -> &str {
        self.0.subject().unwrap_or("?")
    }
}

/// Middleware que exige `Authorization: Bearer <token>` válido.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
        .map(str::to_string)
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".into()))?;

    // Expirado ou adulterado dá no mesmo para quem chama
    let claims = state
        .tokens
        .verify(&token)
        .ok_or_else(|| AppError::Unauthorized("invalid or expired token".into()))?;

    let current = CurrentUser(claims);
    tracing::debug!(
        "Autenticação MW: '{}' autenticado (exp {:?}). Prosseguindo...",
        current.username(),
        current.0.expires_at()
    );
    request.extensions_mut().insert(current);

    Ok(next.run(request).await)
}

// "Bearer abc", "bearer abc" -> "abc"
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
