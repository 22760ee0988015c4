// src/web/auth_handlers.rs
use crate::{
    error::AppResult,
    models::user::{LoginRequest, LoginResponse},
    services::auth_service,
    state::AppState,
    web::extract::ApiJson,
};
use axum::{extract::State, Json};

// POST /auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let response = auth_service::login(
        &state.db_pool,
        state.tokens.as_ref(),
        state.token_ttl_secs,
        &form.username,
    )
    .await?;
    Ok(Json(response))
}
