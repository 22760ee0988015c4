// src/web/user_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, UpdateUser, User},
    services::user_service,
    state::AppState,
    web::{
        extract::{ApiJson, ApiPath},
        mw_auth::CurrentUser,
    },
};
use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};

// GET /users
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    let users = user_service::find_all_users(&state.db_pool).await?;
    Ok(Json(users))
}

// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ApiJson(payload): ApiJson<CreateUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    tracing::info!("POST /users por '{}': criar {}", current.username(), payload.username);
    let user = user_service::create_user(&state.db_pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<i64>,
) -> AppResult<Json<User>> {
    let user = user_service::find_user_by_id(&state.db_pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".into()))?;
    Ok(Json(user))
}

// PATCH /users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<i64>,
    ApiJson(patch): ApiJson<UpdateUser>,
) -> AppResult<Json<User>> {
    let user = user_service::update_user(&state.db_pool, user_id, &patch).await?;
    Ok(Json(user))
}

// DELETE /users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ApiPath(user_id): ApiPath<i64>,
) -> AppResult<StatusCode> {
    tracing::info!("DELETE /users/{} por '{}'", user_id, current.username());
    user_service::delete_user(&state.db_pool, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
