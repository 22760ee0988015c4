// src/web/calendar_handlers.rs
use crate::{
    error::AppResult,
    models::calendar::{CalendarDay, CalendarDayIn, CalendarRange},
    services::calendar_service,
    web::{
        extract::{ApiJson, ApiQuery},
        mw_auth::CurrentUser,
    },
};
use axum::{
    extract::{Extension, State},
    Json,
};
use sqlx::SqlitePool;

// POST /calendar/import
pub async fn import_calendar(
    State(db_pool): State<SqlitePool>,
    Extension(current): Extension<CurrentUser>,
    ApiJson(days): ApiJson<Vec<CalendarDayIn>>,
) -> AppResult<Json<Vec<CalendarDay>>> {
    tracing::info!("POST /calendar/import por '{}' ({} dias)", current.username(), days.len());
    let stored = calendar_service::import_days(&db_pool, &days).await?;
    Ok(Json(stored))
}

// GET /calendar?from=2026-02-01&to=2026-02-28
pub async fn list_calendar(
    State(db_pool): State<SqlitePool>,
    ApiQuery(range): ApiQuery<CalendarRange>,
) -> AppResult<Json<Vec<CalendarDay>>> {
    let days = calendar_service::list_days(&db_pool, &range).await?;
    Ok(Json(days))
}
