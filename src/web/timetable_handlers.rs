// src/web/timetable_handlers.rs
use crate::{
    error::AppResult,
    models::timetable::{
        ImportBounds, ImportSummary, TimetableFilter, TimetableFilters, TimetableRow,
        TimetableVersion, TimetableView,
    },
    services::timetable_service,
    state::AppState,
    web::{
        extract::{ApiJson, ApiPath, ApiQuery},
        mw_auth::CurrentUser,
    },
};
use axum::{
    extract::{Extension, State},
    Json,
};

// POST /timetable/import?start_date=2026-02-02&end_date=2026-12-18&source=r2
// O script manda as linhas no corpo; o código da versão vem na primeira linha.
pub async fn import_timetable(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ApiQuery(bounds): ApiQuery<ImportBounds>,
    ApiJson(rows): ApiJson<Vec<TimetableRow>>,
) -> AppResult<Json<ImportSummary>> {
    tracing::info!("POST /timetable/import por '{}' ({} linhas)", current.username(), rows.len());
    let summary = timetable_service::import_timetable(&state.db_pool, &rows, &bounds).await?;
    Ok(Json(summary))
}

// GET /timetable/versions
pub async fn list_versions(State(state): State<AppState>) -> AppResult<Json<Vec<TimetableVersion>>> {
    let versions = timetable_service::list_versions(&state.db_pool).await?;
    Ok(Json(versions))
}

// GET /timetable/{code}/filters
pub async fn get_filters(
    State(state): State<AppState>,
    ApiPath(code): ApiPath<String>,
) -> AppResult<Json<TimetableFilters>> {
    let filters = timetable_service::get_filters(&state.db_pool, &code).await?;
    Ok(Json(filters))
}

// GET /timetable/{code}?group=1.18.1I&teacher=joão&weekday=0
pub async fn get_timetable(
    State(state): State<AppState>,
    ApiPath(code): ApiPath<String>,
    ApiQuery(filter): ApiQuery<TimetableFilter>,
) -> AppResult<Json<TimetableView>> {
    let view = timetable_service::get_timetable(&state.db_pool, &code, &filter).await?;
    Ok(Json(view))
}
