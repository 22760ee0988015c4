// src/web/routes.rs
use crate::{
    state::AppState,
    web::{auth_handlers, calendar_handlers, mw_auth, timetable_handlers, user_handlers},
};
use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

pub fn create_router(app_state: AppState) -> Router {
    // --- Rotas Públicas ---
    let public_routes = Router::new()
        .route("/health", get(|| async { Json(json!({ "status": "ok" })) }))
        .route("/auth/login", post(auth_handlers::handle_login));

    // --- Rotas Autenticadas (Bearer token) ---
    let authenticated_routes = Router::new()
        .route(
            "/users",
            get(user_handlers::list_users).post(user_handlers::create_user),
        )
        .route(
            "/users/{id}",
            get(user_handlers::get_user)
                .patch(user_handlers::update_user)
                .delete(user_handlers::delete_user),
        )
        .route("/calendar", get(calendar_handlers::list_calendar))
        .route("/calendar/import", post(calendar_handlers::import_calendar))
        .route("/timetable/import", post(timetable_handlers::import_timetable))
        // Rota estática tem prioridade sobre /{code}
        .route("/timetable/versions", get(timetable_handlers::list_versions))
        .route("/timetable/{code}", get(timetable_handlers::get_timetable))
        .route("/timetable/{code}/filters", get(timetable_handlers::get_filters))
        // Aplica o middleware require_auth a TODAS as rotas definidas acima
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            mw_auth::require_auth,
        ));

    // --- Router Final ---
    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .with_state(app_state)
}
