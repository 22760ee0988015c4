// src/web/mod.rs
pub mod auth_handlers;
pub mod calendar_handlers;
pub mod extract;
pub mod mw_auth;
pub mod routes;
pub mod timetable_handlers;
pub mod user_handlers;
