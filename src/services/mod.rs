// src/services/mod.rs
pub mod auth_service;
pub mod calendar_service;
pub mod normalizer;
pub mod timetable_service;
pub mod token_service;
pub mod user_service;
