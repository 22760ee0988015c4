// src/models/mod.rs
pub mod calendar;
pub mod timetable;
pub mod user;
