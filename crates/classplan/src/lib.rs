//! Builds ranked, conflict-free weekly class schedules.
//!
//! The [`engine`] filters a course catalog against a student's constraints,
//! attaches instructor ratings by fuzzy name matching, enumerates every
//! conflict-free choice of one section per course and ranks them by total
//! rating. [`store`] loads the catalog and rating snapshots the engine runs
//! on, and [`server`] exposes the whole pipeline over HTTP.

pub mod config;
pub mod engine;
pub mod server;
pub mod store;
pub mod types;

pub use engine::{build_schedules, ScheduleEngine, ScheduleError};
