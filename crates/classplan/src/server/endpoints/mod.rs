pub mod cache;
pub mod schedules;
pub mod status;
