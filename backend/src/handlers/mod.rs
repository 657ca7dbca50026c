pub mod auth;
pub mod dashboard;
pub mod health;
pub mod insights;
pub mod mood_logs;
pub mod plants;
pub mod reminders;
