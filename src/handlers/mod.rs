pub mod advice;
pub mod health;
pub mod health_logs;
pub mod report;
pub mod settings;
