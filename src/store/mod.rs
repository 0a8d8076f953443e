pub mod health_logs;
pub mod user_settings;
