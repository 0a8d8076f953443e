pub mod health_log;
pub mod user_settings;
