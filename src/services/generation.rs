//! Client for the external text-generation service (OpenAI-compatible chat
//! completions). The contract is deliberately thin: structured context in,
//! any string out. Callers substitute a literal fallback on any failure
//! rather than propagating an error to the user.

use crate::config::Config;
use crate::engine::context::CoachContext;
use crate::error::{AppError, AppResult};

pub const DAILY_FALLBACK: &str =
    "Coach is unavailable right now. Your record is saved; check back for comments later.";

pub const REPORT_FALLBACK: &str =
    "The report service is unavailable right now. Your records are safe; try again in a bit.";

pub async fn generate(config: &Config, ctx: &CoachContext) -> AppResult<String> {
    if config.openai_api_key.trim().is_empty() {
        return Err(AppError::Upstream("OPENAI_API_KEY is not configured".into()));
    }

    // 30-second timeout so a hung upstream can't stall the request forever
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    let response = client
        .post(format!("{}/chat/completions", config.openai_base_url))
        .bearer_auth(&config.openai_api_key)
        .json(&serde_json::json!({
            "model": config.openai_model,
            "temperature": 0.7,
            "messages": [
                { "role": "system", "content": ctx.system_prompt() },
                { "role": "user", "content": ctx.user_prompt() },
            ],
        }))
        .send()
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::Upstream(format!(
            "Generation API error {status}: {body}"
        )));
    }

    let body: serde_json::Value = response
        .json()
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;
    let text = body["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| AppError::Upstream("Generation API returned no text content".into()))?;

    Ok(text.trim().to_string())
}
