//! Bearer-token verification. Tokens are issued by the identity provider;
//! this service only validates them. `create_access_token` exists for local
//! tooling and tests.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

pub fn create_access_token(user_id: Uuid, email: &str, config: &Config) -> AppResult<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        exp: (now + Duration::seconds(config.jwt_access_ttl_secs)).timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create access token: {}", e)))
}

pub fn verify_token(token: &str, config: &Config) -> AppResult<TokenData<Claims>> {
    let mut validation = Validation::default();
    validation.validate_exp = true;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|_| AppError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(secret: &str, ttl: i64) -> Config {
        Config {
            database_url: String::new(),
            host: "127.0.0.1".into(),
            port: 0,
            frontend_url: String::new(),
            jwt_secret: secret.into(),
            jwt_access_ttl_secs: ttl,
            openai_api_key: String::new(),
            openai_model: String::new(),
            openai_base_url: String::new(),
        }
    }

    #[test]
    fn test_token_roundtrip() {
        let config = test_config("test-secret", 900);
        let user_id = Uuid::new_v4();
        let token = create_access_token(user_id, "a@b.test", &config).unwrap();
        let data = verify_token(&token, &config).unwrap();
        assert_eq!(data.claims.sub, user_id);
        assert_eq!(data.claims.email, "a@b.test");
    }

    #[test]
    fn test_wrong_secret_is_unauthorized() {
        let config = test_config("secret-one", 900);
        let token = create_access_token(Uuid::new_v4(), "a@b.test", &config).unwrap();
        let other = test_config("secret-two", 900);
        assert!(matches!(
            verify_token(&token, &other).unwrap_err(),
            AppError::Unauthorized
        ));
    }

    #[test]
    fn test_expired_token_is_unauthorized() {
        let config = test_config("test-secret", -120);
        let token = create_access_token(Uuid::new_v4(), "a@b.test", &config).unwrap();
        assert!(matches!(
            verify_token(&token, &config).unwrap_err(),
            AppError::Unauthorized
        ));
    }
}
