//! JWT issue and validation.

use crate::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,   // email
    pub exp: i64,
    pub iat: i64,
}

/// Signing secret plus the configured token lifetime.
#[derive(Clone)]
pub struct JwtSecret {
    secret: String,
    expiry: Duration,
}

impl JwtSecret {
    pub fn new(secret: String, expiry: Duration) -> Self {
        Self { secret, expiry }
    }

    pub fn issue(&self, email: &str) -> AppResult<String> {
        self.issue_at(email, Utc::now())
    }

    /// Issue a token as if signed at `now`; `exp = now + expiry`.
    pub fn issue_at(&self, email: &str, now: DateTime<Utc>) -> AppResult<String> {
        let iat = now.timestamp();
        let lifetime = i64::try_from(self.expiry.as_secs())
            .map_err(|_| AppError::Internal(anyhow::anyhow!("token expiry out of range")))?;
        let claims = Claims {
            sub: email.to_string(),
            exp: iat.saturating_add(lifetime),
            iat,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("sign token: {}", e)))?;
        Ok(token)
    }

    pub fn validate(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| AppError::Jwt(e.to_string()))?;
        Ok(data.claims)
    }
}
