//! Auth application service: registration, login, password hash/verify.

use crate::auth::JwtSecret;
use crate::error::{AppError, AppResult};
use crate::models::{NewUser, UserRecord};
use crate::repositories::{StoreError, UserStore};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

// Argon2id cost: 19 MiB memory, 2 passes, 1 lane.
const M_COST_KIB: u32 = 19_456;
const T_COST: u32 = 2;
const P_COST: u32 = 1;

#[derive(Clone)]
pub struct AuthAppService {
    users: Arc<dyn UserStore>,
    jwt: JwtSecret,
}

impl AuthAppService {
    pub fn new(users: Arc<dyn UserStore>, jwt: JwtSecret) -> Self {
        Self { users, jwt }
    }

    pub fn jwt(&self) -> &JwtSecret {
        &self.jwt
    }

    /// Create a user unless the email is taken. No token is issued here.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> AppResult<UserRecord> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::DuplicateUser);
        }

        let password = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || Self::hash_password(&password))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("hash task: {}", e)))??;

        let user = NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
        };
        let record = self.users.insert(user).await.map_err(|e| match e {
            StoreError::Duplicate => AppError::DuplicateUser,
            other => AppError::Store(other),
        })?;
        info!(user_id = %record.id, "user registered");
        Ok(record)
    }

    /// Verify credentials and issue a session token.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<String> {
        let Some(user) = self.users.find_by_email(email).await? else {
            debug!("login rejected: unknown email");
            return Err(AppError::InvalidCredentials);
        };

        let password = password.to_string();
        let stored = user.password_hash.clone();
        let verified =
            tokio::task::spawn_blocking(move || Self::verify_password(&password, &stored))
                .await
                .map_err(|e| AppError::Internal(anyhow::anyhow!("verify task: {}", e)))?;

        match verified {
            Ok(true) => {}
            Ok(false) => {
                debug!(user_id = %user.id, "login rejected: wrong password");
                return Err(AppError::InvalidCredentials);
            }
            Err(e) => {
                warn!(user_id = %user.id, error = %e, "stored password hash unreadable");
                return Err(AppError::InvalidCredentials);
            }
        }

        let token = self.jwt.issue(&user.email)?;
        info!(user_id = %user.id, "user logged in");
        Ok(token)
    }

    pub fn hash_password(password: &str) -> AppResult<String> {
        let params = Params::new(M_COST_KIB, T_COST, P_COST, None)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("argon2 params: {}", e)))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let salt = SaltString::generate(&mut OsRng);
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("hash: {}", e)))?
            .to_string();
        Ok(hash)
    }

    /// Cost parameters are read back from the PHC string.
    pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
        let parsed =
            PasswordHash::new(hash).map_err(|e| AppError::Internal(anyhow::anyhow!("parse hash: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}
