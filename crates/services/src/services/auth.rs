//! Admin session auth: one shared admin password, opaque bearer tokens, hashed at rest.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{Duration, Utc};
use db::{DBService, models::admin_session::AdminSession};
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("session expired or unknown")]
    Unauthorized,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Clone)]
pub struct AuthService {
    db: DBService,
    admin_password: SecretString,
    session_ttl: Duration,
}

impl AuthService {
    pub fn new(db: DBService, admin_password: SecretString, session_ttl_hours: i64) -> Self {
        Self {
            db,
            admin_password,
            session_ttl: Duration::hours(session_ttl_hours),
        }
    }

    /// Checks the admin password and mints a new session token. The raw token is only
    /// ever returned here; the database sees its SHA-256 hash.
    pub async fn login(&self, password: &str) -> Result<String, AuthError> {
        // Compare digests in constant time so the check leaks no timing signal.
        let supplied = Sha256::digest(password.as_bytes());
        let expected = Sha256::digest(self.admin_password.expose_secret().as_bytes());
        if !bool::from(supplied.ct_eq(&expected)) {
            return Err(AuthError::InvalidCredentials);
        }

        if let Err(e) = AdminSession::purge_expired(&self.db.pool, Utc::now()).await {
            warn!(error = %e, "failed to purge expired admin sessions");
        }

        let mut raw = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut raw);
        let token = URL_SAFE_NO_PAD.encode(raw);

        let expires_at = Utc::now() + self.session_ttl;
        AdminSession::create(&self.db.pool, &hash_token(&token), expires_at).await?;
        Ok(token)
    }

    /// Resolves a bearer token to a live session.
    pub async fn validate(&self, token: &str) -> Result<AdminSession, AuthError> {
        let hash = hash_token(token);
        let session = AdminSession::find_by_token_hash(&self.db.pool, &hash)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        if session.is_expired(Utc::now()) {
            AdminSession::delete_by_token_hash(&self.db.pool, &hash).await?;
            return Err(AuthError::Unauthorized);
        }
        Ok(session)
    }

    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        AdminSession::delete_by_token_hash(&self.db.pool, &hash_token(token)).await?;
        Ok(())
    }
}

fn hash_token(token: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

    use super::*;

    async fn test_db() -> DBService {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").unwrap();
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        db::MIGRATOR.run(&pool).await.unwrap();
        DBService { pool }
    }

    fn service(db: DBService) -> AuthService {
        AuthService::new(db, SecretString::from("hunter2"), 12)
    }

    #[tokio::test]
    async fn login_validate_logout_cycle() {
        let auth = service(test_db().await);

        let token = auth.login("hunter2").await.unwrap();
        auth.validate(&token).await.unwrap();

        auth.logout(&token).await.unwrap();
        let err = auth.validate(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let auth = service(test_db().await);
        let err = auth.login("*******").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn unknown_token_is_unauthorized() {
        let auth = service(test_db().await);
        let err = auth.validate("not-a-token").await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }

    #[test]
    fn token_hash_is_stable_and_opaque() {
        let a = hash_token("abc");
        assert_eq!(a, hash_token("abc"));
        assert_ne!(a, hash_token("abd"));
        assert!(!a.contains("abc"));
    }
}
