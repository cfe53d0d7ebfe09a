use crate::domain::errors::TokenError;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Bearer token handed out by a token issuer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub token_type: String,
    pub scope: Option<String>,
}

impl AuthToken {
    pub fn new(
        access_token: String,
        issued_at: DateTime<Utc>,
        expires_in: i64,
        refresh_token: Option<String>,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_at: issued_at + Duration::seconds(expires_in),
            token_type: "Bearer".to_string(),
            scope: None,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Credentials presented when asking for a token
#[derive(Debug, Clone)]
pub struct TokenRequest {
    pub user_id: String,
    pub secret: String,
    pub scope: Option<String>,
}

impl TokenRequest {
    pub fn password(user_id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            secret: secret.into(),
            scope: None,
        }
    }
}

/// Claims recovered from a validated access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub subject: String,
    pub expires_at: DateTime<Utc>,
    pub scope: Option<String>,
}

/// Opaque token provider (JWT signer, Keycloak, ...).
///
/// The lockout engine never calls it directly; the token gate consults
/// lockout state first.
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    async fn issue(&self, request: &TokenRequest) -> Result<AuthToken, TokenError>;

    async fn validate(&self, access_token: &str) -> Result<TokenClaims, TokenError>;

    async fn refresh(&self, refresh_token: &str) -> Result<AuthToken, TokenError>;
}
