use crate::{
    application::{commands::CheckLockoutQuery, ports::*},
    domain::errors::{DomainError, DomainResult},
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::AuthenticationSessionService;

/// Guards a token issuer behind the lockout check.
///
/// Locked sessions never reach the issuer.
pub struct TokenGateService {
    sessions: Arc<AuthenticationSessionService>,
    token_issuer: Arc<dyn TokenIssuer>,
}

impl TokenGateService {
    pub fn new(
        sessions: Arc<AuthenticationSessionService>,
        token_issuer: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            sessions,
            token_issuer,
        }
    }

    #[instrument(skip(self, request), fields(user_id = %request.user_id))]
    pub async fn issue(&self, session_id: &str, request: &TokenRequest) -> DomainResult<AuthToken> {
        self.ensure_unlocked(session_id).await?;

        match self.token_issuer.issue(request).await {
            Ok(token) => {
                info!("Issued token for user '{}'", request.user_id);
                Ok(token)
            }
            Err(e) => {
                warn!("Token issuance failed for user '{}': {}", request.user_id, e);
                Err(e.into())
            }
        }
    }

    #[instrument(skip(self, access_token))]
    pub async fn validate(&self, session_id: &str, access_token: &str) -> DomainResult<TokenClaims> {
        self.ensure_unlocked(session_id).await?;
        Ok(self.token_issuer.validate(access_token).await?)
    }

    #[instrument(skip(self, refresh_token))]
    pub async fn refresh(&self, session_id: &str, refresh_token: &str) -> DomainResult<AuthToken> {
        self.ensure_unlocked(session_id).await?;
        Ok(self.token_issuer.refresh(refresh_token).await?)
    }

    async fn ensure_unlocked(&self, session_id: &str) -> DomainResult<()> {
        let check = self
            .sessions
            .check_lockout(&CheckLockoutQuery::new(session_id))
            .await?;

        match (check.is_locked, check.locked_until) {
            (true, Some(locked_until)) => {
                let user_id = check.user_id.unwrap_or_default();
                warn!("Rejecting token operation for locked account '{}'", user_id);
                Err(DomainError::AccountLocked {
                    user_id,
                    locked_until,
                })
            }
            _ => Ok(()),
        }
    }
}
