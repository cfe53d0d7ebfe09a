#![allow(dead_code)]

use async_trait::async_trait;
use auth_session_domain::{
    application::ports::{
        AuthToken, DomainEvent, EventError, EventPublisher, SessionRepository, TokenClaims,
        TokenIssuer, TokenRequest,
    },
    domain::{
        entities::{AuthenticationSession, SessionId},
        errors::{DomainResult, RepositoryError, TokenError},
    },
};
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock repository with switchable failures
#[derive(Default)]
pub struct MockSessionRepository {
    pub sessions: Arc<Mutex<HashMap<SessionId, AuthenticationSession>>>,
    pub save_calls: Arc<Mutex<u32>>,
    pub should_fail: Arc<Mutex<bool>>,
}

impl MockSessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.lock().unwrap() = should_fail;
    }

    pub fn save_calls(&self) -> u32 {
        *self.save_calls.lock().unwrap()
    }

    fn check_should_fail(&self) -> DomainResult<()> {
        if *self.should_fail.lock().unwrap() {
            Err(RepositoryError::ConnectionFailed {
                message: "Mock failure enabled".to_string(),
            }
            .into())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SessionRepository for MockSessionRepository {
    async fn find_by_id(
        &self,
        session_id: &SessionId,
    ) -> DomainResult<Option<AuthenticationSession>> {
        self.check_should_fail()?;
        Ok(self.sessions.lock().unwrap().get(session_id).cloned())
    }

    async fn find_by_user_id(&self, user_id: &str) -> DomainResult<Option<AuthenticationSession>> {
        self.check_should_fail()?;
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .values()
            .find(|session| session.user_id() == user_id)
            .cloned())
    }

    async fn save(&self, session: &AuthenticationSession) -> DomainResult<()> {
        self.check_should_fail()?;
        *self.save_calls.lock().unwrap() += 1;
        self.sessions
            .lock()
            .unwrap()
            .insert(*session.session_id(), session.clone());
        Ok(())
    }

    async fn delete(&self, session_id: &SessionId) -> DomainResult<()> {
        self.check_should_fail()?;
        self.sessions.lock().unwrap().remove(session_id);
        Ok(())
    }

    async fn count(&self) -> DomainResult<usize> {
        self.check_should_fail()?;
        Ok(self.sessions.lock().unwrap().len())
    }
}

/// Publisher that records everything it is given
#[derive(Default)]
pub struct RecordingEventPublisher {
    pub events: Arc<Mutex<Vec<DomainEvent>>>,
    pub should_fail: Arc<Mutex<bool>>,
}

impl RecordingEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.lock().unwrap() = should_fail;
    }

    pub fn published(&self) -> Vec<DomainEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingEventPublisher {
    async fn publish(&self, event: DomainEvent) -> Result<(), EventError> {
        if *self.should_fail.lock().unwrap() {
            return Err(EventError::PublishFailed {
                message: "Mock failure enabled".to_string(),
            });
        }
        self.events.lock().unwrap().push(event);
        Ok(())
    }

    async fn publish_batch(&self, events: Vec<DomainEvent>) -> Result<(), EventError> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }

    async fn flush(&self) -> Result<(), EventError> {
        Ok(())
    }
}

/// Token issuer that accepts a single secret and counts calls
pub struct MockTokenIssuer {
    pub accepted_secret: String,
    pub calls: Arc<Mutex<u32>>,
}

impl MockTokenIssuer {
    pub fn new(accepted_secret: &str) -> Self {
        Self {
            accepted_secret: accepted_secret.to_string(),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn calls(&self) -> u32 {
        *self.calls.lock().unwrap()
    }

    fn bump(&self) {
        *self.calls.lock().unwrap() += 1;
    }
}

#[async_trait]
impl TokenIssuer for MockTokenIssuer {
    async fn issue(&self, request: &TokenRequest) -> Result<AuthToken, TokenError> {
        self.bump();
        if request.secret != self.accepted_secret {
            return Err(TokenError::InvalidCredentials);
        }
        Ok(AuthToken::new(
            format!("access-{}", request.user_id),
            Utc::now(),
            300,
            Some(format!("refresh-{}", request.user_id)),
        ))
    }

    async fn validate(&self, access_token: &str) -> Result<TokenClaims, TokenError> {
        self.bump();
        let subject = access_token
            .strip_prefix("access-")
            .ok_or_else(|| TokenError::ValidationFailed {
                reason: "Unknown token".to_string(),
            })?;
        Ok(TokenClaims {
            subject: subject.to_string(),
            expires_at: Utc::now() + Duration::seconds(300),
            scope: None,
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthToken, TokenError> {
        self.bump();
        let subject = refresh_token
            .strip_prefix("refresh-")
            .ok_or_else(|| TokenError::RefreshFailed {
                reason: "Unknown refresh token".to_string(),
            })?;
        Ok(AuthToken::new(
            format!("access-{subject}"),
            Utc::now(),
            300,
            Some(refresh_token.to_string()),
        ))
    }
}
