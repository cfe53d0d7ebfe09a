use crate::{
    application::{commands::*, ports::*},
    domain::{
        entities::{AuthenticationSession, LockoutPolicy, RiskScoring, SessionId},
        errors::{DomainError, DomainResult},
    },
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, instrument, warn};

/// Use cases driving the authentication session aggregate: record an
/// attempt, check lockout state and unlock an account.
///
/// Each command reads the clock once, loads (or creates) the session,
/// mutates it, saves it and only then publishes the raised events. Writers
/// of the same session are serialized from load to save.
pub struct AuthenticationSessionService {
    repository: Arc<dyn SessionRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
    policy: LockoutPolicy,
    risk_scoring: RiskScoring,
    writers: SessionWriters,
}

/// One async mutex per session id with a command in flight
#[derive(Default)]
struct SessionWriters {
    locks: Mutex<HashMap<SessionId, Arc<Mutex<()>>>>,
}

impl SessionWriters {
    async fn acquire(&self, session_id: SessionId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            // Entries nobody holds or waits on
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(session_id).or_default())
        };
        lock.lock_owned().await
    }
}

impl AuthenticationSessionService {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        event_publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
        policy: LockoutPolicy,
        risk_scoring: RiskScoring,
    ) -> Self {
        Self {
            repository,
            event_publisher,
            clock,
            policy,
            risk_scoring,
            writers: SessionWriters::default(),
        }
    }

    /// Build the service from validated configuration
    pub fn from_config(
        config: &dyn ConfigurationPort,
        repository: Arc<dyn SessionRepository>,
        event_publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
    ) -> DomainResult<Self> {
        config.validate()?;
        Ok(Self::new(
            repository,
            event_publisher,
            clock,
            config.get_lockout_config().to_policy()?,
            config.get_risk_config().to_scoring(),
        ))
    }

    pub fn policy(&self) -> &LockoutPolicy {
        &self.policy
    }

    pub fn risk_scoring(&self) -> &RiskScoring {
        &self.risk_scoring
    }

    /// Record an authentication attempt, locking the account on a breach
    #[instrument(skip(self, command), fields(session_id = %command.session_id, user_id = %command.user_id, successful = command.successful))]
    pub async fn record_attempt(
        &self,
        command: &RecordAuthenticationAttempt,
    ) -> DomainResult<RecordAttemptResult> {
        let attempt = command.validate()?;
        let risk_level = self
            .risk_scoring
            .level_for_score(attempt.risk_score, &attempt.risk_reason)?;

        let _writer = self.writers.acquire(attempt.session_id).await;
        let now = self.clock.now();
        let mut session = match self.repository.find_by_id(&attempt.session_id).await? {
            Some(session) => session,
            None => {
                info!(
                    "Creating authentication session {} for user '{}'",
                    attempt.session_id, attempt.user_id
                );
                AuthenticationSession::create(
                    attempt.session_id,
                    &attempt.user_id,
                    attempt.client_ip.clone(),
                    self.policy,
                    now,
                )?
            }
        };

        let attempted_at = attempt.attempted_at.unwrap_or(now);
        let lock = session.record_attempt_at(
            &attempt.user_id,
            attempt.client_ip,
            attempt.successful,
            risk_level,
            attempted_at,
            now,
        )?;

        if let Some(ref locked) = lock {
            warn!(
                "Account '{}' locked until {} after {} failed attempts",
                locked.user_id, locked.locked_until, locked.failed_attempt_count
            );
        } else {
            debug!(
                "Recorded attempt for '{}' ({} failed in window)",
                attempt.user_id,
                session.failed_attempts_in_window(now)
            );
        }

        self.persist_and_publish(&mut session).await?;

        let account_locked = session.is_currently_locked(now);
        Ok(RecordAttemptResult {
            session_id: attempt.session_id,
            user_id: attempt.user_id,
            successful: attempt.successful,
            account_locked,
            locked_until: session.locked_until().filter(|_| account_locked),
            recorded_at: now,
        })
    }

    /// Report whether a session is currently locked.
    ///
    /// An unknown session has never failed and is reported unlocked.
    #[instrument(skip(self, query), fields(session_id = %query.session_id))]
    pub async fn check_lockout(&self, query: &CheckLockoutQuery) -> DomainResult<LockoutCheckResult> {
        let session_id = query.validate()?;
        let now = self.clock.now();

        let Some(session) = self.repository.find_by_id(&session_id).await? else {
            debug!("No authentication session {}, reporting unlocked", session_id);
            return Ok(LockoutCheckResult {
                session_id,
                user_id: None,
                is_locked: false,
                locked_until: None,
                checked_at: now,
            });
        };

        let is_locked = session.is_currently_locked(now);
        Ok(LockoutCheckResult {
            session_id,
            user_id: Some(session.user_id().to_string()),
            is_locked,
            locked_until: session.locked_until().filter(|_| is_locked),
            checked_at: now,
        })
    }

    /// Clear the stored lock of a session.
    ///
    /// A session whose stored flag is not set is left untouched and the
    /// result reports `unlock_successful == false`.
    #[instrument(skip(self, command), fields(session_id = %command.session_id))]
    pub async fn unlock_account(
        &self,
        command: &UnlockAccountCommand,
    ) -> DomainResult<UnlockAccountResult> {
        let session_id = command.validate()?;
        let _writer = self.writers.acquire(session_id).await;
        let now = self.clock.now();
        let mut session = self.load(&session_id).await?;

        let was_locked = session.is_locked();
        if !was_locked {
            info!("Session {} is not locked, nothing to unlock", session_id);
            return Ok(UnlockAccountResult {
                session_id,
                user_id: session.user_id().to_string(),
                was_locked,
                unlock_successful: false,
                unlocked_at: None,
            });
        }

        session.unlock_account(now);
        self.persist_and_publish(&mut session).await?;

        info!("Unlocked account '{}' ({})", session.user_id(), session_id);
        Ok(UnlockAccountResult {
            session_id,
            user_id: session.user_id().to_string(),
            was_locked,
            unlock_successful: true,
            unlocked_at: Some(now),
        })
    }

    /// Mark activity on an existing session without recording an attempt
    #[instrument(skip(self))]
    pub async fn touch_session(&self, session_id: &SessionId) -> DomainResult<()> {
        let _writer = self.writers.acquire(*session_id).await;
        let mut session = self.load(session_id).await?;
        session.update_last_activity(self.clock.now());
        self.persist_and_publish(&mut session).await
    }

    async fn load(&self, session_id: &SessionId) -> DomainResult<AuthenticationSession> {
        self.repository
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| DomainError::SessionNotFound {
                session_id: session_id.to_string(),
            })
    }

    /// Save first, then publish drained events. Publishing failures are
    /// logged and do not fail the command.
    async fn persist_and_publish(&self, session: &mut AuthenticationSession) -> DomainResult<()> {
        let events = session.take_domain_events();
        self.repository.save(session).await?;

        if events.is_empty() {
            return Ok(());
        }

        let envelopes: Vec<DomainEvent> = events.into_iter().map(DomainEvent::from).collect();
        let count = envelopes.len();
        if let Err(e) = self.event_publisher.publish_batch(envelopes).await {
            warn!(
                "Failed to publish {} event(s) for session {}: {}",
                count,
                session.session_id(),
                e
            );
        }
        Ok(())
    }
}
