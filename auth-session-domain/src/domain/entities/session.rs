use super::attempt::AuthenticationAttempt;
use super::client_ip::ClientIp;
use super::common::{require_user_id, SessionId};
use super::risk::RiskLevel;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::events::{AccountLocked, AccountUnlocked, SessionEvent};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Lockout parameters fixed for the lifetime of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockoutPolicy {
    max_failed_attempts: u32,
    lockout_duration_minutes: u32,
    time_window_minutes: u32,
}

impl LockoutPolicy {
    pub const DEFAULT_MAX_FAILED_ATTEMPTS: u32 = 5;
    pub const DEFAULT_LOCKOUT_DURATION_MINUTES: u32 = 30;
    pub const DEFAULT_TIME_WINDOW_MINUTES: u32 = 15;

    pub fn new(
        max_failed_attempts: u32,
        lockout_duration_minutes: u32,
        time_window_minutes: u32,
    ) -> DomainResult<Self> {
        if max_failed_attempts == 0 {
            return Err(DomainError::invalid_argument(
                "Max failed attempts must be greater than 0",
            ));
        }
        if lockout_duration_minutes == 0 {
            return Err(DomainError::invalid_argument(
                "Lockout duration must be greater than 0",
            ));
        }
        if time_window_minutes == 0 {
            return Err(DomainError::invalid_argument(
                "Time window must be greater than 0",
            ));
        }

        Ok(Self {
            max_failed_attempts,
            lockout_duration_minutes,
            time_window_minutes,
        })
    }

    pub fn max_failed_attempts(&self) -> u32 {
        self.max_failed_attempts
    }

    pub fn lockout_duration_minutes(&self) -> u32 {
        self.lockout_duration_minutes
    }

    pub fn time_window_minutes(&self) -> u32 {
        self.time_window_minutes
    }

    pub fn lockout_duration(&self) -> Duration {
        Duration::minutes(i64::from(self.lockout_duration_minutes))
    }

    pub fn time_window(&self) -> Duration {
        Duration::minutes(i64::from(self.time_window_minutes))
    }
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_failed_attempts: Self::DEFAULT_MAX_FAILED_ATTEMPTS,
            lockout_duration_minutes: Self::DEFAULT_LOCKOUT_DURATION_MINUTES,
            time_window_minutes: Self::DEFAULT_TIME_WINDOW_MINUTES,
        }
    }
}

/// Effective lock state of a session at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    Unlocked,
    Locked { until: DateTime<Utc> },
}

/// Aggregate root tracking the attempt history and lock state of one user session.
///
/// # Invariants
///
/// - `attempts` is ordered non-decreasing by `attempted_at`
/// - `locked` implies `locked_until.is_some()`
/// - `last_activity_at` never moves backwards
/// - the lockout policy never changes after creation
///
/// Expiry is lazy: a lock whose `locked_until` has passed keeps its stored
/// flag but no longer counts as currently locked.
///
/// Every operation that depends on the current time takes `now` so that one
/// clock reading is used consistently for a whole call.
#[derive(Debug, Clone)]
pub struct AuthenticationSession {
    session_id: SessionId,
    user_id: String,
    client_ip: ClientIp,
    policy: LockoutPolicy,
    locked: bool,
    locked_until: Option<DateTime<Utc>>,
    attempts: Vec<AuthenticationAttempt>,
    created_at: DateTime<Utc>,
    last_activity_at: DateTime<Utc>,
    pending_events: Vec<SessionEvent>,
}

impl AuthenticationSession {
    pub fn create(
        session_id: SessionId,
        user_id: &str,
        client_ip: ClientIp,
        policy: LockoutPolicy,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        require_user_id(user_id)?;

        Ok(Self {
            session_id,
            user_id: user_id.to_string(),
            client_ip,
            policy,
            locked: false,
            locked_until: None,
            attempts: Vec::new(),
            created_at: now,
            last_activity_at: now,
            pending_events: Vec::new(),
        })
    }

    /// Rebuild a session from persisted state (no validation, no events).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        session_id: SessionId,
        user_id: String,
        client_ip: ClientIp,
        policy: LockoutPolicy,
        locked: bool,
        locked_until: Option<DateTime<Utc>>,
        attempts: Vec<AuthenticationAttempt>,
        created_at: DateTime<Utc>,
        last_activity_at: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id,
            user_id,
            client_ip,
            policy,
            locked,
            locked_until,
            attempts,
            created_at,
            last_activity_at,
            pending_events: Vec::new(),
        }
    }

    // Accessors

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn client_ip(&self) -> &ClientIp {
        &self.client_ip
    }

    pub fn policy(&self) -> &LockoutPolicy {
        &self.policy
    }

    pub fn attempts(&self) -> &[AuthenticationAttempt] {
        &self.attempts
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_activity_at(&self) -> DateTime<Utc> {
        self.last_activity_at
    }

    pub fn locked_until(&self) -> Option<DateTime<Utc>> {
        self.locked_until
    }

    /// The stored lock flag, regardless of expiry
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_currently_locked(&self, now: DateTime<Utc>) -> bool {
        matches!(self.lock_state(now), LockState::Locked { .. })
    }

    pub fn lock_state(&self, now: DateTime<Utc>) -> LockState {
        match (self.locked, self.locked_until) {
            (true, Some(until)) if until > now => LockState::Locked { until },
            _ => LockState::Unlocked,
        }
    }

    // Attempt recording

    /// Record an attempt that happened at `now`
    pub fn record_attempt(
        &mut self,
        user_id: &str,
        client_ip: ClientIp,
        successful: bool,
        risk_level: RiskLevel,
        now: DateTime<Utc>,
    ) -> DomainResult<Option<AccountLocked>> {
        self.record_attempt_at(user_id, client_ip, successful, risk_level, now, now)
    }

    /// Record an attempt observed at `attempted_at`, evaluated against `now`.
    ///
    /// Backdated attempts are inserted after any attempt with an equal or
    /// earlier timestamp. Attempts for a user other than the session owner
    /// are rejected. Returns the lock event if this attempt tripped the
    /// threshold.
    pub fn record_attempt_at(
        &mut self,
        user_id: &str,
        client_ip: ClientIp,
        successful: bool,
        risk_level: RiskLevel,
        attempted_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> DomainResult<Option<AccountLocked>> {
        let attempt =
            AuthenticationAttempt::create(user_id, attempted_at, successful, client_ip, risk_level)?;
        if user_id != self.user_id {
            return Err(DomainError::invalid_argument(
                "UserId does not match session owner",
            ));
        }

        let position = self
            .attempts
            .partition_point(|existing| existing.attempted_at() <= attempted_at);
        self.attempts.insert(position, attempt);
        self.touch(now);

        if self.should_lock_account(now) {
            return Ok(Some(self.lock_account(now)));
        }
        Ok(None)
    }

    /// Failed attempts inside the sliding window that come after the most
    /// recent successful attempt.
    pub fn failed_attempts_in_window(&self, now: DateTime<Utc>) -> u32 {
        let window_start = now - self.policy.time_window();
        let streak_start = self
            .attempts
            .iter()
            .rposition(AuthenticationAttempt::is_successful)
            .map_or(0, |index| index + 1);

        let count = self.attempts[streak_start..]
            .iter()
            .filter(|attempt| attempt.is_failed() && attempt.is_within_time_window(window_start))
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// True only while not currently locked and the failure threshold is met.
    pub fn should_lock_account(&self, now: DateTime<Utc>) -> bool {
        !self.is_currently_locked(now)
            && self.failed_attempts_in_window(now) >= self.policy.max_failed_attempts()
    }

    // Lock transitions

    /// Lock for the policy's duration starting at `now`.
    ///
    /// Locking an already locked session refreshes `locked_until` and emits
    /// a fresh `AccountLocked` event.
    pub fn lock_account(&mut self, now: DateTime<Utc>) -> AccountLocked {
        let locked_until = now + self.policy.lockout_duration();
        self.locked = true;
        self.locked_until = Some(locked_until);

        let event = AccountLocked {
            session_id: self.session_id,
            user_id: self.user_id.clone(),
            client_ip: self.client_ip.clone(),
            failed_attempt_count: self.failed_attempts_in_window(now),
            locked_until,
            occurred_at: now,
        };
        self.pending_events.push(event.clone().into());
        event
    }

    /// Clear the lock unconditionally. Emits `AccountUnlocked` only if the
    /// stored flag was set.
    pub fn unlock_account(&mut self, now: DateTime<Utc>) -> Option<AccountUnlocked> {
        let was_locked = self.locked;
        self.locked = false;
        self.locked_until = None;

        if !was_locked {
            return None;
        }

        let event = AccountUnlocked {
            session_id: self.session_id,
            user_id: self.user_id.clone(),
            occurred_at: now,
        };
        self.pending_events.push(event.clone().into());
        Some(event)
    }

    pub fn update_last_activity(&mut self, now: DateTime<Utc>) {
        self.touch(now);
    }

    /// Operator/test override that sets the lock fields directly, bypassing
    /// the transition rules and emitting no events.
    pub fn force_set_lock_status(
        &mut self,
        locked: bool,
        locked_until: Option<DateTime<Utc>>,
    ) -> DomainResult<()> {
        if locked && locked_until.is_none() {
            return Err(DomainError::invalid_argument(
                "LockedUntil is required when forcing a locked status",
            ));
        }
        self.locked = locked;
        self.locked_until = locked_until;
        Ok(())
    }

    // Outbox

    pub fn domain_events(&self) -> &[SessionEvent] {
        &self.pending_events
    }

    /// Drain accumulated events for publication after persistence
    pub fn take_domain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.pending_events)
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        if now > self.last_activity_at {
            self.last_activity_at = now;
        }
    }
}
