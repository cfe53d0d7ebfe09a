use crate::domain::entities::{ClientIp, SessionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raised whenever a session transitions into (or refreshes) a lock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountLocked {
    pub session_id: SessionId,
    pub user_id: String,
    pub client_ip: ClientIp,
    pub failed_attempt_count: u32,
    pub locked_until: DateTime<Utc>,
    pub occurred_at: DateTime<Utc>,
}

/// Raised when a stored lock is cleared by an explicit unlock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountUnlocked {
    pub session_id: SessionId,
    pub user_id: String,
    pub occurred_at: DateTime<Utc>,
}

/// Facts emitted by the authentication session aggregate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    AccountLocked(AccountLocked),
    AccountUnlocked(AccountUnlocked),
}

impl SessionEvent {
    pub fn session_id(&self) -> &SessionId {
        match self {
            SessionEvent::AccountLocked(e) => &e.session_id,
            SessionEvent::AccountUnlocked(e) => &e.session_id,
        }
    }

    pub fn user_id(&self) -> &str {
        match self {
            SessionEvent::AccountLocked(e) => &e.user_id,
            SessionEvent::AccountUnlocked(e) => &e.user_id,
        }
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            SessionEvent::AccountLocked(e) => e.occurred_at,
            SessionEvent::AccountUnlocked(e) => e.occurred_at,
        }
    }
}

impl From<AccountLocked> for SessionEvent {
    fn from(event: AccountLocked) -> Self {
        SessionEvent::AccountLocked(event)
    }
}

impl From<AccountUnlocked> for SessionEvent {
    fn from(event: AccountUnlocked) -> Self {
        SessionEvent::AccountUnlocked(event)
    }
}
