//! Commands, queries and results at the boundary of the session use cases.

use crate::domain::{
    entities::{ClientIp, SessionId, MAX_RISK_SCORE},
    errors::{DomainError, DomainResult},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record one authentication attempt against a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordAuthenticationAttempt {
    pub session_id: String,
    pub user_id: String,
    pub client_ip: String,
    pub successful: bool,
    pub risk_score: i32,
    pub risk_reason: String,
    /// When the attempt happened, if different from the time it is recorded
    pub attempted_at: Option<DateTime<Utc>>,
}

/// Fields of a `RecordAuthenticationAttempt` after validation
#[derive(Debug, Clone)]
pub struct ValidatedAttempt {
    pub session_id: SessionId,
    pub user_id: String,
    pub client_ip: ClientIp,
    pub successful: bool,
    pub risk_score: u8,
    pub risk_reason: String,
    pub attempted_at: Option<DateTime<Utc>>,
}

impl RecordAuthenticationAttempt {
    pub fn new(
        session_id: impl Into<String>,
        user_id: impl Into<String>,
        client_ip: impl Into<String>,
        successful: bool,
        risk_score: i32,
        risk_reason: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            user_id: user_id.into(),
            client_ip: client_ip.into(),
            successful,
            risk_score,
            risk_reason: risk_reason.into(),
            attempted_at: None,
        }
    }

    pub fn at(mut self, attempted_at: DateTime<Utc>) -> Self {
        self.attempted_at = Some(attempted_at);
        self
    }

    /// Validate every field, reporting the first failure as `InvalidArgument`
    pub fn validate(&self) -> DomainResult<ValidatedAttempt> {
        let session_id = parse_session_id(&self.session_id)?;

        if self.user_id.trim().is_empty() {
            return Err(DomainError::invalid_argument(
                "UserId cannot be null or empty",
            ));
        }

        let client_ip = ClientIp::of(&self.client_ip).map_err(as_invalid_argument)?;

        let risk_score = u8::try_from(self.risk_score)
            .ok()
            .filter(|score| *score <= MAX_RISK_SCORE)
            .ok_or_else(|| DomainError::invalid_argument("Risk score must be between 0 and 100"))?;

        if self.risk_reason.trim().is_empty() {
            return Err(DomainError::invalid_argument(
                "Risk reason cannot be null or empty",
            ));
        }

        Ok(ValidatedAttempt {
            session_id,
            user_id: self.user_id.clone(),
            client_ip,
            successful: self.successful,
            risk_score,
            risk_reason: self.risk_reason.clone(),
            attempted_at: self.attempted_at,
        })
    }
}

/// Ask whether a session is currently locked
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckLockoutQuery {
    pub session_id: String,
}

impl CheckLockoutQuery {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
        }
    }

    pub fn validate(&self) -> DomainResult<SessionId> {
        parse_session_id(&self.session_id)
    }
}

/// Clear a session's lock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlockAccountCommand {
    pub session_id: String,
}

impl UnlockAccountCommand {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
        }
    }

    pub fn validate(&self) -> DomainResult<SessionId> {
        parse_session_id(&self.session_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordAttemptResult {
    pub session_id: SessionId,
    pub user_id: String,
    pub successful: bool,
    pub account_locked: bool,
    pub locked_until: Option<DateTime<Utc>>,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockoutCheckResult {
    pub session_id: SessionId,
    pub user_id: Option<String>,
    pub is_locked: bool,
    pub locked_until: Option<DateTime<Utc>>,
    pub checked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockAccountResult {
    pub session_id: SessionId,
    pub user_id: String,
    pub was_locked: bool,
    pub unlock_successful: bool,
    pub unlocked_at: Option<DateTime<Utc>>,
}

fn parse_session_id(value: &str) -> DomainResult<SessionId> {
    SessionId::parse(value).map_err(as_invalid_argument)
}

fn as_invalid_argument(err: DomainError) -> DomainError {
    match err {
        DomainError::InvalidFormat { .. } => DomainError::invalid_argument(err.to_string()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> RecordAuthenticationAttempt {
        RecordAuthenticationAttempt::new(
            SessionId::new().to_string(),
            "user123",
            "192.168.1.100",
            false,
            40,
            "unfamiliar device",
        )
    }

    fn message(cmd: &RecordAuthenticationAttempt) -> String {
        match cmd.validate() {
            Err(DomainError::InvalidArgument { message }) => message,
            other => panic!("expected InvalidArgument, got {other:?}"),
        }
    }

    #[test]
    fn valid_command_passes() {
        let validated = valid().validate().unwrap();
        assert_eq!(validated.user_id, "user123");
        assert_eq!(validated.client_ip.as_str(), "192.168.1.100");
        assert_eq!(validated.risk_score, 40);
    }

    #[test]
    fn each_field_reports_its_own_message() {
        let mut cmd = valid();
        cmd.session_id = String::new();
        assert_eq!(message(&cmd), "SessionId cannot be null or empty");

        let mut cmd = valid();
        cmd.user_id = "  ".to_string();
        assert_eq!(message(&cmd), "UserId cannot be null or empty");

        let mut cmd = valid();
        cmd.client_ip = String::new();
        assert_eq!(message(&cmd), "ClientIp cannot be null or empty");

        let mut cmd = valid();
        cmd.client_ip = " 192.168.1.100 ".to_string();
        assert_eq!(message(&cmd), "Invalid ClientIp format:  192.168.1.100 ");

        let mut cmd = valid();
        cmd.risk_score = 101;
        assert_eq!(message(&cmd), "Risk score must be between 0 and 100");

        let mut cmd = valid();
        cmd.risk_score = -1;
        assert_eq!(message(&cmd), "Risk score must be between 0 and 100");

        let mut cmd = valid();
        cmd.risk_reason = String::new();
        assert_eq!(message(&cmd), "Risk reason cannot be null or empty");
    }

    #[test]
    fn malformed_session_id_is_invalid_argument() {
        let mut cmd = valid();
        cmd.session_id = "session-1".to_string();
        assert_eq!(message(&cmd), "Invalid SessionId format: session-1");
    }

    #[test]
    fn boundary_scores_are_accepted() {
        for score in [0, 100] {
            let mut cmd = valid();
            cmd.risk_score = score;
            assert!(cmd.validate().is_ok());
        }
    }

    #[test]
    fn queries_validate_session_id() {
        assert!(CheckLockoutQuery::new("").validate().is_err());
        assert!(UnlockAccountCommand::new(SessionId::new().to_string())
            .validate()
            .is_ok());
    }
}
