use super::client_ip::ClientIp;
use super::common::require_user_id;
use super::risk::{RiskLevel, RiskScoring};
use crate::domain::errors::DomainResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable record of one login attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationAttempt {
    user_id: String,
    attempted_at: DateTime<Utc>,
    successful: bool,
    client_ip: ClientIp,
    risk_level: RiskLevel,
}

impl AuthenticationAttempt {
    pub fn create(
        user_id: &str,
        attempted_at: DateTime<Utc>,
        successful: bool,
        client_ip: ClientIp,
        risk_level: RiskLevel,
    ) -> DomainResult<Self> {
        require_user_id(user_id)?;

        Ok(Self {
            user_id: user_id.to_string(),
            attempted_at,
            successful,
            client_ip,
            risk_level,
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn attempted_at(&self) -> DateTime<Utc> {
        self.attempted_at
    }

    pub fn is_successful(&self) -> bool {
        self.successful
    }

    pub fn is_failed(&self) -> bool {
        !self.successful
    }

    pub fn client_ip(&self) -> &ClientIp {
        &self.client_ip
    }

    pub fn risk_level(&self) -> &RiskLevel {
        &self.risk_level
    }

    /// Inclusive: an attempt exactly at `window_start` is inside the window.
    pub fn is_within_time_window(&self, window_start: DateTime<Utc>) -> bool {
        self.attempted_at >= window_start
    }

    pub fn is_from_same_source(&self, other: &ClientIp) -> bool {
        &self.client_ip == other
    }

    /// Risk score with the default failure penalty
    pub fn calculate_risk_score(&self) -> u32 {
        self.calculate_risk_score_with(&RiskScoring::default())
    }

    /// Risk level score, plus `failure_penalty` when the attempt failed.
    ///
    /// The result is not clamped to 100 so a failed attempt always outscores
    /// a successful one carrying the same risk level.
    pub fn calculate_risk_score_with(&self, scoring: &RiskScoring) -> u32 {
        let base = u32::from(self.risk_level.score());
        if self.successful {
            base
        } else {
            base + u32::from(scoring.failure_penalty)
        }
    }
}
