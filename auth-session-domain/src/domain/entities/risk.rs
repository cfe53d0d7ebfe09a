use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};

/// Upper bound of a caller-supplied risk score
pub const MAX_RISK_SCORE: u8 = 100;

/// Risk classification of a single authentication attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskCategory {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskCategory::Low => write!(f, "LOW"),
            RiskCategory::Medium => write!(f, "MEDIUM"),
            RiskCategory::High => write!(f, "HIGH"),
        }
    }
}

/// Score buckets and failure penalty used to build and evaluate risk levels.
///
/// Bucket scores must satisfy `low < medium < high <= 100` and the thresholds
/// must satisfy `0 < medium_threshold < high_threshold <= 100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskScoring {
    pub low_score: u8,
    pub medium_score: u8,
    pub high_score: u8,
    /// Raw scores below this are LOW
    pub medium_threshold: u8,
    /// Raw scores at or above this are HIGH
    pub high_threshold: u8,
    /// Added to the score of a failed attempt. Never clamped.
    pub failure_penalty: u8,
}

impl RiskScoring {
    pub const DEFAULT_LOW_SCORE: u8 = 10;
    pub const DEFAULT_MEDIUM_SCORE: u8 = 50;
    pub const DEFAULT_HIGH_SCORE: u8 = 90;
    pub const DEFAULT_MEDIUM_THRESHOLD: u8 = 30;
    pub const DEFAULT_HIGH_THRESHOLD: u8 = 70;
    pub const DEFAULT_FAILURE_PENALTY: u8 = 20;

    pub fn validate(&self) -> DomainResult<()> {
        if !(self.low_score < self.medium_score && self.medium_score < self.high_score) {
            return Err(DomainError::invalid_argument(
                "Risk bucket scores must be strictly increasing from LOW to HIGH",
            ));
        }
        if self.high_score > MAX_RISK_SCORE || self.high_threshold > MAX_RISK_SCORE {
            return Err(DomainError::invalid_argument(
                "Risk score must be between 0 and 100",
            ));
        }
        if self.medium_threshold == 0 || self.medium_threshold >= self.high_threshold {
            return Err(DomainError::invalid_argument(
                "Risk thresholds must satisfy 0 < medium < high",
            ));
        }
        if self.failure_penalty == 0 {
            return Err(DomainError::invalid_argument(
                "Failure penalty must be greater than 0",
            ));
        }
        Ok(())
    }

    pub fn low(&self, reason: &str) -> DomainResult<RiskLevel> {
        RiskLevel::new(RiskCategory::Low, self.low_score, reason)
    }

    pub fn medium(&self, reason: &str) -> DomainResult<RiskLevel> {
        RiskLevel::new(RiskCategory::Medium, self.medium_score, reason)
    }

    pub fn high(&self, reason: &str) -> DomainResult<RiskLevel> {
        RiskLevel::new(RiskCategory::High, self.high_score, reason)
    }

    pub fn category_for(&self, score: u8) -> RiskCategory {
        if score < self.medium_threshold {
            RiskCategory::Low
        } else if score < self.high_threshold {
            RiskCategory::Medium
        } else {
            RiskCategory::High
        }
    }

    /// Classify a raw 0-100 score, keeping the score itself
    pub fn level_for_score(&self, score: u8, reason: &str) -> DomainResult<RiskLevel> {
        RiskLevel::new(self.category_for(score), score, reason)
    }
}

impl Default for RiskScoring {
    fn default() -> Self {
        Self {
            low_score: Self::DEFAULT_LOW_SCORE,
            medium_score: Self::DEFAULT_MEDIUM_SCORE,
            high_score: Self::DEFAULT_HIGH_SCORE,
            medium_threshold: Self::DEFAULT_MEDIUM_THRESHOLD,
            high_threshold: Self::DEFAULT_HIGH_THRESHOLD,
            failure_penalty: Self::DEFAULT_FAILURE_PENALTY,
        }
    }
}

/// Immutable risk assessment attached to an attempt
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RiskLevel {
    category: RiskCategory,
    score: u8,
    reason: String,
}

impl RiskLevel {
    pub fn new(category: RiskCategory, score: u8, reason: &str) -> DomainResult<Self> {
        if score > MAX_RISK_SCORE {
            return Err(DomainError::invalid_argument(
                "Risk score must be between 0 and 100",
            ));
        }
        if reason.trim().is_empty() {
            return Err(DomainError::invalid_argument(
                "Risk reason cannot be null or empty",
            ));
        }

        Ok(Self {
            category,
            score,
            reason: reason.to_string(),
        })
    }

    pub fn low(reason: &str) -> DomainResult<Self> {
        RiskScoring::default().low(reason)
    }

    pub fn medium(reason: &str) -> DomainResult<Self> {
        RiskScoring::default().medium(reason)
    }

    pub fn high(reason: &str) -> DomainResult<Self> {
        RiskScoring::default().high(reason)
    }

    pub fn category(&self) -> RiskCategory {
        self.category
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.category, self.score, self.reason)
    }
}
