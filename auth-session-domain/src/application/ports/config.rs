use crate::domain::entities::{LockoutPolicy, RiskScoring};
use crate::domain::errors::{ConfigError, DomainResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration port for accessing application configuration
pub trait ConfigurationPort: Send + Sync {
    fn get_lockout_config(&self) -> &LockoutConfig;

    fn get_risk_config(&self) -> &RiskConfig;

    fn get_logging_config(&self) -> &LoggingConfig;

    /// Validate all configuration
    fn validate(&self) -> DomainResult<()>;

    fn is_development(&self) -> bool;

    fn is_test(&self) -> bool;
}

/// Brute-force lockout parameters handed to every new session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockoutConfig {
    pub max_failed_attempts: u32,
    pub lockout_duration_minutes: u32,
    pub time_window_minutes: u32,
}

impl Default for LockoutConfig {
    fn default() -> Self {
        Self {
            max_failed_attempts: LockoutPolicy::DEFAULT_MAX_FAILED_ATTEMPTS,
            lockout_duration_minutes: LockoutPolicy::DEFAULT_LOCKOUT_DURATION_MINUTES,
            time_window_minutes: LockoutPolicy::DEFAULT_TIME_WINDOW_MINUTES,
        }
    }
}

impl LockoutConfig {
    pub fn validate(&self) -> DomainResult<()> {
        for (key, value) in [
            ("LOCKOUT_MAX_FAILED_ATTEMPTS", self.max_failed_attempts),
            ("LOCKOUT_DURATION_MINUTES", self.lockout_duration_minutes),
            ("LOCKOUT_TIME_WINDOW_MINUTES", self.time_window_minutes),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "Must be greater than 0".to_string(),
                }
                .into());
            }
        }
        Ok(())
    }

    pub fn to_policy(&self) -> DomainResult<LockoutPolicy> {
        LockoutPolicy::new(
            self.max_failed_attempts,
            self.lockout_duration_minutes,
            self.time_window_minutes,
        )
    }

    pub fn get_lockout_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.lockout_duration_minutes) * 60)
    }

    pub fn get_time_window(&self) -> Duration {
        Duration::from_secs(u64::from(self.time_window_minutes) * 60)
    }
}

/// Risk bucket scores, bucketing thresholds and failure penalty
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    pub low_score: u8,
    pub medium_score: u8,
    pub high_score: u8,
    pub medium_threshold: u8,
    pub high_threshold: u8,
    pub failure_penalty: u8,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self::from(RiskScoring::default())
    }
}

impl From<RiskScoring> for RiskConfig {
    fn from(scoring: RiskScoring) -> Self {
        Self {
            low_score: scoring.low_score,
            medium_score: scoring.medium_score,
            high_score: scoring.high_score,
            medium_threshold: scoring.medium_threshold,
            high_threshold: scoring.high_threshold,
            failure_penalty: scoring.failure_penalty,
        }
    }
}

impl RiskConfig {
    pub fn to_scoring(&self) -> RiskScoring {
        RiskScoring {
            low_score: self.low_score,
            medium_score: self.medium_score,
            high_score: self.high_score,
            medium_threshold: self.medium_threshold,
            high_threshold: self.high_threshold,
            failure_penalty: self.failure_penalty,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        self.to_scoring().validate().map_err(|e| {
            ConfigError::InvalidValue {
                key: "RISK".to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub enable_json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Compact,
            enable_json: false,
        }
    }
}

impl LoggingConfig {
    /// Directive string suitable for an `EnvFilter`
    pub fn filter_directive(&self) -> String {
        format!("auth_session_domain={}", self.level)
    }
}

/// Log level enumeration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// Log format enumeration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
    Full,
}

/// Environment-specific configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Test,
    Staging,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub environment: Environment,
    pub lockout: LockoutConfig,
    pub risk: RiskConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn validate(&self) -> DomainResult<()> {
        self.lockout.validate()?;
        self.risk.validate()?;
        Ok(())
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn is_test(&self) -> bool {
        self.environment == Environment::Test
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Load configuration from environment variables
    pub fn from_env() -> DomainResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Missing or unparseable values fall back to their defaults; the
    /// assembled configuration is validated before it is returned.
    pub fn from_lookup<F>(lookup: F) -> DomainResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse_or = |key: &str, default: u32| -> u32 {
            lookup(key)
                .and_then(|value| value.trim().parse().ok())
                .unwrap_or(default)
        };
        let parse_u8_or = |key: &str, default: u8| -> u8 {
            lookup(key)
                .and_then(|value| value.trim().parse().ok())
                .unwrap_or(default)
        };

        let environment = lookup("ENVIRONMENT")
            .unwrap_or_else(|| "development".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                key: "ENVIRONMENT".to_string(),
                message: "Must be one of: development, test, staging, production".to_string(),
            })?;

        let lockout = LockoutConfig {
            max_failed_attempts: parse_or(
                "LOCKOUT_MAX_FAILED_ATTEMPTS",
                LockoutPolicy::DEFAULT_MAX_FAILED_ATTEMPTS,
            ),
            lockout_duration_minutes: parse_or(
                "LOCKOUT_DURATION_MINUTES",
                LockoutPolicy::DEFAULT_LOCKOUT_DURATION_MINUTES,
            ),
            time_window_minutes: parse_or(
                "LOCKOUT_TIME_WINDOW_MINUTES",
                LockoutPolicy::DEFAULT_TIME_WINDOW_MINUTES,
            ),
        };

        let risk = RiskConfig {
            low_score: parse_u8_or("RISK_LOW_SCORE", RiskScoring::DEFAULT_LOW_SCORE),
            medium_score: parse_u8_or("RISK_MEDIUM_SCORE", RiskScoring::DEFAULT_MEDIUM_SCORE),
            high_score: parse_u8_or("RISK_HIGH_SCORE", RiskScoring::DEFAULT_HIGH_SCORE),
            medium_threshold: parse_u8_or(
                "RISK_MEDIUM_THRESHOLD",
                RiskScoring::DEFAULT_MEDIUM_THRESHOLD,
            ),
            high_threshold: parse_u8_or("RISK_HIGH_THRESHOLD", RiskScoring::DEFAULT_HIGH_THRESHOLD),
            failure_penalty: parse_u8_or(
                "RISK_FAILURE_PENALTY",
                RiskScoring::DEFAULT_FAILURE_PENALTY,
            ),
        };

        let logging = LoggingConfig {
            level: lookup("LOG_LEVEL")
                .and_then(|value| value.parse().ok())
                .unwrap_or(LogLevel::Info),
            format: lookup("LOG_FORMAT")
                .and_then(|value| value.parse().ok())
                .unwrap_or(LogFormat::Compact),
            enable_json: lookup("LOG_JSON")
                .and_then(|value| value.parse().ok())
                .unwrap_or(false),
        };

        let config = AppConfig {
            environment,
            lockout,
            risk,
            logging,
        };

        config.validate()?;
        Ok(config)
    }
}

/// String parsing implementations
impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            "staging" | "stage" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(format!("Invalid environment: {s}")),
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {s}")),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "full" => Ok(LogFormat::Full),
            _ => Err(format!("Invalid log format: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert!(config.is_development());
        assert_eq!(config.lockout.max_failed_attempts, 5);
        assert_eq!(config.lockout.lockout_duration_minutes, 30);
        assert_eq!(config.lockout.time_window_minutes, 15);
        assert_eq!(config.risk.to_scoring(), RiskScoring::default());
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn values_are_read_from_lookup() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("ENVIRONMENT", "prod"),
            ("LOCKOUT_MAX_FAILED_ATTEMPTS", "3"),
            ("LOCKOUT_DURATION_MINUTES", "60"),
            ("LOCKOUT_TIME_WINDOW_MINUTES", "10"),
            ("RISK_FAILURE_PENALTY", "25"),
            ("LOG_LEVEL", "debug"),
        ]))
        .unwrap();

        assert!(config.is_production());
        let policy = config.lockout.to_policy().unwrap();
        assert_eq!(policy.max_failed_attempts(), 3);
        assert_eq!(policy.lockout_duration_minutes(), 60);
        assert_eq!(policy.time_window_minutes(), 10);
        assert_eq!(config.risk.failure_penalty, 25);
        assert_eq!(config.logging.filter_directive(), "auth_session_domain=debug");
    }

    #[test]
    fn unparseable_numbers_fall_back_to_defaults() {
        let config =
            AppConfig::from_lookup(lookup_from(&[("LOCKOUT_MAX_FAILED_ATTEMPTS", "many")]))
                .unwrap();
        assert_eq!(config.lockout.max_failed_attempts, 5);
    }

    #[test]
    fn zero_window_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[("LOCKOUT_TIME_WINDOW_MINUTES", "0")]))
            .unwrap_err();
        assert!(err.to_string().contains("LOCKOUT_TIME_WINDOW_MINUTES"));
    }

    #[test]
    fn inverted_risk_buckets_are_rejected() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("RISK_LOW_SCORE", "60"),
            ("RISK_MEDIUM_SCORE", "50"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn unknown_environment_is_rejected() {
        assert!(AppConfig::from_lookup(lookup_from(&[("ENVIRONMENT", "moon")])).is_err());
    }

    #[test]
    fn durations_convert_to_std() {
        let lockout = LockoutConfig::default();
        assert_eq!(lockout.get_lockout_duration(), Duration::from_secs(30 * 60));
        assert_eq!(lockout.get_time_window(), Duration::from_secs(15 * 60));
    }
}
