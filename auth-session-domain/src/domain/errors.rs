use chrono::{DateTime, Utc};
use thiserror::Error;

/// Domain-specific errors for authentication session operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed or missing input. The message is surfaced verbatim.
    #[error("{message}")]
    InvalidArgument { message: String },

    #[error("Invalid {kind} format: {value}")]
    InvalidFormat { kind: String, value: String },

    /// Reserved for operations invoked in a state where they make no sense.
    #[error("Invalid state: {message}")]
    InvalidState { message: String },

    #[error("Authentication session not found: {session_id}")]
    SessionNotFound { session_id: String },

    #[error("Account for user {user_id} is locked until {locked_until}")]
    AccountLocked {
        user_id: String,
        locked_until: DateTime<Utc>,
    },

    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("External service error: {service} - {message}")]
    ExternalService { service: String, message: String },
}

impl DomainError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        DomainError::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn invalid_format(kind: impl Into<String>, value: impl Into<String>) -> Self {
        DomainError::InvalidFormat {
            kind: kind.into(),
            value: value.into(),
        }
    }

    /// True for input validation failures of either flavour
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidArgument { .. } | DomainError::InvalidFormat { .. }
        )
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Token issuer errors
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token issuance failed: {reason}")]
    IssuanceFailed { reason: String },

    #[error("Token refresh failed: {reason}")]
    RefreshFailed { reason: String },

    #[error("Token validation failed: {reason}")]
    ValidationFailed { reason: String },

    #[error("Token provider unavailable: {message}")]
    ProviderUnavailable { message: String },
}

impl From<TokenError> for DomainError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::InvalidCredentials => DomainError::AuthenticationFailed {
                reason: "Invalid credentials".to_string(),
            },
            TokenError::IssuanceFailed { reason } => DomainError::AuthenticationFailed { reason },
            TokenError::RefreshFailed { reason } => DomainError::AuthenticationFailed { reason },
            TokenError::ValidationFailed { reason } => DomainError::AuthenticationFailed { reason },
            TokenError::ProviderUnavailable { message } => DomainError::ExternalService {
                service: "token-issuer".to_string(),
                message,
            },
        }
    }
}

/// Repository-specific errors
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Query failed: {query} - {message}")]
    QueryFailed { query: String, message: String },

    #[error("Serialization failed: {message}")]
    SerializationFailed { message: String },

    #[error("Timeout after {seconds} seconds")]
    Timeout { seconds: u64 },
}

impl From<RepositoryError> for DomainError {
    fn from(err: RepositoryError) -> Self {
        let message = match err {
            RepositoryError::ConnectionFailed { message } => message,
            RepositoryError::QueryFailed { query, message } => format!("{query}: {message}"),
            RepositoryError::SerializationFailed { message } => message,
            RepositoryError::Timeout { seconds } => {
                format!("Request timed out after {seconds} seconds")
            }
        };
        DomainError::ExternalService {
            service: "session-store".to_string(),
            message,
        }
    }
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required configuration: {key}")]
    MissingRequired { key: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

impl From<ConfigError> for DomainError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::MissingRequired { key } => DomainError::Configuration {
                message: format!("Missing required configuration: {key}"),
            },
            ConfigError::InvalidValue { key, message } => DomainError::Configuration {
                message: format!("Invalid value for {key}: {message}"),
            },
        }
    }
}
