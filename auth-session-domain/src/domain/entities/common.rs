use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of an authentication session aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a session id from its textual UUID form
    pub fn parse(value: &str) -> DomainResult<Self> {
        if value.trim().is_empty() {
            return Err(DomainError::invalid_argument(
                "SessionId cannot be null or empty",
            ));
        }

        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| DomainError::invalid_format("SessionId", value))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for SessionId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::str::FromStr for SessionId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reject blank user identifiers with the canonical message
pub(crate) fn require_user_id(user_id: &str) -> DomainResult<()> {
    if user_id.trim().is_empty() {
        return Err(DomainError::invalid_argument(
            "UserId cannot be null or empty",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_are_unique() {
        assert_ne!(SessionId::new(), SessionId::new());
    }

    #[test]
    fn parse_accepts_uuid_text() {
        let id = SessionId::new();
        let parsed = SessionId::parse(&id.to_string()).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn parse_rejects_blank_and_malformed() {
        assert_eq!(
            SessionId::parse("  ").unwrap_err().to_string(),
            "SessionId cannot be null or empty"
        );
        assert!(matches!(
            SessionId::parse("not-a-uuid"),
            Err(DomainError::InvalidFormat { .. })
        ));
    }
}
