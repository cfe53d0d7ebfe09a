use crate::domain::{
    entities::{AuthenticationSession, SessionId},
    errors::DomainResult,
};
use async_trait::async_trait;

/// Persistence port for authentication session aggregates.
///
/// Callers load, mutate and save one session at a time. Within a process the
/// session service serializes writers per session id; `save` itself is a
/// plain upsert.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn find_by_id(&self, session_id: &SessionId)
        -> DomainResult<Option<AuthenticationSession>>;

    /// Most recently active session for a user
    async fn find_by_user_id(&self, user_id: &str) -> DomainResult<Option<AuthenticationSession>>;

    /// Insert or replace the session
    async fn save(&self, session: &AuthenticationSession) -> DomainResult<()>;

    async fn delete(&self, session_id: &SessionId) -> DomainResult<()>;

    async fn count(&self) -> DomainResult<usize>;
}
