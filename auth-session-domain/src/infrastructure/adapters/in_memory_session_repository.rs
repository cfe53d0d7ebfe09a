use crate::application::ports::SessionRepository;
use crate::domain::{
    entities::{AuthenticationSession, SessionId},
    errors::DomainResult,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Session store kept in process memory.
///
/// Saved aggregates are stored without their pending events; events are
/// drained by the caller before saving.
#[derive(Clone, Default)]
pub struct InMemorySessionRepository {
    sessions: Arc<RwLock<HashMap<SessionId, AuthenticationSession>>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn find_by_id(
        &self,
        session_id: &SessionId,
    ) -> DomainResult<Option<AuthenticationSession>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(session_id).cloned())
    }

    async fn find_by_user_id(&self, user_id: &str) -> DomainResult<Option<AuthenticationSession>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .values()
            .filter(|session| session.user_id() == user_id)
            .max_by_key(|session| session.last_activity_at())
            .cloned())
    }

    async fn save(&self, session: &AuthenticationSession) -> DomainResult<()> {
        let mut stored = session.clone();
        stored.take_domain_events();

        debug!(
            "Saving session {} ({} attempts)",
            session.session_id(),
            session.attempts().len()
        );
        let mut sessions = self.sessions.write().await;
        sessions.insert(*session.session_id(), stored);
        Ok(())
    }

    async fn delete(&self, session_id: &SessionId) -> DomainResult<()> {
        let mut sessions = self.sessions.write().await;
        if sessions.remove(session_id).is_some() {
            debug!("Deleted session {}", session_id);
        }
        Ok(())
    }

    async fn count(&self) -> DomainResult<usize> {
        Ok(self.sessions.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ClientIp, LockoutPolicy};
    use chrono::{Duration, TimeZone, Utc};

    fn session(user_id: &str, at_minute: i64) -> AuthenticationSession {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() + Duration::minutes(at_minute);
        AuthenticationSession::create(
            SessionId::new(),
            user_id,
            ClientIp::of("10.0.0.1").unwrap(),
            LockoutPolicy::default(),
            now,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn save_find_and_delete() {
        let repo = InMemorySessionRepository::new();
        let s = session("alice", 0);
        let id = *s.session_id();

        repo.save(&s).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);
        assert_eq!(repo.find_by_id(&id).await.unwrap().unwrap().user_id(), "alice");

        repo.delete(&id).await.unwrap();
        assert!(repo.find_by_id(&id).await.unwrap().is_none());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn find_by_user_prefers_most_recent_activity() {
        let repo = InMemorySessionRepository::new();
        let older = session("bob", 0);
        let newer = session("bob", 5);
        repo.save(&older).await.unwrap();
        repo.save(&newer).await.unwrap();
        repo.save(&session("carol", 10)).await.unwrap();

        let found = repo.find_by_user_id("bob").await.unwrap().unwrap();
        assert_eq!(found.session_id(), newer.session_id());
        assert!(repo.find_by_user_id("dave").await.unwrap().is_none());
    }
}
