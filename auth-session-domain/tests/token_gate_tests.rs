mod mocks;

use auth_session_domain::{
    application::services::{AuthenticationSessionService, TokenGateService},
    infrastructure::adapters::{InMemorySessionRepository, ManualClock},
    Clock, DomainError, LockoutPolicy, RecordAuthenticationAttempt, RiskScoring, SessionId,
    TokenRequest,
};
use chrono::{Duration, TimeZone, Utc};
use mocks::{MockTokenIssuer, RecordingEventPublisher};
use std::sync::Arc;

struct Gate {
    gate: TokenGateService,
    sessions: Arc<AuthenticationSessionService>,
    issuer: Arc<MockTokenIssuer>,
    clock: ManualClock,
}

fn gate() -> Gate {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
    let sessions = Arc::new(AuthenticationSessionService::new(
        Arc::new(InMemorySessionRepository::new()),
        Arc::new(RecordingEventPublisher::new()),
        Arc::new(clock.clone()),
        LockoutPolicy::new(3, 30, 15).unwrap(),
        RiskScoring::default(),
    ));
    let issuer = Arc::new(MockTokenIssuer::new("s3cret"));
    Gate {
        gate: TokenGateService::new(sessions.clone(), issuer.clone()),
        sessions,
        issuer,
        clock,
    }
}

async fn lock(g: &Gate, session_id: &SessionId) {
    for _ in 0..3 {
        g.sessions
            .record_attempt(&RecordAuthenticationAttempt::new(
                session_id.to_string(),
                "user123",
                "10.1.2.3",
                false,
                20,
                "Invalid password",
            ))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn unknown_session_reaches_issuer() {
    let g = gate();
    let token = g
        .gate
        .issue(
            &SessionId::new().to_string(),
            &TokenRequest::password("user123", "s3cret"),
        )
        .await
        .unwrap();

    assert_eq!(token.access_token, "access-user123");
    assert_eq!(token.token_type, "Bearer");
    assert_eq!(g.issuer.calls(), 1);
}

#[tokio::test]
async fn locked_session_never_reaches_issuer() {
    let g = gate();
    let session_id = SessionId::new();
    lock(&g, &session_id).await;

    let result = g
        .gate
        .issue(
            &session_id.to_string(),
            &TokenRequest::password("user123", "s3cret"),
        )
        .await;

    match result {
        Err(DomainError::AccountLocked {
            user_id,
            locked_until,
        }) => {
            assert_eq!(user_id, "user123");
            assert_eq!(locked_until, g.clock.now() + Duration::minutes(30));
        }
        other => panic!("expected AccountLocked, got {other:?}"),
    }

    let refresh = g
        .gate
        .refresh(&session_id.to_string(), "refresh-user123")
        .await;
    assert!(matches!(refresh, Err(DomainError::AccountLocked { .. })));

    let validate = g
        .gate
        .validate(&session_id.to_string(), "access-user123")
        .await;
    assert!(matches!(validate, Err(DomainError::AccountLocked { .. })));

    assert_eq!(g.issuer.calls(), 0);
}

#[tokio::test]
async fn expired_lock_lets_requests_through() {
    let g = gate();
    let session_id = SessionId::new();
    lock(&g, &session_id).await;

    g.clock.advance(Duration::minutes(31));

    let claims = g
        .gate
        .validate(&session_id.to_string(), "access-user123")
        .await
        .unwrap();
    assert_eq!(claims.subject, "user123");
}

#[tokio::test]
async fn issuer_errors_map_to_domain_errors() {
    let g = gate();
    let result = g
        .gate
        .issue(
            &SessionId::new().to_string(),
            &TokenRequest::password("user123", "wrong"),
        )
        .await;

    assert!(matches!(
        result,
        Err(DomainError::AuthenticationFailed { .. })
    ));
}
