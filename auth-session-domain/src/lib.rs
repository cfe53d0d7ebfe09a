/*!
# Auth Session Domain

Brute-force lockout and risk tracking for authentication sessions, built on
hexagonal architecture principles.

This crate provides:
- The `AuthenticationSession` aggregate: a per-session attempt history that
  locks the account after too many failures inside a sliding time window
- Value objects for client IPs, risk levels and lockout policies
- Port definitions for persistence, events, configuration, time and token issuance
- Application services for recording attempts, checking and clearing locks
- In-memory infrastructure adapters

## Architecture

```text
┌─────────────────────────────────────────────────────────────┐
│                Application Layer                            │
├─────────────────────────────────────────────────────────────┤
│  • AuthenticationSessionService  • TokenGateService         │
│  • RecordAuthenticationAttempt / CheckLockout / Unlock      │
└─────────────────────────────────────────────────────────────┘
                              │
┌─────────────────────────────────────────────────────────────┐
│                 Domain Layer (Ports)                        │
├─────────────────────────────────────────────────────────────┤
│  • SessionRepository   • EventPublisher   • Clock           │
│  • ConfigurationPort   • TokenIssuer                        │
└─────────────────────────────────────────────────────────────┘
                              │
┌─────────────────────────────────────────────────────────────┐
│              Infrastructure Layer (Adapters)                │
├─────────────────────────────────────────────────────────────┤
│  • InMemorySessionRepository  • MemoryEventPublisher        │
│  • InMemoryEventBus           • EnvConfigurationAdapter     │
│  • SystemClock / ManualClock                                │
└─────────────────────────────────────────────────────────────┘
```

## Usage

```rust,no_run
use auth_session_domain::{
    application::services::AuthenticationSessionService,
    infrastructure::adapters::{InMemorySessionRepository, MemoryEventPublisher, SystemClock},
    LockoutPolicy, RecordAuthenticationAttempt, RiskScoring, SessionId,
};
use std::sync::Arc;

# async fn run() -> auth_session_domain::DomainResult<()> {
let (publisher, _events) = MemoryEventPublisher::new();
let service = AuthenticationSessionService::new(
    Arc::new(InMemorySessionRepository::new()),
    Arc::new(publisher),
    Arc::new(SystemClock::new()),
    LockoutPolicy::default(),
    RiskScoring::default(),
);

let session_id = SessionId::new().to_string();
let result = service
    .record_attempt(&RecordAuthenticationAttempt::new(
        session_id, "user123", "192.168.1.100", false, 40, "bad password",
    ))
    .await?;
assert!(!result.account_locked);
# Ok(())
# }
```
*/

pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use application::commands::*;
pub use application::ports::*;
pub use application::services::*;
pub use domain::entities::*;
pub use domain::errors::*;
pub use domain::events::*;
