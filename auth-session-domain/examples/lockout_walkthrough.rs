use auth_session_domain::{
    application::{ports::*, services::*},
    infrastructure::adapters::*,
    CheckLockoutQuery, RecordAuthenticationAttempt, SessionId, UnlockAccountCommand,
};
use chrono::Duration;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Prints every lockout event it sees
struct SecurityEventHandler;

#[async_trait::async_trait]
impl EventSubscriber for SecurityEventHandler {
    async fn handle(&self, event: &DomainEvent) -> Result<(), EventError> {
        match &event.data {
            EventData::AccountLocked {
                user_id,
                client_ip,
                failed_attempt_count,
                locked_until,
                ..
            } => {
                println!(
                    "🔒 SECURITY: '{}' locked until {} after {} failures from {}",
                    user_id, locked_until, failed_attempt_count, client_ip
                );
            }
            EventData::AccountUnlocked { user_id, .. } => {
                println!("🔓 SECURITY: '{}' unlocked", user_id);
            }
        }
        Ok(())
    }

    fn interested_in(&self) -> Vec<EventType> {
        vec![EventType::AccountLocked, EventType::AccountUnlocked]
    }
}

/// Walks one session through lockout, expiry and an explicit unlock
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = EnvConfigurationAdapter::new()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.get_logging_config().filter_directive().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("🚀 Authentication Session Lockout Walkthrough");
    println!("=============================================\n");

    let event_bus = Arc::new(InMemoryEventBus::new());
    event_bus.subscribe(Box::new(SecurityEventHandler)).await?;

    let clock = ManualClock::new(chrono::Utc::now());
    let service = AuthenticationSessionService::from_config(
        &config,
        Arc::new(InMemorySessionRepository::new()),
        event_bus.clone(),
        Arc::new(clock.clone()),
    )?;

    let policy = *service.policy();
    println!(
        "📦 Policy: {} failures within {} minutes locks for {} minutes\n",
        policy.max_failed_attempts(),
        policy.time_window_minutes(),
        policy.lockout_duration_minutes()
    );

    let session_id = SessionId::new().to_string();
    let attempt = |successful: bool| {
        RecordAuthenticationAttempt::new(
            session_id.clone(),
            "user123",
            "192.168.1.100",
            successful,
            45,
            "Invalid password",
        )
    };

    println!("1️⃣  Recording failed attempts...");
    for n in 1..=policy.max_failed_attempts() {
        let result = service.record_attempt(&attempt(false)).await?;
        println!(
            "   attempt {n}: locked = {}, locked until = {:?}",
            result.account_locked, result.locked_until
        );
        clock.advance(Duration::minutes(1));
    }

    let check = service
        .check_lockout(&CheckLockoutQuery::new(session_id.clone()))
        .await?;
    println!("\n2️⃣  Lockout check: locked = {}", check.is_locked);

    println!("\n3️⃣  Letting the lock expire...");
    clock.advance(Duration::minutes(i64::from(policy.lockout_duration_minutes()) + 1));
    let check = service
        .check_lockout(&CheckLockoutQuery::new(session_id.clone()))
        .await?;
    println!("   locked after expiry = {}", check.is_locked);

    println!("\n4️⃣  Clearing the stored flag...");
    let unlocked = service
        .unlock_account(&UnlockAccountCommand::new(session_id.clone()))
        .await?;
    println!(
        "   was locked = {}, unlock successful = {}",
        unlocked.was_locked, unlocked.unlock_successful
    );

    println!("\n5️⃣  A successful login resets the streak");
    let result = service.record_attempt(&attempt(true)).await?;
    println!("   locked = {}", result.account_locked);

    println!("\n✅ Walkthrough complete");
    Ok(())
}
