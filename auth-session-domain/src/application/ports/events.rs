use crate::domain::events::SessionEvent;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event publisher port for domain events
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single domain event
    async fn publish(&self, event: DomainEvent) -> Result<(), EventError>;

    /// Publish multiple domain events
    async fn publish_batch(&self, events: Vec<DomainEvent>) -> Result<(), EventError>;

    /// Flush any pending events
    async fn flush(&self) -> Result<(), EventError>;
}

/// Event subscriber port for handling domain events
#[async_trait]
pub trait EventSubscriber: Send + Sync {
    /// Handle a domain event
    async fn handle(&self, event: &DomainEvent) -> Result<(), EventError>;

    /// Get the event types this subscriber is interested in
    fn interested_in(&self) -> Vec<EventType>;
}

/// Event bus for routing events to subscribers
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Register a subscriber for its declared event types, returning its id
    async fn subscribe(&self, subscriber: Box<dyn EventSubscriber>) -> Result<String, EventError>;

    async fn unsubscribe(&self, subscriber_id: &str) -> Result<(), EventError>;

    /// Deliver an event to every interested subscriber
    async fn dispatch(&self, event: &DomainEvent) -> Result<(), EventError>;

    async fn subscriber_count(&self, event_type: &EventType) -> usize;
}

/// Envelope carried to external publishers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    pub id: String,
    pub event_type: EventType,
    pub aggregate_id: String,
    pub aggregate_type: AggregateType,
    pub version: u64,
    pub timestamp: DateTime<Utc>,
    pub metadata: EventMetadata,
    pub data: EventData,
}

impl DomainEvent {
    pub fn new(
        event_type: EventType,
        aggregate_id: String,
        aggregate_type: AggregateType,
        timestamp: DateTime<Utc>,
        data: EventData,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_type,
            aggregate_id,
            aggregate_type,
            version: 1,
            timestamp,
            metadata: EventMetadata::default(),
            data,
        }
    }

    pub fn with_metadata(mut self, metadata: EventMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

impl From<SessionEvent> for DomainEvent {
    fn from(event: SessionEvent) -> Self {
        match event {
            SessionEvent::AccountLocked(locked) => Self::new(
                EventType::AccountLocked,
                locked.session_id.to_string(),
                AggregateType::AuthenticationSession,
                locked.occurred_at,
                EventData::AccountLocked {
                    session_id: locked.session_id.to_string(),
                    user_id: locked.user_id.clone(),
                    client_ip: locked.client_ip.to_string(),
                    failed_attempt_count: locked.failed_attempt_count,
                    locked_until: locked.locked_until,
                },
            )
            .with_metadata(
                EventMetadata::new()
                    .with_user_id(locked.user_id)
                    .with_ip_address(locked.client_ip.to_string()),
            ),
            SessionEvent::AccountUnlocked(unlocked) => Self::new(
                EventType::AccountUnlocked,
                unlocked.session_id.to_string(),
                AggregateType::AuthenticationSession,
                unlocked.occurred_at,
                EventData::AccountUnlocked {
                    session_id: unlocked.session_id.to_string(),
                    user_id: unlocked.user_id.clone(),
                },
            )
            .with_metadata(EventMetadata::new().with_user_id(unlocked.user_id)),
        }
    }
}

/// Types of domain events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EventType {
    AccountLocked,
    AccountUnlocked,
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EventType::AccountLocked => "AccountLocked",
            EventType::AccountUnlocked => "AccountUnlocked",
        };
        write!(f, "{name}")
    }
}

/// Aggregate types that can emit events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AggregateType {
    AuthenticationSession,
}

/// Event metadata containing contextual information
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventMetadata {
    pub correlation_id: Option<String>,
    pub user_id: Option<String>,
    pub ip_address: Option<String>,
    pub additional: std::collections::HashMap<String, String>,
}

impl EventMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_id(mut self, user_id: String) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn with_ip_address(mut self, ip_address: String) -> Self {
        self.ip_address = Some(ip_address);
        self
    }
}

/// Event payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum EventData {
    AccountLocked {
        session_id: String,
        user_id: String,
        client_ip: String,
        failed_attempt_count: u32,
        locked_until: DateTime<Utc>,
    },
    AccountUnlocked {
        session_id: String,
        user_id: String,
    },
}

/// Event processing errors
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("Event serialization failed: {message}")]
    SerializationFailed { message: String },

    #[error("Event publishing failed: {message}")]
    PublishFailed { message: String },

    #[error("Event handling failed: {message}")]
    HandlingFailed { message: String },

    #[error("Subscriber not found: {subscriber_id}")]
    SubscriberNotFound { subscriber_id: String },
}
