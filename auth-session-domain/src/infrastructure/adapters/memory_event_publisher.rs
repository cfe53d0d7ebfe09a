use crate::application::ports::{DomainEvent, EventError, EventPublisher};
use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Publishes lockout events onto an in-process channel.
///
/// The receiving half is handed back from [`MemoryEventPublisher::new`];
/// dropping it makes every later publish fail.
pub struct MemoryEventPublisher {
    sender: mpsc::UnboundedSender<DomainEvent>,
}

impl MemoryEventPublisher {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<DomainEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl EventPublisher for MemoryEventPublisher {
    async fn publish(&self, event: DomainEvent) -> Result<(), EventError> {
        info!(
            "Publishing {} for session {}",
            event.event_type, event.aggregate_id
        );

        self.sender
            .send(event)
            .map_err(|e| EventError::PublishFailed {
                message: format!("Event channel closed: {e}"),
            })
    }

    async fn publish_batch(&self, events: Vec<DomainEvent>) -> Result<(), EventError> {
        debug!("Publishing batch of {} events", events.len());

        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }

    async fn flush(&self) -> Result<(), EventError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{AggregateType, EventData, EventType};
    use chrono::Utc;

    fn unlocked_event() -> DomainEvent {
        DomainEvent::new(
            EventType::AccountUnlocked,
            "session-1".to_string(),
            AggregateType::AuthenticationSession,
            Utc::now(),
            EventData::AccountUnlocked {
                session_id: "session-1".to_string(),
                user_id: "user123".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn batch_arrives_in_order() {
        let (publisher, mut receiver) = MemoryEventPublisher::new();
        let first = unlocked_event();
        let second = unlocked_event();

        publisher
            .publish_batch(vec![first.clone(), second.clone()])
            .await
            .unwrap();

        assert_eq!(receiver.recv().await.unwrap().id, first.id);
        assert_eq!(receiver.recv().await.unwrap().id, second.id);
    }

    #[tokio::test]
    async fn closed_channel_fails_publish() {
        let (publisher, receiver) = MemoryEventPublisher::new();
        drop(receiver);

        let result = publisher.publish(unlocked_event()).await;
        assert!(matches!(result, Err(EventError::PublishFailed { .. })));
    }
}
