use crate::application::ports::{
    DomainEvent, EventBus, EventError, EventPublisher, EventSubscriber, EventType,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// In-memory event bus fanning lockout events out to subscribers.
///
/// A failing subscriber is logged and does not stop delivery to the others.
/// The bus is also an [`EventPublisher`], so it can be handed straight to the
/// session service.
#[derive(Clone, Default)]
pub struct InMemoryEventBus {
    subscribers: Arc<RwLock<HashMap<String, SubscriberRegistration>>>,
}

struct SubscriberRegistration {
    subscriber: Arc<dyn EventSubscriber>,
    event_types: Vec<EventType>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventBus for InMemoryEventBus {
    async fn subscribe(&self, subscriber: Box<dyn EventSubscriber>) -> Result<String, EventError> {
        let subscriber_id = Uuid::new_v4().to_string();
        let event_types = subscriber.interested_in();

        info!(
            "Registering subscriber {} for event types: {:?}",
            subscriber_id, event_types
        );

        let registration = SubscriberRegistration {
            subscriber: Arc::from(subscriber),
            event_types,
        };
        self.subscribers
            .write()
            .await
            .insert(subscriber_id.clone(), registration);

        Ok(subscriber_id)
    }

    async fn unsubscribe(&self, subscriber_id: &str) -> Result<(), EventError> {
        let mut subscribers = self.subscribers.write().await;
        match subscribers.remove(subscriber_id) {
            Some(_) => {
                info!("Unsubscribed {}", subscriber_id);
                Ok(())
            }
            None => {
                warn!("Subscriber not found: {}", subscriber_id);
                Err(EventError::SubscriberNotFound {
                    subscriber_id: subscriber_id.to_string(),
                })
            }
        }
    }

    async fn dispatch(&self, event: &DomainEvent) -> Result<(), EventError> {
        // Snapshot so handlers run without holding the registry lock
        let interested: Vec<Arc<dyn EventSubscriber>> = {
            let subscribers = self.subscribers.read().await;
            subscribers
                .values()
                .filter(|reg| reg.event_types.contains(&event.event_type))
                .map(|reg| Arc::clone(&reg.subscriber))
                .collect()
        };

        debug!(
            "Dispatching {} {} to {} subscriber(s)",
            event.event_type,
            event.id,
            interested.len()
        );

        let mut failures = 0usize;
        for subscriber in interested {
            if let Err(e) = subscriber.handle(event).await {
                error!("Subscriber failed to handle event {}: {}", event.id, e);
                failures += 1;
            }
        }

        if failures > 0 {
            warn!(
                "Event {} dispatched with {} subscriber error(s)",
                event.id, failures
            );
        }
        Ok(())
    }

    async fn subscriber_count(&self, event_type: &EventType) -> usize {
        let subscribers = self.subscribers.read().await;
        subscribers
            .values()
            .filter(|reg| reg.event_types.contains(event_type))
            .count()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: DomainEvent) -> Result<(), EventError> {
        self.dispatch(&event).await
    }

    async fn publish_batch(&self, events: Vec<DomainEvent>) -> Result<(), EventError> {
        for event in &events {
            self.dispatch(event).await?;
        }
        Ok(())
    }

    async fn flush(&self) -> Result<(), EventError> {
        Ok(())
    }
}
