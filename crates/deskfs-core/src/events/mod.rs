//! Events emitted by explorer operations and the sync channels.
//!
//! Events are published on an [`EventBus`] and consumed by whatever
//! presents transient status to the user (toasts, the "Saved/Syncing"
//! indicator, CLI progress lines).

pub mod operation;
pub mod sync;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

pub use operation::OperationEvent;
pub use sync::{DocumentKind, SyncEvent, SyncPhase};

/// Wrapper for all events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The event payload.
    pub payload: EventPayload,
}

/// Union of all event types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event")]
pub enum EventPayload {
    /// A user-triggered operation changed state.
    Operation(OperationEvent),
    /// A background sync channel changed state.
    Sync(SyncEvent),
}

impl DomainEvent {
    /// Create a new event.
    pub fn new(payload: EventPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            payload,
        }
    }
}

/// Broadcast bus for [`DomainEvent`]s.
///
/// Publishing never fails: with no subscribers the event is dropped.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    /// Create a bus retaining up to `capacity` undelivered events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }

    /// Publish an operation event.
    pub fn operation(&self, event: OperationEvent) {
        let _ = self
            .sender
            .send(DomainEvent::new(EventPayload::Operation(event)));
    }

    /// Publish a sync event.
    pub fn sync(&self, event: SyncEvent) {
        let _ = self.sender.send(DomainEvent::new(EventPayload::Sync(event)));
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
