//! Data-change notifications
//!
//! A form session keeps an ordered list of [`DataChangeListener`]s and calls
//! each of them, synchronously and in subscription order, once an entity has
//! been saved. Nothing is published when a save fails.
//!
//! [`EventBus`] bridges these synchronous callbacks to async consumers: it is
//! itself a listener that forwards every envelope into a
//! `tokio::sync::broadcast` channel.
//!
//! # Usage
//!
//! ```rust,ignore
//! let bus = EventBus::new(64);
//! let mut rx = bus.subscribe();
//!
//! form.subscribe_data_change_listener(Arc::new(bus.clone()));
//! form.subscribe_data_change_listener(Arc::new(|envelope: &EventEnvelope| {
//!     println!("refresh list after {}", envelope.event.action());
//! }));
//!
//! form.save(input).await?;
//! let envelope = rx.recv().await?;
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

/// A persisted change to a department or seller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DataChangeEvent {
    /// A new row was inserted
    Created {
        entity_type: String,
        entity_id: i64,
        data: serde_json::Value,
    },
    /// An existing row was overwritten
    Updated {
        entity_type: String,
        entity_id: i64,
        data: serde_json::Value,
    },
}

impl DataChangeEvent {
    /// Get the entity type this event relates to
    pub fn entity_type(&self) -> &str {
        match self {
            DataChangeEvent::Created { entity_type, .. }
            | DataChangeEvent::Updated { entity_type, .. } => entity_type,
        }
    }

    /// Get the id of the saved row
    pub fn entity_id(&self) -> i64 {
        match self {
            DataChangeEvent::Created { entity_id, .. }
            | DataChangeEvent::Updated { entity_id, .. } => *entity_id,
        }
    }

    /// Get the action name (created, updated)
    pub fn action(&self) -> &str {
        match self {
            DataChangeEvent::Created { .. } => "created",
            DataChangeEvent::Updated { .. } => "updated",
        }
    }

    /// Get the saved entity as JSON
    pub fn data(&self) -> &serde_json::Value {
        match self {
            DataChangeEvent::Created { data, .. } | DataChangeEvent::Updated { data, .. } => data,
        }
    }
}

/// Envelope wrapping a data-change event with metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique event ID
    pub id: Uuid,
    /// When the event occurred
    pub timestamp: DateTime<Utc>,
    /// The actual event
    pub event: DataChangeEvent,
}

impl EventEnvelope {
    /// Create a new event envelope
    pub fn new(event: DataChangeEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Callback invoked after a successful save
pub trait DataChangeListener: Send + Sync {
    fn on_data_changed(&self, envelope: &EventEnvelope);
}

impl<F> DataChangeListener for F
where
    F: Fn(&EventEnvelope) + Send + Sync,
{
    fn on_data_changed(&self, envelope: &EventEnvelope) {
        self(envelope)
    }
}

/// Ordered list of listeners
#[derive(Clone, Default)]
pub struct DataChangeListeners {
    listeners: Vec<Arc<dyn DataChangeListener>>,
}

impl DataChangeListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener; it is called after every listener subscribed before it
    pub fn subscribe(&mut self, listener: Arc<dyn DataChangeListener>) {
        self.listeners.push(listener);
    }

    /// Call every listener in subscription order
    pub fn notify(&self, envelope: &EventEnvelope) {
        for listener in &self.listeners {
            listener.on_data_changed(envelope);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for DataChangeListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataChangeListeners")
            .field("len", &self.listeners.len())
            .finish()
    }
}

/// Broadcast-based event bus
///
/// The bus is cheap to clone (Arc internally) and can be shared across threads.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a new EventBus with the given channel capacity
    ///
    /// The capacity determines how many events can be buffered before
    /// slow receivers start losing events (lagged).
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an envelope to all subscribers
    ///
    /// Returns the number of receivers that will receive the event.
    pub fn publish(&self, envelope: EventEnvelope) -> usize {
        // send() returns Err only if there are no receivers, which is fine
        self.sender.send(envelope).unwrap_or(0)
    }

    /// Subscribe to events
    ///
    /// Events published before this call are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    /// Get the current number of active subscribers
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl DataChangeListener for EventBus {
    fn on_data_changed(&self, envelope: &EventEnvelope) {
        let receivers = self.publish(envelope.clone());
        tracing::debug!(event_id = %envelope.id, receivers, "Data change published");
    }
}
