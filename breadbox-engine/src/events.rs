//! Change notification sinks.

use std::sync::Mutex;

use breadbox_types::{Event, EventPayload};
use tracing::{debug, info};

/// Receives change events. Emission never fails and never blocks.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: Event);
}

/// Writes every event to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: Event) {
        match &event.payload {
            EventPayload::RecordChanged {
                resource,
                record_id,
                action,
                ..
            } => info!("{} {} {} (event {})", resource, record_id, action, event.id),
            EventPayload::FileDeleted { disk, path } => {
                info!("File deleted {}:{} (event {})", disk, path, event.id)
            }
        }
    }
}

/// Forwards events to an async consumer.
impl EventSink for tokio::sync::mpsc::UnboundedSender<Event> {
    fn emit(&self, event: Event) {
        if self.send(event).is_err() {
            debug!("Event receiver dropped, discarding event");
        }
    }
}

/// Keeps events in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<Event>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of everything emitted so far.
    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: Event) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
