use std::sync::mpsc::Sender;
use std::sync::{Mutex, PoisonError};

use log::debug;

use crate::model::Event;

/// A fire-and-forget notification channel consumed by external observers.
///
/// The engines publish events here only after the emitting transaction has
/// committed. Delivery is best-effort and is not part of the transaction's
/// atomicity guarantee: a sink must never block and never fail the caller.
pub trait EventSink: Send + Sync {
    /// Publish one event.
    fn publish(&self, event: Event);
}

/// Publishes events onto an mpsc channel.
///
/// A disconnected receiver drops the event rather than surfacing an error,
/// per the best-effort contract.
pub struct ChannelSink {
    sender: Sender<Event>,
}

impl ChannelSink {
    pub fn new(sender: Sender<Event>) -> Self {
        Self { sender }
    }
}

impl EventSink for ChannelSink {
    fn publish(&self, event: Event) {
        if self.sender.send(event).is_err() {
            debug!("event dropped: no connected observer");
        }
    }
}

/// Collects published events in memory.
///
/// Used by tests and by in-process observers that poll rather than listen.
#[derive(Debug, Default)]
pub struct BufferSink {
    events: Mutex<Vec<Event>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return every event published so far, oldest first.
    pub fn drain(&self) -> Vec<Event> {
        std::mem::take(&mut self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl EventSink for BufferSink {
    fn publish(&self, event: Event) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
