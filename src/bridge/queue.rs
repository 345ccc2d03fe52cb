//! Pending outbound events.
//!
//! Events sent before the content is ready wait here. The queue holds at
//! most one payload per event name: queuing a name again replaces the
//! earlier payload, so repeated emission before readiness cannot grow an
//! unbounded backlog.

// ============================================================================
// Imports
// ============================================================================

use rustc_hash::FxHashMap;
use serde_json::Value;

// ============================================================================
// PendingEvents
// ============================================================================

/// Single-slot-per-name event queue.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingEvents {
    events: FxHashMap<String, Value>,
}

impl PendingEvents {
    /// Creates an empty queue.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `payload` under `event_name`.
    ///
    /// Returns the payload it replaced, if any.
    #[inline]
    pub fn insert(&mut self, event_name: impl Into<String>, payload: Value) -> Option<Value> {
        self.events.insert(event_name.into(), payload)
    }

    /// Returns the payload queued under `event_name`.
    #[inline]
    #[must_use]
    pub fn get(&self, event_name: &str) -> Option<&Value> {
        self.events.get(event_name)
    }

    /// Empties the queue and returns its contents.
    ///
    /// Order across names is unspecified.
    #[must_use]
    pub fn take(&mut self) -> Vec<(String, Value)> {
        std::mem::take(&mut self.events).into_iter().collect()
    }

    /// Discards everything queued.
    #[inline]
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Returns the number of queued names.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if nothing is queued.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
