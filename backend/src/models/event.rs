//! Event logging for replication replay and auditing.
//!
//! Captures every decision the model takes during a replication. Events
//! enable:
//! - Debugging (which class bought what, and when)
//! - Auditing (revenue and rejection counters can be recomputed from the log)
//! - Analysis (sell-out times, rejection reasons)
//!
//! # Example
//!
//! ```rust
//! use seat_simulator_core_rs::models::{Event, EventLog};
//!
//! let mut log = EventLog::new();
//! log.log(Event::Arrival { time: 1.5, class: 0 });
//! log.log(Event::AllSoldOut { time: 2.0 });
//!
//! assert_eq!(log.len(), 2);
//! assert_eq!(log.events_of_type("Arrival").len(), 1);
//! ```

use crate::antithetic::Parity;
use crate::models::catalogue::{ClassId, ProductId};

/// Why an arrival left without buying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    /// The customer sampled the no-purchase product
    NoPurchase,
    /// No available product carried positive weight for the class
    NoAvailability,
    /// The sampled bulk quantity exceeded the remaining seats
    BulkInfeasible { requested: u32, remaining: u32 },
}

/// Replication event capturing a state change.
///
/// All events carry the simulated time at which they occurred.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Replication reset and re-seeded
    ReplicationStarted {
        time: f64,
        replication: u64,
        parity: Parity,
        seed: u64,
    },

    /// Customer of `class` arrived
    Arrival { time: f64, class: ClassId },

    /// Customer bought `quantity` units of `product`
    Purchase {
        time: f64,
        class: ClassId,
        product: ProductId,
        quantity: u32,
        revenue: i64,
    },

    /// Customer left without buying
    Rejection {
        time: f64,
        class: ClassId,
        reason: RejectionReason,
    },

    /// `product` reached capacity
    SoldOut { time: f64, product: ProductId },

    /// Every non-sink product reached capacity
    AllSoldOut { time: f64 },

    /// The next arrival of `class` would fall beyond the horizon
    HorizonReached { time: f64, class: ClassId },
}

impl Event {
    /// Simulated time at which this event occurred
    pub fn time(&self) -> f64 {
        match self {
            Event::ReplicationStarted { time, .. } => *time,
            Event::Arrival { time, .. } => *time,
            Event::Purchase { time, .. } => *time,
            Event::Rejection { time, .. } => *time,
            Event::SoldOut { time, .. } => *time,
            Event::AllSoldOut { time } => *time,
            Event::HorizonReached { time, .. } => *time,
        }
    }

    /// Short description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::ReplicationStarted { .. } => "ReplicationStarted",
            Event::Arrival { .. } => "Arrival",
            Event::Purchase { .. } => "Purchase",
            Event::Rejection { .. } => "Rejection",
            Event::SoldOut { .. } => "SoldOut",
            Event::AllSoldOut { .. } => "AllSoldOut",
            Event::HorizonReached { .. } => "HorizonReached",
        }
    }

    /// Customer class if the event concerns one
    pub fn class(&self) -> Option<ClassId> {
        match self {
            Event::Arrival { class, .. } => Some(*class),
            Event::Purchase { class, .. } => Some(*class),
            Event::Rejection { class, .. } => Some(*class),
            Event::HorizonReached { class, .. } => Some(*class),
            _ => None,
        }
    }
}

/// Event log for storing and querying replication events.
///
/// A disabled log drops everything it is given, which keeps long experiments
/// from accumulating millions of entries.
#[derive(Debug, Clone)]
pub struct EventLog {
    events: Vec<Event>,
    enabled: bool,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLog {
    /// Create a new empty, enabled event log
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            enabled: true,
        }
    }

    /// Create a log that records nothing
    pub fn disabled() -> Self {
        Self {
            events: Vec::new(),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Add an event to the log
    pub fn log(&mut self, event: Event) {
        if self.enabled {
            self.events.push(event);
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Get events of a specific type
    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Get events for a specific customer class
    pub fn events_for_class(&self, class: ClassId) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.class() == Some(class))
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_time_and_type() {
        let event = Event::Purchase {
            time: 12.5,
            class: 1,
            product: 3,
            quantity: 2,
            revenue: 1500,
        };

        assert_eq!(event.time(), 12.5);
        assert_eq!(event.event_type(), "Purchase");
        assert_eq!(event.class(), Some(1));
    }

    #[test]
    fn test_disabled_log_records_nothing() {
        let mut log = EventLog::disabled();
        log.log(Event::AllSoldOut { time: 1.0 });

        assert!(log.is_empty());
        assert!(!log.is_enabled());
    }

    #[test]
    fn test_events_for_class() {
        let mut log = EventLog::new();
        log.log(Event::Arrival { time: 1.0, class: 0 });
        log.log(Event::Arrival { time: 2.0, class: 1 });
        log.log(Event::Rejection {
            time: 2.0,
            class: 1,
            reason: RejectionReason::NoPurchase,
        });
        log.log(Event::SoldOut { time: 2.0, product: 4 });

        assert_eq!(log.events_for_class(1).len(), 2);
        assert_eq!(log.events_for_class(0).len(), 1);
    }
}
