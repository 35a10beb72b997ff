//! Replication State
//!
//! Everything a single replication mutates: seat inventory, the counter
//! registry with its typed handles, and the event log. Exclusively owned by
//! one replication; nothing here is shared across replications.
//!
//! # Critical Invariants
//!
//! 1. **Rejections as Sink Sales**: `registry[rejected] == inventory.sold(sink)`
//! 2. **Revenue Conservation**: `registry[revenue] == Σ price[i]·sold[i]`
//! 3. **Arrival Conservation**: `registry[arrivals] == Σ registry[arrivals.<class>]`

use crate::metrics::{CounterRegistry, CounterSet, Measures};
use crate::models::catalogue::Catalogue;
use crate::models::event::EventLog;
use crate::models::inventory::InventoryState;

/// Mutable state of one replication
#[derive(Debug, Clone)]
pub struct ReplicationState {
    pub inventory: InventoryState,
    pub registry: CounterRegistry,
    pub counters: CounterSet,
    pub log: EventLog,
}

impl ReplicationState {
    pub fn new(catalogue: &Catalogue, record_events: bool) -> Self {
        let mut registry = CounterRegistry::new();
        let counters = CounterSet::register(&mut registry, catalogue);
        Self {
            inventory: InventoryState::new(catalogue.num_products()),
            registry,
            counters,
            log: if record_events {
                EventLog::new()
            } else {
                EventLog::disabled()
            },
        }
    }

    /// Replication-reset hook.
    pub fn reset(&mut self) {
        self.inventory.reset();
        self.registry.reset();
        self.log.clear();
    }

    pub fn measures<'a>(&'a self, catalogue: &'a Catalogue) -> Measures<'a> {
        Measures::new(&self.registry, &self.counters, catalogue)
    }
}
