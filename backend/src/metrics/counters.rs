//! Named numeric accumulators

use crate::models::catalogue::Catalogue;
use std::collections::{BTreeMap, HashMap};

/// Handle to a registered counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CounterId(usize);

/// Name → accumulator table.
///
/// # Example
/// ```
/// use seat_simulator_core_rs::metrics::CounterRegistry;
///
/// let mut registry = CounterRegistry::new();
/// let arrivals = registry.register("arrivals");
/// registry.increment(arrivals);
/// registry.increment_by(arrivals, 2.0);
///
/// assert_eq!(registry.value(arrivals), 3.0);
/// assert_eq!(registry.value_of("arrivals"), Some(3.0));
///
/// registry.reset();
/// assert_eq!(registry.value(arrivals), 0.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CounterRegistry {
    names: Vec<String>,
    values: Vec<f64>,
    index: HashMap<String, CounterId>,
}

impl CounterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a counter starting at zero. Registering an existing name
    /// returns the existing handle.
    pub fn register(&mut self, name: &str) -> CounterId {
        if let Some(&id) = self.index.get(name) {
            return id;
        }
        let id = CounterId(self.names.len());
        self.names.push(name.to_string());
        self.values.push(0.0);
        self.index.insert(name.to_string(), id);
        id
    }

    #[inline]
    pub fn increment(&mut self, id: CounterId) {
        self.values[id.0] += 1.0;
    }

    #[inline]
    pub fn increment_by(&mut self, id: CounterId, amount: f64) {
        self.values[id.0] += amount;
    }

    #[inline]
    pub fn value(&self, id: CounterId) -> f64 {
        self.values[id.0]
    }

    pub fn value_of(&self, name: &str) -> Option<f64> {
        self.index.get(name).map(|&id| self.value(id))
    }

    pub fn name(&self, id: CounterId) -> &str {
        &self.names[id.0]
    }

    /// Replication-reset hook: every counter back to zero.
    pub fn reset(&mut self) {
        self.values.fill(0.0);
    }

    /// Current values keyed by name.
    pub fn snapshot(&self) -> BTreeMap<String, f64> {
        self.names
            .iter()
            .cloned()
            .zip(self.values.iter().copied())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Typed handles to every counter the seat model touches.
///
/// The sink product has no counter of its own: a no-purchase outcome is a
/// rejection, so `sold[sink]` is the `rejected` handle.
#[derive(Debug, Clone)]
pub struct CounterSet {
    pub arrivals: CounterId,
    pub class_arrivals: Vec<CounterId>,
    pub rejected: CounterId,
    pub class_rejected: Vec<CounterId>,
    pub revenue: CounterId,
    /// Units sold per product (sink → `rejected`)
    pub sold: Vec<CounterId>,
    /// Sold-out latch per product (`None` for the sink)
    pub sold_out: Vec<Option<CounterId>>,
    pub sold_out_all: CounterId,
}

impl CounterSet {
    pub fn register(registry: &mut CounterRegistry, catalogue: &Catalogue) -> Self {
        let arrivals = registry.register("arrivals");
        let rejected = registry.register("rejected");
        let revenue = registry.register("revenue");
        let sold_out_all = registry.register("sold_out.all");

        let class_arrivals = catalogue
            .classes()
            .iter()
            .map(|c| registry.register(&format!("arrivals.{}", c.name)))
            .collect();
        let class_rejected = catalogue
            .classes()
            .iter()
            .map(|c| registry.register(&format!("rejected.{}", c.name)))
            .collect();

        let mut sold = Vec::with_capacity(catalogue.num_products());
        let mut sold_out = Vec::with_capacity(catalogue.num_products());
        for (id, product) in catalogue.products().iter().enumerate() {
            if id == catalogue.sink() {
                sold.push(rejected);
                sold_out.push(None);
            } else {
                sold.push(registry.register(&format!("sold.{}", product.name)));
                sold_out.push(Some(registry.register(&format!("sold_out.{}", product.name))));
            }
        }

        Self {
            arrivals,
            class_arrivals,
            rejected,
            class_rejected,
            revenue,
            sold,
            sold_out,
            sold_out_all,
        }
    }
}
