//! Read-only measures over the counter registry
//!
//! Ratios with a zero denominator evaluate to 0 rather than NaN, so a class
//! that never arrived reports a rejection probability of 0.

use super::counters::{CounterRegistry, CounterSet};
use crate::models::catalogue::{Catalogue, ClassId, ProductId};

#[inline]
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

#[inline]
fn indicator(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else {
        0.0
    }
}

/// Measure accessors for one replication.
pub struct Measures<'a> {
    registry: &'a CounterRegistry,
    counters: &'a CounterSet,
    catalogue: &'a Catalogue,
}

impl<'a> Measures<'a> {
    pub fn new(
        registry: &'a CounterRegistry,
        counters: &'a CounterSet,
        catalogue: &'a Catalogue,
    ) -> Self {
        Self {
            registry,
            counters,
            catalogue,
        }
    }

    /// Rejected arrivals over all arrivals
    pub fn rejection_probability(&self) -> f64 {
        ratio(
            self.registry.value(self.counters.rejected),
            self.registry.value(self.counters.arrivals),
        )
    }

    pub fn class_rejection_probability(&self, class: ClassId) -> f64 {
        ratio(
            self.registry.value(self.counters.class_rejected[class]),
            self.registry.value(self.counters.class_arrivals[class]),
        )
    }

    pub fn total_revenue(&self) -> f64 {
        self.registry.value(self.counters.revenue)
    }

    /// 1 if `product` sold out during the replication, else 0 (always 0 for the sink)
    pub fn product_sold_out(&self, product: ProductId) -> f64 {
        self.counters.sold_out[product]
            .map(|id| indicator(self.registry.value(id)))
            .unwrap_or(0.0)
    }

    /// 1 if every non-sink product sold out, else 0
    pub fn all_sold_out(&self) -> f64 {
        indicator(self.registry.value(self.counters.sold_out_all))
    }

    /// Every measure as `(name, value)` in a stable order.
    pub fn named(&self) -> Vec<(String, f64)> {
        let mut out = vec![("rejection_probability".to_string(), self.rejection_probability())];
        for (id, class) in self.catalogue.classes().iter().enumerate() {
            out.push((
                format!("rejection_probability.{}", class.name),
                self.class_rejection_probability(id),
            ));
        }
        out.push(("total_revenue".to_string(), self.total_revenue()));
        for id in self.catalogue.sellable() {
            out.push((
                format!("sold_out.{}", self.catalogue.product(id).name),
                self.product_sold_out(id),
            ));
        }
        out.push(("sold_out.all".to_string(), self.all_sold_out()));
        out
    }
}
