//! Availability and choice resolution for one arriving customer
//!
//! # Decision Flow
//!
//! ```text
//! availability (policy) → weights masked by availability → cumulative F
//!   Σw = 0            → rejection (no uniform consumed)
//!   r = parity(u)     → first i with r < F[i]
//!   i = sink          → rejection
//!   bulk: q = quantity(parity(u')); q > remaining → rejection
//!   otherwise         → sale of q units, revenue q·price, sold-out latches
//! ```
//!
//! Rejections are modeled outcomes, never errors. A bulk quantity that does
//! not fit is rejected outright rather than retried at a smaller size.

pub mod availability;
pub mod distribution;

pub use availability::availability;
pub use distribution::ChoiceDistribution;

use crate::antithetic::Parity;
use crate::core::time::TimeHorizon;
use crate::models::catalogue::{Catalogue, ClassId, ProductId};
use crate::models::event::{Event, RejectionReason};
use crate::models::state::ReplicationState;
use crate::rng::UniformSource;
use serde::{Deserialize, Serialize};

/// Which products are offered at a decision instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityPolicy {
    /// Every product with seats left (and not closed by time) is offered
    #[default]
    Independent,
    /// Only the cheapest fare with seats left is offered
    NestedBookingLimit,
}

/// How many units a purchasing customer takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchasePolicy {
    #[default]
    SingleUnit,
    /// 1–4 units with cumulative probabilities 0.55 / 0.85 / 0.95 / 1.0
    Bulk,
}

/// Map a uniform to a bulk purchase quantity.
///
/// ```
/// use seat_simulator_core_rs::choice::bulk_quantity;
///
/// assert_eq!(bulk_quantity(0.10), 1);
/// assert_eq!(bulk_quantity(0.55), 2);
/// assert_eq!(bulk_quantity(0.90), 3);
/// assert_eq!(bulk_quantity(0.95), 4);
/// ```
pub fn bulk_quantity(u: f64) -> u32 {
    if u < 0.55 {
        1
    } else if u < 0.85 {
        2
    } else if u < 0.95 {
        3
    } else {
        4
    }
}

/// Outcome of one arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Purchase { product: ProductId, quantity: u32 },
    Rejected(RejectionReason),
}

/// Availability + choice policies, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChoiceModel {
    availability: AvailabilityPolicy,
    purchase: PurchasePolicy,
}

impl ChoiceModel {
    pub fn new(availability: AvailabilityPolicy, purchase: PurchasePolicy) -> Self {
        Self {
            availability,
            purchase,
        }
    }

    /// Decide what an arriving customer of `class` does at time `t`.
    ///
    /// Reads state only; see [`Self::serve`] for the variant that applies
    /// the outcome.
    #[allow(clippy::too_many_arguments)]
    pub fn decide<S: UniformSource>(
        &self,
        catalogue: &Catalogue,
        state: &ReplicationState,
        horizon: &TimeHorizon,
        t: f64,
        class: ClassId,
        source: &mut S,
        parity: Parity,
    ) -> Decision {
        let open = availability(self.availability, catalogue, &state.inventory, horizon, t);
        let Some(dist) = ChoiceDistribution::build(&catalogue.class(class).weights, &open) else {
            return Decision::Rejected(RejectionReason::NoAvailability);
        };

        let r = parity.apply(source.next_uniform());
        let product = dist.select(r);
        if product == catalogue.sink() {
            return Decision::Rejected(RejectionReason::NoPurchase);
        }

        let quantity = match self.purchase {
            PurchasePolicy::SingleUnit => 1,
            PurchasePolicy::Bulk => bulk_quantity(parity.apply(source.next_uniform())),
        };
        let remaining = catalogue
            .product(product)
            .remaining(state.inventory.sold(product))
            .unwrap_or(u64::MAX);
        if u64::from(quantity) > remaining {
            return Decision::Rejected(RejectionReason::BulkInfeasible {
                requested: quantity,
                remaining: remaining as u32,
            });
        }

        Decision::Purchase { product, quantity }
    }

    /// Decide and apply the outcome to inventory, counters and log.
    #[allow(clippy::too_many_arguments)]
    pub fn serve<S: UniformSource>(
        &self,
        catalogue: &Catalogue,
        state: &mut ReplicationState,
        horizon: &TimeHorizon,
        t: f64,
        class: ClassId,
        source: &mut S,
        parity: Parity,
    ) -> Decision {
        let decision = self.decide(catalogue, state, horizon, t, class, source, parity);
        apply(catalogue, state, t, class, decision);
        decision
    }
}

/// Apply a decision's side effects.
pub fn apply(
    catalogue: &Catalogue,
    state: &mut ReplicationState,
    t: f64,
    class: ClassId,
    decision: Decision,
) {
    match decision {
        Decision::Rejected(reason) => {
            // The sink's sold counter is the rejection counter
            state.inventory.record_sale(catalogue, catalogue.sink(), 1);
            state.registry.increment(state.counters.rejected);
            state.registry.increment(state.counters.class_rejected[class]);
            state.log.log(Event::Rejection {
                time: t,
                class,
                reason,
            });
        }
        Decision::Purchase { product, quantity } => {
            let revenue = i64::from(quantity) * catalogue.product(product).price;
            state.inventory.record_sale(catalogue, product, quantity);
            state
                .registry
                .increment_by(state.counters.sold[product], f64::from(quantity));
            state
                .registry
                .increment_by(state.counters.revenue, revenue as f64);
            state.log.log(Event::Purchase {
                time: t,
                class,
                product,
                quantity,
                revenue,
            });
        }
    }

    let transitions = state.inventory.refresh_sold_out(catalogue);
    for product in transitions.products {
        if let Some(id) = state.counters.sold_out[product] {
            state.registry.increment(id);
        }
        state.log.log(Event::SoldOut { time: t, product });
    }
    if transitions.all {
        state.registry.increment(state.counters.sold_out_all);
        state.log.log(Event::AllSoldOut { time: t });
    }
}
