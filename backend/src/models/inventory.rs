//! Seat inventory of one replication
//!
//! # Critical Invariants
//!
//! 1. **Capacity**: `sold[i] <= capacity[i]` for every bounded product
//! 2. **Monotonicity**: `sold[i]` never decreases within a replication
//! 3. **Sold-out Latches**: a product's sold-out flag, and the all-sold-out
//!    flag, are raised at most once per replication

use crate::models::catalogue::{Catalogue, ProductId};

/// Products whose sold-out status changed after a sale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoldOutTransitions {
    /// Products that just reached capacity
    pub products: Vec<ProductId>,
    /// Every non-sink product is now sold out (first time this replication)
    pub all: bool,
}

/// Units sold per product plus sold-out latches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryState {
    sold: Vec<u64>,
    sold_out: Vec<bool>,
    all_sold_out: bool,
}

impl InventoryState {
    pub fn new(num_products: usize) -> Self {
        Self {
            sold: vec![0; num_products],
            sold_out: vec![false; num_products],
            all_sold_out: false,
        }
    }

    /// Start-of-replication state: nothing sold, nothing latched.
    pub fn reset(&mut self) {
        self.sold.iter_mut().for_each(|s| *s = 0);
        self.sold_out.iter_mut().for_each(|s| *s = false);
        self.all_sold_out = false;
    }

    pub fn sold(&self, product: ProductId) -> u64 {
        self.sold[product]
    }

    pub fn sold_all(&self) -> &[u64] {
        &self.sold
    }

    pub fn is_sold_out(&self, product: ProductId) -> bool {
        self.sold_out[product]
    }

    pub fn all_sold_out(&self) -> bool {
        self.all_sold_out
    }

    /// Record `quantity` units against `product`.
    ///
    /// # Panics
    /// Panics if the sale would exceed the product's capacity. The choice
    /// model checks remaining seats before calling this.
    pub fn record_sale(&mut self, catalogue: &Catalogue, product: ProductId, quantity: u32) {
        let after = self.sold[product] + u64::from(quantity);
        if let Some(cap) = catalogue.product(product).capacity {
            assert!(
                after <= u64::from(cap),
                "sale of {} units of {} exceeds capacity {}",
                quantity,
                catalogue.product(product).name,
                cap
            );
        }
        self.sold[product] = after;
    }

    /// Re-evaluate sold-out status of every non-sink product and latch new
    /// transitions.
    pub fn refresh_sold_out(&mut self, catalogue: &Catalogue) -> SoldOutTransitions {
        let mut transitions = SoldOutTransitions::default();
        let mut all = true;

        for id in catalogue.sellable() {
            let full = !catalogue.product(id).has_seats(self.sold[id]);
            if full && !self.sold_out[id] {
                self.sold_out[id] = true;
                transitions.products.push(id);
            }
            all &= full;
        }

        if all && !self.all_sold_out {
            self.all_sold_out = true;
            transitions.all = true;
        }
        transitions
    }
}
