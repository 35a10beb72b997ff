//! Product availability at a decision instant
//!
//! A product is sellable when it has seats left and, if time-restricted,
//! the restriction cutoff has not passed. The sink is always available.

use super::AvailabilityPolicy;
use crate::core::time::TimeHorizon;
use crate::models::catalogue::{Catalogue, ProductId};
use crate::models::inventory::InventoryState;

/// Availability flag per product, in catalogue order.
pub fn availability(
    policy: AvailabilityPolicy,
    catalogue: &Catalogue,
    inventory: &InventoryState,
    horizon: &TimeHorizon,
    t: f64,
) -> Vec<bool> {
    match policy {
        AvailabilityPolicy::Independent => independent(catalogue, inventory, horizon, t),
        AvailabilityPolicy::NestedBookingLimit => nested(catalogue, inventory, horizon, t),
    }
}

fn closed_by_time(catalogue: &Catalogue, horizon: &TimeHorizon, id: ProductId, t: f64) -> bool {
    catalogue.product(id).time_restricted && horizon.is_restricted(t)
}

fn independent(
    catalogue: &Catalogue,
    inventory: &InventoryState,
    horizon: &TimeHorizon,
    t: f64,
) -> Vec<bool> {
    (0..catalogue.num_products())
        .map(|id| {
            catalogue.product(id).has_seats(inventory.sold(id))
                && !closed_by_time(catalogue, horizon, id, t)
        })
        .collect()
}

/// Only one bookable product is open at a time. Fares are walked from the
/// cheapest up (equal prices from the later catalogue entry first) and the
/// first one with seats left that is not closed by the restriction cutoff
/// opens. The next dearer fare opens once it sells out.
fn nested(
    catalogue: &Catalogue,
    inventory: &InventoryState,
    horizon: &TimeHorizon,
    t: f64,
) -> Vec<bool> {
    let mut open = vec![false; catalogue.num_products()];
    open[catalogue.sink()] = true;

    let opened = catalogue.fare_ladder().into_iter().find(|&id| {
        catalogue.product(id).has_seats(inventory.sold(id))
            && !closed_by_time(catalogue, horizon, id, t)
    });
    if let Some(id) = opened {
        open[id] = true;
    }
    open
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arrivals::IntensityProfile;
    use crate::models::{CustomerClass, Product};

    fn catalogue() -> Catalogue {
        Catalogue::new(
            vec![
                Product::new("A", 1, 300),
                Product::new("B", 1, 200).with_time_restriction(),
                Product::new("C", 1, 100),
                Product::sink("reject"),
            ],
            vec![CustomerClass::new(
                "walk-in",
                vec![1.0; 4],
                IntensityProfile::Constant { rate: 1.0 },
            )],
        )
        .unwrap()
    }

    #[test]
    fn test_independent_closes_restricted_after_cutoff() {
        let catalogue = catalogue();
        let inventory = InventoryState::new(4);
        let horizon = TimeHorizon::new(10.0, 2.0);

        let before = availability(AvailabilityPolicy::Independent, &catalogue, &inventory, &horizon, 8.0);
        let after = availability(AvailabilityPolicy::Independent, &catalogue, &inventory, &horizon, 8.5);

        assert_eq!(before, vec![true, true, true, true]);
        assert_eq!(after, vec![true, false, true, true]);
    }

    #[test]
    fn test_nested_opens_only_cheapest_fare_with_seats() {
        let catalogue = catalogue();
        let mut inventory = InventoryState::new(4);
        let horizon = TimeHorizon::new(10.0, 2.0);

        let open = availability(AvailabilityPolicy::NestedBookingLimit, &catalogue, &inventory, &horizon, 1.0);
        assert_eq!(open, vec![false, false, true, true]);

        inventory.record_sale(&catalogue, 2, 1);
        let open = availability(AvailabilityPolicy::NestedBookingLimit, &catalogue, &inventory, &horizon, 1.0);
        assert_eq!(open, vec![false, true, false, true]);
    }

    #[test]
    fn test_nested_skips_restricted_product_and_keeps_scanning() {
        let catalogue = catalogue();
        let mut inventory = InventoryState::new(4);
        let horizon = TimeHorizon::new(10.0, 2.0);
        inventory.record_sale(&catalogue, 2, 1);

        let open = availability(AvailabilityPolicy::NestedBookingLimit, &catalogue, &inventory, &horizon, 9.0);
        assert_eq!(open, vec![true, false, false, true]);
    }

    #[test]
    fn test_nested_reaches_first_product() {
        let catalogue = catalogue();
        let mut inventory = InventoryState::new(4);
        let horizon = TimeHorizon::new(10.0, 2.0);
        inventory.record_sale(&catalogue, 2, 1);
        inventory.record_sale(&catalogue, 1, 1);

        let open = availability(AvailabilityPolicy::NestedBookingLimit, &catalogue, &inventory, &horizon, 1.0);
        assert_eq!(open, vec![true, false, false, true]);

        inventory.record_sale(&catalogue, 0, 1);
        let open = availability(AvailabilityPolicy::NestedBookingLimit, &catalogue, &inventory, &horizon, 1.0);
        assert_eq!(open, vec![false, false, false, true]);
    }

    fn two_fares(products: Vec<Product>) -> Catalogue {
        Catalogue::new(
            products,
            vec![CustomerClass::new(
                "walk-in",
                vec![1.0; 3],
                IntensityProfile::Constant { rate: 1.0 },
            )],
        )
        .unwrap()
    }

    #[test]
    fn test_nested_follows_price_not_catalogue_position() {
        let horizon = TimeHorizon::new(10.0, 2.0);
        let premium_first = two_fares(vec![
            Product::new("premium", 1, 900),
            Product::new("cheap", 1, 100),
            Product::sink("reject"),
        ]);
        let cheap_first = two_fares(vec![
            Product::new("cheap", 1, 100),
            Product::new("premium", 1, 900),
            Product::sink("reject"),
        ]);

        let mut inventory = InventoryState::new(3);
        let open = availability(AvailabilityPolicy::NestedBookingLimit, &premium_first, &inventory, &horizon, 1.0);
        assert_eq!(open, vec![false, true, true]);
        inventory.record_sale(&premium_first, 1, 1);
        let open = availability(AvailabilityPolicy::NestedBookingLimit, &premium_first, &inventory, &horizon, 1.0);
        assert_eq!(open, vec![true, false, true]);

        let mut inventory = InventoryState::new(3);
        let open = availability(AvailabilityPolicy::NestedBookingLimit, &cheap_first, &inventory, &horizon, 1.0);
        assert_eq!(open, vec![true, false, true]);
        inventory.record_sale(&cheap_first, 0, 1);
        let open = availability(AvailabilityPolicy::NestedBookingLimit, &cheap_first, &inventory, &horizon, 1.0);
        assert_eq!(open, vec![false, true, true]);
    }

    #[test]
    fn test_fare_ladder_breaks_price_ties_by_later_entry() {
        let catalogue = two_fares(vec![
            Product::new("early", 1, 100),
            Product::new("late", 1, 100),
            Product::sink("reject"),
        ]);
        assert_eq!(catalogue.fare_ladder(), vec![1, 0]);
    }
}
