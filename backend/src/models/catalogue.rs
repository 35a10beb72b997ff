//! Fare products and customer classes
//!
//! # Critical Invariants
//!
//! 1. **Single Sink**: exactly one product has unbounded capacity; it is the
//!    no-purchase outcome, has price 0 and is never time-restricted
//! 2. **Weight Shape**: every class has one non-negative, finite weight per
//!    product, not all zero
//! 3. **Majorant**: every class has a positive, finite rate bound

use crate::arrivals::{IntensityProfile, NormalParams};
use crate::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Index into [`Catalogue::products`]
pub type ProductId = usize;

/// Index into [`Catalogue::classes`]
pub type ClassId = usize;

/// A sellable fare product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,

    /// Seats available; `None` marks the unbounded no-purchase sink
    pub capacity: Option<u32>,

    /// Unit price (integer currency units)
    pub price: i64,

    /// Closed once the restriction cutoff has passed
    #[serde(default)]
    pub time_restricted: bool,
}

impl Product {
    /// Bounded product with the given capacity and price.
    pub fn new(name: &str, capacity: u32, price: i64) -> Self {
        Self {
            name: name.to_string(),
            capacity: Some(capacity),
            price,
            time_restricted: false,
        }
    }

    /// The no-purchase sink.
    pub fn sink(name: &str) -> Self {
        Self {
            name: name.to_string(),
            capacity: None,
            price: 0,
            time_restricted: false,
        }
    }

    pub fn with_time_restriction(mut self) -> Self {
        self.time_restricted = true;
        self
    }

    pub fn is_sink(&self) -> bool {
        self.capacity.is_none()
    }

    /// Seats left after `sold` units (`None` for the sink).
    pub fn remaining(&self, sold: u64) -> Option<u64> {
        self.capacity.map(|cap| u64::from(cap).saturating_sub(sold))
    }

    /// Whether another unit can be sold after `sold` units.
    pub fn has_seats(&self, sold: u64) -> bool {
        match self.capacity {
            Some(cap) => sold < u64::from(cap),
            None => true,
        }
    }
}

/// A customer segment with its own preferences and arrival intensity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerClass {
    pub name: String,

    /// Unnormalized choice weight per product, in catalogue order
    pub weights: Vec<f64>,

    pub intensity: IntensityProfile,

    /// Thinning majorant; defaults to the profile's own bound
    #[serde(default)]
    pub rate_bound: Option<f64>,

    /// Required when gaps are drawn from the normal process
    #[serde(default)]
    pub normal: Option<NormalParams>,
}

impl CustomerClass {
    pub fn new(name: &str, weights: Vec<f64>, intensity: IntensityProfile) -> Self {
        Self {
            name: name.to_string(),
            weights,
            intensity,
            rate_bound: None,
            normal: None,
        }
    }

    pub fn with_normal(mut self, mu: f64, sigma: f64) -> Self {
        self.normal = Some(NormalParams { mu, sigma });
        self
    }

    pub fn with_rate_bound(mut self, bound: f64) -> Self {
        self.rate_bound = Some(bound);
        self
    }

    /// Majorant used for thinning.
    pub fn effective_rate_bound(&self) -> f64 {
        self.rate_bound.unwrap_or_else(|| self.intensity.majorant())
    }
}

/// Validated products and classes.
///
/// # Example
///
/// ```rust
/// use seat_simulator_core_rs::arrivals::IntensityProfile;
/// use seat_simulator_core_rs::models::{Catalogue, CustomerClass, Product};
///
/// let catalogue = Catalogue::new(
///     vec![Product::new("A", 5, 100), Product::sink("reject")],
///     vec![CustomerClass::new(
///         "walk-in",
///         vec![3.0, 1.0],
///         IntensityProfile::Constant { rate: 1.0 },
///     )],
/// )
/// .unwrap();
///
/// assert_eq!(catalogue.sink(), 1);
/// assert_eq!(catalogue.num_products(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Catalogue {
    products: Vec<Product>,
    classes: Vec<CustomerClass>,
    sink: ProductId,
}

impl Catalogue {
    /// Validate and assemble a catalogue.
    ///
    /// # Errors
    /// Any violated catalogue invariant, reported as a [`ConfigError`].
    pub fn new(products: Vec<Product>, classes: Vec<CustomerClass>) -> Result<Self, ConfigError> {
        if products.is_empty() {
            return Err(ConfigError::EmptyCatalogue);
        }
        if classes.is_empty() {
            return Err(ConfigError::NoCustomerClasses);
        }

        let sinks: Vec<ProductId> = products
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_sink())
            .map(|(i, _)| i)
            .collect();
        let sink = match sinks.as_slice() {
            [] => return Err(ConfigError::MissingSink),
            [only] => *only,
            _ => {
                return Err(ConfigError::MultipleSinks(
                    sinks.iter().map(|&i| products[i].name.clone()).collect(),
                ))
            }
        };
        let sink_product = &products[sink];
        if sink_product.price != 0 {
            return Err(ConfigError::PricedSink(sink_product.name.clone()));
        }
        if sink_product.time_restricted {
            return Err(ConfigError::RestrictedSink(sink_product.name.clone()));
        }
        if let Some(p) = products.iter().find(|p| p.price < 0) {
            return Err(ConfigError::NegativePrice(p.name.clone()));
        }

        for class in &classes {
            Self::validate_class(class, &products)?;
        }

        Ok(Self {
            products,
            classes,
            sink,
        })
    }

    fn validate_class(class: &CustomerClass, products: &[Product]) -> Result<(), ConfigError> {
        if class.weights.len() != products.len() {
            return Err(ConfigError::WeightLengthMismatch {
                class: class.name.clone(),
                expected: products.len(),
                found: class.weights.len(),
            });
        }
        if let Some((i, &w)) = class
            .weights
            .iter()
            .enumerate()
            .find(|(_, w)| !(w.is_finite() && **w >= 0.0))
        {
            return Err(ConfigError::InvalidWeight {
                class: class.name.clone(),
                product: products[i].name.clone(),
                weight: w,
            });
        }
        if class.weights.iter().all(|&w| w == 0.0) {
            return Err(ConfigError::AllZeroWeights(class.name.clone()));
        }
        if !class.intensity.parameters_valid() {
            return Err(ConfigError::InvalidIntensity(class.name.clone()));
        }
        let bound = class.effective_rate_bound();
        if !(bound > 0.0 && bound.is_finite()) {
            return Err(ConfigError::NonPositiveRateBound {
                class: class.name.clone(),
                bound,
            });
        }
        if let Some(NormalParams { mu, sigma }) = class.normal {
            let degenerate = sigma == 0.0 && mu <= 0.0;
            if !mu.is_finite() || !sigma.is_finite() || sigma < 0.0 || degenerate {
                return Err(ConfigError::InvalidNormalParams {
                    class: class.name.clone(),
                    mu,
                    sigma,
                });
            }
        }
        Ok(())
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn product(&self, id: ProductId) -> &Product {
        &self.products[id]
    }

    pub fn classes(&self) -> &[CustomerClass] {
        &self.classes
    }

    pub fn class(&self, id: ClassId) -> &CustomerClass {
        &self.classes[id]
    }

    /// Index of the no-purchase sink
    pub fn sink(&self) -> ProductId {
        self.sink
    }

    pub fn num_products(&self) -> usize {
        self.products.len()
    }

    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    /// Ids of every product except the sink, in catalogue order
    pub fn sellable(&self) -> impl Iterator<Item = ProductId> + '_ {
        (0..self.products.len()).filter(move |&i| i != self.sink)
    }

    /// Sellable ids ordered by price ascending; equal prices keep the later
    /// catalogue entry first.
    pub fn fare_ladder(&self) -> Vec<ProductId> {
        let mut ladder: Vec<ProductId> = self.sellable().collect();
        ladder.sort_by_key(|&id| (self.products[id].price, std::cmp::Reverse(id)));
        ladder
    }
}
