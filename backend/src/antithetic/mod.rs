//! Antithetic replication pairing (common random numbers)
//!
//! Replications are paired `(2k, 2k+1)`. Entering an even replication draws a
//! fresh seed from the current generator and stores it; the following odd
//! replication re-seeds from that stored seed, so both runs see the exact same
//! raw uniform stream. The odd run consumes `1 − u` wherever the even run
//! consumed `u`, which negatively correlates their outputs.
//!
//! ```text
//!   begin(0): Even  seed₀ = rng.next_seed()  rng ← seed₀
//!   begin(1): Odd                            rng ← seed₀   (same stream)
//!   begin(2): Even  seed₁ = rng.next_seed()  rng ← seed₁
//!   begin(3): Odd                            rng ← seed₁
//! ```
//!
//! Pairs must run in order on one worker, or the state must travel with a
//! [`ReplicationHandoff`] before the odd replication starts.

mod handoff;

pub use handoff::{HandoffError, ReplicationHandoff};

use crate::rng::{RngManager, UniformSource};
use serde::{Deserialize, Serialize};

/// Which half of an antithetic pair a replication is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parity {
    /// Consumes raw uniforms `u`.
    Even,
    /// Consumes complemented uniforms `1 − u`.
    Odd,
}

impl Parity {
    /// Apply the antithetic transform to a raw uniform.
    ///
    /// ```
    /// use seat_simulator_core_rs::antithetic::Parity;
    ///
    /// assert_eq!(Parity::Even.apply(0.3), 0.3);
    /// assert_eq!(Parity::Odd.apply(0.25), 0.75);
    /// ```
    #[inline]
    pub fn apply(self, u: f64) -> f64 {
        match self {
            Parity::Even => u,
            Parity::Odd => 1.0 - u,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Parity::Even => Parity::Odd,
            Parity::Odd => Parity::Even,
        }
    }

    pub fn is_even(self) -> bool {
        self == Parity::Even
    }
}

/// How consecutive replications relate to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplicationPairing {
    /// Pair replications on a shared stream with complemented draws.
    #[default]
    Antithetic,
    /// Fresh seed every replication, raw draws only.
    Independent,
}

/// What a replication was started with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplicationTicket {
    /// Zero-based replication index
    pub index: u64,
    /// Parity applied to every draw of this replication
    pub parity: Parity,
    /// Seed the replication's generator was created from
    pub seed: u64,
}

/// Two-state machine owning the uniform stream across replications.
///
/// # Example
/// ```
/// use seat_simulator_core_rs::antithetic::{AntitheticController, Parity, ReplicationPairing};
///
/// let mut controller = AntitheticController::new(42, ReplicationPairing::Antithetic);
/// let even = controller.begin_replication();
/// let odd = controller.begin_replication();
///
/// assert_eq!(even.parity, Parity::Even);
/// assert_eq!(odd.parity, Parity::Odd);
/// assert_eq!(even.seed, odd.seed);
/// ```
#[derive(Debug, Clone)]
pub struct AntitheticController {
    pairing: ReplicationPairing,
    /// Parity of the replication currently running (Odd before the first one)
    parity: Parity,
    /// Seed captured on entry to the last even replication
    stored_seed: u64,
    rng: RngManager,
    replications_started: u64,
}

impl AntitheticController {
    /// Create a controller whose first even replication draws its seed from
    /// a generator seeded with `seed`.
    pub fn new(seed: u64, pairing: ReplicationPairing) -> Self {
        Self {
            pairing,
            parity: Parity::Odd,
            stored_seed: seed,
            rng: RngManager::new(seed),
            replications_started: 0,
        }
    }

    /// Advance to the next replication: flip parity and re-seed the stream.
    pub fn begin_replication(&mut self) -> ReplicationTicket {
        match self.pairing {
            ReplicationPairing::Antithetic => {
                self.parity = self.parity.flipped();
                if self.parity.is_even() {
                    self.stored_seed = self.rng.next_seed();
                }
            }
            ReplicationPairing::Independent => {
                self.parity = Parity::Even;
                self.stored_seed = self.rng.next_seed();
            }
        }
        self.rng = RngManager::new(self.stored_seed);

        let ticket = ReplicationTicket {
            index: self.replications_started,
            parity: self.parity,
            seed: self.stored_seed,
        };
        self.replications_started += 1;
        ticket
    }

    /// Parity every variate draw of the current replication must use.
    pub fn parity(&self) -> Parity {
        self.parity
    }

    pub fn pairing(&self) -> ReplicationPairing {
        self.pairing
    }

    pub fn stored_seed(&self) -> u64 {
        self.stored_seed
    }

    pub fn replications_started(&self) -> u64 {
        self.replications_started
    }

    /// Raw stream of the current replication.
    pub fn rng_mut(&mut self) -> &mut RngManager {
        &mut self.rng
    }

    /// Parity-transformed uniform from the current stream.
    pub fn next_transformed(&mut self) -> f64 {
        self.parity.apply(self.rng.next_uniform())
    }

    /// Export the state another worker needs to continue the sequence.
    pub fn handoff(&self, experiment_id: uuid::Uuid, config_digest: &str) -> ReplicationHandoff {
        ReplicationHandoff {
            experiment_id,
            config_digest: config_digest.to_string(),
            next_replication: self.replications_started,
            pairing: self.pairing,
            parity: self.parity,
            stored_seed: self.stored_seed,
            rng_state: self.rng.get_state(),
        }
    }

    /// Rebuild a controller from a hand-off produced by [`Self::handoff`].
    ///
    /// # Errors
    /// Fails when the hand-off belongs to another experiment or configuration.
    pub fn resume(
        handoff: &ReplicationHandoff,
        experiment_id: uuid::Uuid,
        config_digest: &str,
    ) -> Result<Self, HandoffError> {
        handoff.verify(experiment_id, config_digest)?;
        Ok(Self {
            pairing: handoff.pairing,
            parity: handoff.parity,
            stored_seed: handoff.stored_seed,
            rng: RngManager::new(handoff.rng_state),
            replications_started: handoff.next_replication,
        })
    }
}
