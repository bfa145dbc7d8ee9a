//! Run configuration shared by the driver, generators, and CLI.

use ledgersim_error::{SimError, SimResult};
use ledgersim_types::{Coin, DEFAULT_DENOM, limits};
use serde::{Deserialize, Serialize};

use crate::LEDGERSIM_SEED;

/// Inclusive `[min, max]` bounds for generated string lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LenBounds {
    /// Smallest length a builder may produce.
    pub min: usize,
    /// Largest length a builder may produce.
    pub max: usize,
}

impl LenBounds {
    /// Builds validated bounds.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] when `min` is zero, `min > max`, or `max`
    /// exceeds [`limits::MAX_METADATA_LEN`].
    pub fn new(min: usize, max: usize) -> SimResult<Self> {
        let bounds = Self { min, max };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Re-checks the invariants, for bounds that arrived via deserialization.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] on the same conditions as [`LenBounds::new`].
    pub fn validate(self) -> SimResult<()> {
        if self.min == 0 {
            return Err(SimError::config("length bounds: min must be at least 1"));
        }
        if self.min > self.max {
            return Err(SimError::config(format!(
                "length bounds: min {} exceeds max {}",
                self.min, self.max
            )));
        }
        if self.max > limits::MAX_METADATA_LEN {
            return Err(SimError::config(format!(
                "length bounds: max {} exceeds field limit {}",
                self.max,
                limits::MAX_METADATA_LEN
            )));
        }
        Ok(())
    }

    /// `true` when `len` lies within the inclusive bounds.
    #[must_use]
    pub const fn contains(self, len: usize) -> bool {
        self.min <= len && len <= self.max
    }
}

impl Default for LenBounds {
    fn default() -> Self {
        Self {
            min: limits::DEFAULT_MIN_METADATA_LEN,
            max: limits::MAX_METADATA_LEN,
        }
    }
}

/// Knobs for one simulation run.
///
/// The driver validates the whole config once at setup; generators may then
/// rely on every field being well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Base seed all RNG streams derive from.
    pub seed: u64,
    /// Number of generator invocations to drive.
    pub invocations: u64,
    /// Chain identifier stamped on every submission envelope.
    pub chain_id: String,
    /// Collection kind the discovery step filters on.
    pub kind_filter: String,
    /// Minimum spendable balance an actor needs to be considered solvent.
    pub min_spendable: Coin,
    /// Length bounds for generated metadata fields.
    pub metadata_len: LenBounds,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: LEDGERSIM_SEED,
            invocations: 256,
            chain_id: "ledgersim-1".to_owned(),
            kind_filter: "credit".to_owned(),
            min_spendable: Coin::new(DEFAULT_DENOM, 1),
            metadata_len: LenBounds::default(),
        }
    }
}

impl SimConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] when a field is empty or the length
    /// bounds are malformed. Setup-time config errors abort the run; they are
    /// never downgraded to skips.
    pub fn validate(&self) -> SimResult<()> {
        if self.chain_id.is_empty() {
            return Err(SimError::config("chain_id must not be empty"));
        }
        if self.kind_filter.is_empty() {
            return Err(SimError::config("kind_filter must not be empty"));
        }
        if self.min_spendable.denom.is_empty() {
            return Err(SimError::config("min_spendable denom must not be empty"));
        }
        self.metadata_len.validate()
    }
}
