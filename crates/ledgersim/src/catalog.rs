//! Weighted operation catalog and seeded selection.
//!
//! The catalog is an immutable value built once at setup and passed to the
//! driver. Registration problems (zero weights, duplicate kinds) are
//! configuration errors that abort setup; selection itself is infallible.

use std::fmt;

use ledgersim_error::{SimError, SimResult};
use rand::Rng;
use rand::rngs::StdRng;

use crate::env::SimEnv;
use crate::outcome::Outcome;

/// A generator invocation: draws randomness, inspects the environment,
/// returns exactly one outcome.
pub type Generator = Box<dyn Fn(&mut StdRng, &SimEnv<'_>) -> Outcome + Send + Sync>;

/// One registered operation kind with its selection weight and generator.
pub struct CatalogEntry {
    kind: &'static str,
    weight: u32,
    generator: Generator,
}

impl CatalogEntry {
    /// Registers `generator` under `kind` with relative `weight`.
    #[must_use]
    pub fn new<F>(kind: &'static str, weight: u32, generator: F) -> Self
    where
        F: Fn(&mut StdRng, &SimEnv<'_>) -> Outcome + Send + Sync + 'static,
    {
        Self {
            kind,
            weight,
            generator: Box::new(generator),
        }
    }

    /// Stable kind code of this entry.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        self.kind
    }

    /// Relative selection weight of this entry.
    #[must_use]
    pub const fn weight(&self) -> u32 {
        self.weight
    }

    /// Runs the generator once.
    #[must_use]
    pub fn run(&self, rng: &mut StdRng, env: &SimEnv<'_>) -> Outcome {
        (self.generator)(rng, env)
    }
}

impl fmt::Debug for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogEntry")
            .field("kind", &self.kind)
            .field("weight", &self.weight)
            .finish_non_exhaustive()
    }
}

/// Immutable weighted catalog of operation generators.
///
/// Selection frequency of each entry converges on `weight / total_weight`
/// over a run; a weight-0 entry would never fire, so construction rejects it
/// outright rather than letting a kind silently drop out of the mix.
#[derive(Debug)]
pub struct OperationCatalog {
    entries: Vec<CatalogEntry>,
    total_weight: u32,
}

impl OperationCatalog {
    /// Validates and seals a set of entries.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidWeight`] for a zero weight,
    /// [`SimError::DuplicateKind`] for a kind registered twice, and
    /// [`SimError::Config`] for an empty catalog or a weight sum that
    /// overflows `u32`.
    pub fn new(entries: Vec<CatalogEntry>) -> SimResult<Self> {
        if entries.is_empty() {
            return Err(SimError::config(
                "operation catalog must register at least one kind",
            ));
        }
        let mut total_weight = 0u32;
        for (i, entry) in entries.iter().enumerate() {
            if entry.weight == 0 {
                return Err(SimError::InvalidWeight {
                    kind: entry.kind.to_owned(),
                    weight: entry.weight,
                });
            }
            if entries[..i].iter().any(|prior| prior.kind == entry.kind) {
                return Err(SimError::DuplicateKind {
                    kind: entry.kind.to_owned(),
                });
            }
            total_weight = total_weight.checked_add(entry.weight).ok_or_else(|| {
                SimError::config("operation catalog weights overflow u32")
            })?;
        }
        Ok(Self {
            entries,
            total_weight,
        })
    }

    /// Draws one entry; probability of each is `weight / total_weight`.
    #[must_use]
    pub fn select(&self, rng: &mut StdRng) -> &CatalogEntry {
        // Walk the cumulative weights. `new` guarantees a non-empty entry
        // list and total_weight > 0, so the walk lands inside the slice.
        let mut roll = rng.gen_range(0..self.total_weight);
        for entry in &self.entries {
            if roll < entry.weight {
                return entry;
            }
            roll -= entry.weight;
        }
        unreachable!("roll < total_weight, the cumulative walk covers it")
    }

    /// Sum of all entry weights.
    #[must_use]
    pub const fn total_weight(&self) -> u32 {
        self.total_weight
    }

    /// Registered entries, in registration order.
    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Number of registered kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false` for a constructed catalog; kept for slice-like symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered kind codes, in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.kind)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::outcome::SkipReason;

    fn skip_entry(kind: &'static str, weight: u32) -> CatalogEntry {
        CatalogEntry::new(kind, weight, |_rng, _env| {
            Outcome::Skip(SkipReason::NoMatchingCollection)
        })
    }

    #[test]
    fn empty_catalog_is_a_config_error() {
        let err = OperationCatalog::new(Vec::new()).unwrap_err();
        assert!(matches!(err, SimError::Config { .. }));
        assert!(err.is_setup_fatal());
    }

    #[test]
    fn zero_weight_is_rejected() {
        let err = OperationCatalog::new(vec![skip_entry("noop", 0)]).unwrap_err();
        match err {
            SimError::InvalidWeight { kind, weight } => {
                assert_eq!(kind, "noop");
                assert_eq!(weight, 0);
            }
            other => panic!("expected InvalidWeight, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_kind_is_rejected() {
        let entries = vec![skip_entry("noop", 10), skip_entry("noop", 20)];
        let err = OperationCatalog::new(entries).unwrap_err();
        assert!(matches!(err, SimError::DuplicateKind { kind } if kind == "noop"));
    }

    #[test]
    fn weight_overflow_is_rejected() {
        let entries = vec![skip_entry("a", u32::MAX), skip_entry("b", 1)];
        let err = OperationCatalog::new(entries).unwrap_err();
        assert!(matches!(err, SimError::Config { .. }));
    }

    #[test]
    fn total_weight_sums_entries() {
        let catalog =
            OperationCatalog::new(vec![skip_entry("a", 30), skip_entry("b", 20)]).unwrap();
        assert_eq!(catalog.total_weight(), 50);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.kinds().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn selection_is_deterministic_per_seed() {
        let catalog = OperationCatalog::new(vec![
            skip_entry("a", 30),
            skip_entry("b", 30),
            skip_entry("c", 20),
        ])
        .unwrap();

        let draw = |seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..32)
                .map(|_| catalog.select(&mut rng).kind())
                .collect::<Vec<_>>()
        };
        assert_eq!(draw(42), draw(42));
    }

    #[test]
    fn selection_honours_weights_within_tolerance() {
        let catalog = OperationCatalog::new(vec![
            skip_entry("heavy", 30),
            skip_entry("light", 10),
        ])
        .unwrap();

        let mut rng = StdRng::seed_from_u64(crate::LEDGERSIM_SEED);
        let draws = 40_000_usize;
        let heavy = (0..draws)
            .filter(|_| catalog.select(&mut rng).kind() == "heavy")
            .count();

        // Expected 3/4 of draws; allow a 2% absolute band around it.
        let expected = draws * 3 / 4;
        let band = draws / 50;
        assert!(
            heavy.abs_diff(expected) <= band,
            "heavy drawn {heavy} times, expected {expected} within {band}"
        );
    }
}
