//! Entity discovery: drawing a live target from service state.
//!
//! Discovery always queries fresh state and draws uniformly among the
//! returned candidates. Absence of candidates is a skip, not a failure;
//! query errors propagate unchanged.

use ledgersim_error::SimResult;
use rand::Rng;
use rand::rngs::StdRng;

use crate::env::StateQuery;
use crate::outcome::SkipReason;
use crate::pipeline::Gate;
use ledgersim_types::{Collection, Record};

/// Draws one collection of the given kind.
///
/// Skips with [`SkipReason::NoMatchingCollection`] when none exist.
///
/// # Errors
///
/// Propagates [`StateQuery::collections`] failures.
pub fn find_random_collection(
    rng: &mut StdRng,
    query: &dyn StateQuery,
    kind: &str,
) -> SimResult<Gate<Collection>> {
    let mut candidates = query.collections(kind)?;
    if candidates.is_empty() {
        return Ok(Gate::Skip(SkipReason::NoMatchingCollection));
    }
    let idx = rng.gen_range(0..candidates.len());
    Ok(Gate::Pass(candidates.swap_remove(idx)))
}

/// Draws one record in two levels: first a collection of the given kind,
/// then a record inside it.
///
/// Skips with [`SkipReason::NoMatchingCollection`] when no collection
/// matches, and with [`SkipReason::NoChildRecord`] when the drawn collection
/// is empty. Only the drawn collection is inspected; a record in some other
/// collection never rescues the invocation.
///
/// # Errors
///
/// Propagates [`StateQuery`] failures from either level.
pub fn find_random_record(
    rng: &mut StdRng,
    query: &dyn StateQuery,
    kind: &str,
) -> SimResult<Gate<(Collection, Record)>> {
    let collection = match find_random_collection(rng, query, kind)? {
        Gate::Pass(collection) => collection,
        Gate::Skip(reason) => return Ok(Gate::Skip(reason)),
    };
    let mut records = query.records(&collection.id)?;
    if records.is_empty() {
        return Ok(Gate::Skip(SkipReason::NoChildRecord));
    }
    let idx = rng.gen_range(0..records.len());
    Ok(Gate::Pass((collection, records.swap_remove(idx))))
}
