//! Generator: hand a randomly drawn collection to another harness account.

use rand::rngs::StdRng;

use crate::env::SimEnv;
use crate::gate;
use crate::operation::{Operation, RequestPayload};
use crate::outcome::{Outcome, SkipReason, Stage};
use crate::{discovery, dispatch, pipeline, rand_util, validate};

/// Relative catalog weight.
pub const WEIGHT: u32 = 30;

/// Runs one invocation of this generator.
pub fn generate(rng: &mut StdRng, env: &SimEnv<'_>) -> Outcome {
    let collection = gate!(
        Stage::Discover,
        discovery::find_random_collection(rng, env.query, &env.config.kind_filter)
    );
    let actor = gate!(
        Stage::Validate,
        validate::validate_controller(
            &collection.admin,
            "collection admin",
            env.keeper,
            &env.config.min_spendable,
        )
    );
    let Some(candidate) = rand_util::pick(rng, env.accounts) else {
        return Outcome::Skip(SkipReason::NoControllableAccount);
    };
    if candidate.address == actor.account.address {
        return Outcome::Skip(SkipReason::SameController);
    }
    let operation = Operation::new(
        actor.account.address.clone(),
        RequestPayload::UpdateCollectionAdmin {
            collection: collection.id,
            new_admin: candidate.address.clone(),
        },
    );
    pipeline::classify_submission(dispatch::submit_operation(rng, operation, &actor, env))
}
