//! Generator: replace the metadata of a randomly drawn collection.

use rand::rngs::StdRng;

use crate::env::SimEnv;
use crate::gate;
use crate::operation::{Operation, RequestPayload};
use crate::outcome::{Outcome, Stage};
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
    let metadata = rand_util::rand_metadata(rng, env.config.metadata_len);
    let operation = Operation::new(
        actor.account.address.clone(),
        RequestPayload::UpdateCollectionMetadata {
            collection: collection.id,
            metadata,
        },
    );
    pipeline::classify_submission(dispatch::submit_operation(rng, operation, &actor, env))
}
