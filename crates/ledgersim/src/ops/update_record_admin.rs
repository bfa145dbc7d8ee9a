//! Generator: hand a randomly drawn record to another harness account.

use rand::rngs::StdRng;

use crate::env::SimEnv;
use crate::gate;
use crate::operation::{Operation, RequestPayload};
use crate::outcome::{Outcome, SkipReason, Stage};
use crate::{discovery, dispatch, pipeline, rand_util, validate};

/// Relative catalog weight.
pub const WEIGHT: u32 = 30;

/// Runs one invocation of this generator.
///
/// The replacement controller is drawn from the harness account pool, so a
/// successful transfer keeps the record actionable on later invocations.
pub fn generate(rng: &mut StdRng, env: &SimEnv<'_>) -> Outcome {
    let (_collection, record) = gate!(
        Stage::Discover,
        discovery::find_random_record(rng, env.query, &env.config.kind_filter)
    );
    let actor = gate!(
        Stage::Validate,
        validate::validate_controller(
            &record.admin,
            "record admin",
            env.keeper,
            &env.config.min_spendable,
        )
    );
    // No candidate pool means there is no account to hand over to.
    let Some(candidate) = rand_util::pick(rng, env.accounts) else {
        return Outcome::Skip(SkipReason::NoControllableAccount);
    };
    if candidate.address == actor.account.address {
        return Outcome::Skip(SkipReason::SameController);
    }
    let operation = Operation::new(
        actor.account.address.clone(),
        RequestPayload::UpdateRecordAdmin {
            record: record.id,
            new_admin: candidate.address.clone(),
        },
    );
    pipeline::classify_submission(dispatch::submit_operation(rng, operation, &actor, env))
}
