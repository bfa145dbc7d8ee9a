//! Dispatch: wrapping a built operation into a submission envelope.
//!
//! The envelope carries everything delivery needs besides the operation
//! itself: chain id, encoding context, the acting controller, and a fee drawn
//! from the actor's validated balance snapshot.

use ledgersim_error::SimResult;
use ledgersim_types::{Address, Coin, Coins};
use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::env::SimEnv;
use crate::operation::Operation;
use crate::validate::Actor;

/// Schema tag stamped on every envelope.
pub const ENVELOPE_SCHEMA_V1: &str = "ledgersim.envelope.v1";

/// Encoding context recorded on the envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecSpec {
    /// Wire format of the payload.
    pub format: String,
    /// Envelope schema version.
    pub schema_version: String,
}

impl Default for CodecSpec {
    fn default() -> Self {
        Self {
            format: "json".to_owned(),
            schema_version: ENVELOPE_SCHEMA_V1.to_owned(),
        }
    }
}

/// A finished submission: one operation plus its delivery context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitEnvelope {
    /// Chain the envelope is addressed to.
    pub chain_id: String,
    /// Encoding context.
    pub codec: CodecSpec,
    /// Account the envelope is signed as.
    pub actor: Address,
    /// Fee drawn against the actor's spendable balance.
    pub fee: Coin,
    /// The operation being submitted.
    pub operation: Operation,
}

/// Draws a fee in `denom`, uniform over `0..=spendable`.
///
/// A zero balance yields a zero fee rather than an error; solvency gating
/// happened during validation.
#[must_use]
pub fn random_fee(rng: &mut StdRng, spendable: &Coins, denom: &str) -> Coin {
    let cap = spendable.amount_of(denom);
    if cap == 0 {
        return Coin::new(denom, 0);
    }
    Coin::new(denom, rng.gen_range(0..=cap))
}

/// Wraps `operation` into an envelope and delivers it.
///
/// Returns the operation back on acceptance so the caller can record what
/// was applied.
///
/// # Errors
///
/// Propagates delivery failures verbatim; the rejection cause is never
/// rewritten here.
pub fn submit_operation(
    rng: &mut StdRng,
    operation: Operation,
    actor: &Actor,
    env: &SimEnv<'_>,
) -> SimResult<Operation> {
    let fee = random_fee(rng, &actor.spendable, &env.config.min_spendable.denom);
    let envelope = SubmitEnvelope {
        chain_id: env.config.chain_id.clone(),
        codec: CodecSpec::default(),
        actor: operation.actor.clone(),
        fee,
        operation,
    };
    trace!(
        kind = envelope.operation.kind(),
        target = envelope.operation.target(),
        fee = %envelope.fee,
        "delivering envelope"
    );
    env.submitter.deliver(&envelope)?;
    Ok(envelope.operation)
}

#[cfg(test)]
mod tests {
    use ledgersim_types::DEFAULT_DENOM;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn fee_never_exceeds_spendable() {
        let spendable = Coins::from_coins([Coin::new(DEFAULT_DENOM, 250)]);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..256 {
            let fee = random_fee(&mut rng, &spendable, DEFAULT_DENOM);
            assert!(fee.amount <= 250);
            assert_eq!(fee.denom, DEFAULT_DENOM);
        }
    }

    #[test]
    fn zero_balance_draws_zero_fee() {
        let mut rng = StdRng::seed_from_u64(4);
        let fee = random_fee(&mut rng, &Coins::new(), DEFAULT_DENOM);
        assert!(fee.is_zero());
    }

    #[test]
    fn fee_uses_the_configured_denom_only() {
        let spendable = Coins::from_coins([Coin::new("voucher", 9_000)]);
        let mut rng = StdRng::seed_from_u64(5);
        let fee = random_fee(&mut rng, &spendable, DEFAULT_DENOM);
        assert!(fee.is_zero());
        assert_eq!(fee.denom, DEFAULT_DENOM);
    }

    #[test]
    fn default_codec_is_versioned_json() {
        let codec = CodecSpec::default();
        assert_eq!(codec.format, "json");
        assert_eq!(codec.schema_version, ENVELOPE_SCHEMA_V1);
    }

    #[test]
    fn envelope_round_trips_through_json() {
        use crate::operation::RequestPayload;
        use ledgersim_types::CollectionId;

        let envelope = SubmitEnvelope {
            chain_id: "ledgersim-1".to_owned(),
            codec: CodecSpec::default(),
            actor: Address::derive(b"actor"),
            fee: Coin::new(DEFAULT_DENOM, 7),
            operation: Operation::new(
                Address::derive(b"actor"),
                RequestPayload::UpdateCollectionMetadata {
                    collection: CollectionId::new("C01"),
                    metadata: "m".into(),
                },
            ),
        };
        let json = serde_json::to_string(&envelope).unwrap();
        let back: SubmitEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(back, envelope);
    }
}
