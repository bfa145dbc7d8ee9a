//! Precondition validation for a discovered entity's controller.
//!
//! Runs strictly in order: parse the controller address, resolve it to a
//! harness account, check solvency. A malformed address is corrupt state and
//! therefore a hard data error; the other two are skips.

use ledgersim_error::{SimError, SimResult};
use ledgersim_types::{Address, Coin, Coins, SimAccount};

use crate::env::AccountKeeper;
use crate::outcome::SkipReason;
use crate::pipeline::Gate;

/// A validated actor: the resolved account and its spendable balance at
/// validation time. The balance snapshot is what fee drawing works from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Harness account acting as the entity's controller.
    pub account: SimAccount,
    /// Spendable balance snapshot taken during validation.
    pub spendable: Coins,
}

/// Validates that `admin` can act right now.
///
/// `context` names the field being validated (for example `"record admin"`)
/// and is embedded in the data error when the address fails to parse.
///
/// Skips with [`SkipReason::NoControllableAccount`] when the harness does not
/// control the address, and [`SkipReason::InsufficientSpendable`] when the
/// balance is below `min_spendable`. The checks run in that order; an
/// unresolvable address never reaches the balance lookup.
///
/// # Errors
///
/// Returns [`SimError::Data`] when `admin` is not a well-formed address, and
/// propagates [`AccountKeeper`] failures.
pub fn validate_controller(
    admin: &str,
    context: &str,
    keeper: &dyn AccountKeeper,
    min_spendable: &Coin,
) -> SimResult<Gate<Actor>> {
    let address =
        Address::parse(admin).map_err(|err| SimError::data(context, err.to_string()))?;
    let Some(account) = keeper.resolve_account(&address)? else {
        return Ok(Gate::Skip(SkipReason::NoControllableAccount));
    };
    let spendable = keeper.spendable_balance(&address)?;
    if spendable.amount_of(&min_spendable.denom) < min_spendable.amount {
        return Ok(Gate::Skip(SkipReason::InsufficientSpendable));
    }
    Ok(Gate::Pass(Actor { account, spendable }))
}
