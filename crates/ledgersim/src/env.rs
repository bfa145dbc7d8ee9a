//! Collaborator seams between generators and the service under test.
//!
//! Generators never talk to a concrete service; they see three narrow traits
//! plus the run configuration, bundled into a [`SimEnv`]. The in-memory
//! reference implementation in [`crate::memledger`] implements all three, and
//! tests substitute counting or failing stubs at the same seams.

use ledgersim_error::SimResult;
use ledgersim_types::{Address, Coins, Collection, CollectionId, Record, SimAccount};

use crate::config::SimConfig;
use crate::dispatch::SubmitEnvelope;

/// Read-only view of live service state, used by entity discovery.
///
/// Implementations must return entities in a stable order; discovery draws
/// uniformly by index, so ordering feeds directly into reproducibility.
pub trait StateQuery {
    /// All collections whose kind equals `kind`.
    ///
    /// # Errors
    ///
    /// Propagates service read failures as [`ledgersim_error::SimError::Data`].
    fn collections(&self, kind: &str) -> SimResult<Vec<Collection>>;

    /// All records that belong to `collection`.
    ///
    /// # Errors
    ///
    /// Propagates service read failures as [`ledgersim_error::SimError::Data`].
    fn records(&self, collection: &CollectionId) -> SimResult<Vec<Record>>;
}

/// Account resolution and balance lookup, used by precondition validation.
pub trait AccountKeeper {
    /// Resolves `address` to a harness-controlled account, `None` when the
    /// harness does not control it.
    ///
    /// # Errors
    ///
    /// Propagates keeper failures as [`ledgersim_error::SimError::Data`].
    fn resolve_account(&self, address: &Address) -> SimResult<Option<SimAccount>>;

    /// The spendable balance of `address`.
    ///
    /// # Errors
    ///
    /// Propagates keeper failures as [`ledgersim_error::SimError::Data`].
    fn spendable_balance(&self, address: &Address) -> SimResult<Coins>;
}

/// Delivery endpoint for finished submission envelopes.
pub trait TxSubmitter {
    /// Delivers `envelope` to the service.
    ///
    /// # Errors
    ///
    /// Returns [`ledgersim_error::SimError::Submission`] when the service
    /// rejects the envelope. The cause must be preserved verbatim; the
    /// pipeline never rewrites submission failures.
    fn deliver(&self, envelope: &SubmitEnvelope) -> SimResult<()>;
}

/// Everything a generator invocation may touch.
///
/// Cheap to construct per invocation; all fields are borrows owned by the
/// driver (or the test) for the duration of the run.
#[derive(Clone, Copy)]
pub struct SimEnv<'a> {
    /// Live service state for discovery.
    pub query: &'a dyn StateQuery,
    /// Account resolution and balances for validation.
    pub keeper: &'a dyn AccountKeeper,
    /// Delivery endpoint for built operations.
    pub submitter: &'a dyn TxSubmitter,
    /// Accounts the harness controls, used when drawing replacement admins.
    pub accounts: &'a [SimAccount],
    /// Validated run configuration.
    pub config: &'a SimConfig,
}

impl std::fmt::Debug for SimEnv<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimEnv")
            .field("accounts", &self.accounts.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
