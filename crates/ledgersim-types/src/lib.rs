//! Shared vocabulary types for the ledgersim harness.
//!
//! Everything here is a plain value type: validated identity strings,
//! denominated amounts, and point-in-time snapshots of queried service
//! state. The harness crate builds on these; the crate itself performs no
//! I/O and holds no mutable state.

pub mod account;
pub mod address;
pub mod coin;
pub mod ids;
pub mod limits;
pub mod state;

pub use account::SimAccount;
pub use address::{Address, AddressError};
pub use coin::{Coin, Coins, DEFAULT_DENOM};
pub use ids::{CollectionId, RecordId};
pub use state::{Collection, Record};
