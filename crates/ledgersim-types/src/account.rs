//! Harness-controlled account fixtures.

use serde::{Deserialize, Serialize};

use crate::address::Address;

/// Domain tag for deterministic account derivation.
const ACCOUNT_DOMAIN: &[u8] = b"ledgersim/account";

/// An identity the harness can act as.
///
/// Key material stays behind the submission capability; holding a
/// `SimAccount` means the harness is able to author operations for this
/// address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimAccount {
    pub address: Address,
}

impl SimAccount {
    #[must_use]
    pub const fn new(address: Address) -> Self {
        Self { address }
    }

    /// The fixture account at `index`. Stable across runs and platforms.
    #[must_use]
    pub fn deterministic(index: u32) -> Self {
        let mut material = Vec::with_capacity(ACCOUNT_DOMAIN.len() + 4);
        material.extend_from_slice(ACCOUNT_DOMAIN);
        material.extend_from_slice(&index.to_le_bytes());
        Self::new(Address::derive(&material))
    }

    /// The first `count` fixture accounts.
    #[must_use]
    pub fn deterministic_set(count: u32) -> Vec<Self> {
        (0..count).map(Self::deterministic).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_accounts_are_stable() {
        assert_eq!(SimAccount::deterministic(0), SimAccount::deterministic(0));
        assert_ne!(SimAccount::deterministic(0), SimAccount::deterministic(1));
    }

    #[test]
    fn fixture_set_is_distinct() {
        let accounts = SimAccount::deterministic_set(16);
        for (i, a) in accounts.iter().enumerate() {
            for b in &accounts[i + 1..] {
                assert_ne!(a.address, b.address);
            }
        }
    }
}
