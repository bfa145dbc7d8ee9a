//! Denominated amounts and balance snapshots.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default fee/balance denomination used by harness fixtures.
pub const DEFAULT_DENOM: &str = "stake";

/// A single denominated amount.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: u128,
}

impl Coin {
    #[must_use]
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.amount == 0
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// A normalized multi-denomination balance: sorted by denom, no duplicates,
/// no zero entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coins(Vec<Coin>);

impl Coins {
    /// The empty balance.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Build a normalized balance from arbitrary coin entries.
    ///
    /// Duplicate denoms are merged; zero amounts are dropped.
    #[must_use]
    pub fn from_coins(coins: impl IntoIterator<Item = Coin>) -> Self {
        let mut out = Self::new();
        for coin in coins {
            out.add(coin);
        }
        out
    }

    /// The amount held in `denom`, zero if absent.
    #[must_use]
    pub fn amount_of(&self, denom: &str) -> u128 {
        self.0
            .iter()
            .find(|c| c.denom == denom)
            .map_or(0, |c| c.amount)
    }

    /// Whether no denomination holds a positive amount.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct denominations held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The normalized entries, sorted by denom.
    #[must_use]
    pub fn as_slice(&self) -> &[Coin] {
        &self.0
    }

    /// Add an amount, keeping the normalized representation.
    pub fn add(&mut self, coin: Coin) {
        if coin.is_zero() {
            return;
        }
        match self.0.binary_search_by(|c| c.denom.cmp(&coin.denom)) {
            Ok(i) => self.0[i].amount = self.0[i].amount.saturating_add(coin.amount),
            Err(i) => self.0.insert(i, coin),
        }
    }

    /// Subtract `coin`, returning `None` if the balance is insufficient.
    #[must_use]
    pub fn checked_sub(&self, coin: &Coin) -> Option<Self> {
        if coin.is_zero() {
            return Some(self.clone());
        }
        let i = self
            .0
            .binary_search_by(|c| c.denom.cmp(&coin.denom))
            .ok()?;
        let held = self.0[i].amount;
        let remaining = held.checked_sub(coin.amount)?;
        let mut next = self.clone();
        if remaining == 0 {
            next.0.remove(i);
        } else {
            next.0[i].amount = remaining;
        }
        Some(next)
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("none");
        }
        for (i, coin) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{coin}")?;
        }
        Ok(())
    }
}

impl FromIterator<Coin> for Coins {
    fn from_iter<I: IntoIterator<Item = Coin>>(iter: I) -> Self {
        Self::from_coins(iter)
    }
}

impl<'a> IntoIterator for &'a Coins {
    type Item = &'a Coin;
    type IntoIter = std::slice::Iter<'a, Coin>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_coins_normalizes() {
        let coins = Coins::from_coins([
            Coin::new("voucher", 5),
            Coin::new(DEFAULT_DENOM, 10),
            Coin::new("voucher", 3),
            Coin::new("dust", 0),
        ]);
        assert_eq!(coins.len(), 2);
        assert_eq!(coins.amount_of(DEFAULT_DENOM), 10);
        assert_eq!(coins.amount_of("voucher"), 8);
        assert_eq!(coins.amount_of("dust"), 0);
        // Sorted by denom.
        assert_eq!(coins.as_slice()[0].denom, DEFAULT_DENOM);
    }

    #[test]
    fn checked_sub_within_balance() {
        let coins = Coins::from_coins([Coin::new(DEFAULT_DENOM, 10)]);
        let rest = coins
            .checked_sub(&Coin::new(DEFAULT_DENOM, 4))
            .expect("sufficient");
        assert_eq!(rest.amount_of(DEFAULT_DENOM), 6);
    }

    #[test]
    fn checked_sub_to_zero_drops_entry() {
        let coins = Coins::from_coins([Coin::new(DEFAULT_DENOM, 10)]);
        let rest = coins
            .checked_sub(&Coin::new(DEFAULT_DENOM, 10))
            .expect("sufficient");
        assert!(rest.is_zero());
    }

    #[test]
    fn checked_sub_insufficient() {
        let coins = Coins::from_coins([Coin::new(DEFAULT_DENOM, 3)]);
        assert!(coins.checked_sub(&Coin::new(DEFAULT_DENOM, 4)).is_none());
        assert!(coins.checked_sub(&Coin::new("voucher", 1)).is_none());
    }

    #[test]
    fn zero_sub_is_identity() {
        let coins = Coins::from_coins([Coin::new(DEFAULT_DENOM, 3)]);
        let same = coins
            .checked_sub(&Coin::new("voucher", 0))
            .expect("zero always subtractable");
        assert_eq!(same, coins);
    }

    #[test]
    fn display_formats() {
        assert_eq!(Coin::new(DEFAULT_DENOM, 25).to_string(), "25stake");
        let coins = Coins::from_coins([Coin::new("voucher", 5), Coin::new(DEFAULT_DENOM, 1)]);
        assert_eq!(coins.to_string(), "1stake,5voucher");
        assert_eq!(Coins::new().to_string(), "none");
    }
}
