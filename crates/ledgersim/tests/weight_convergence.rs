//! Selection frequency converges on `weight / total_weight` per kind.
//!
//! Selection happens before discovery, so the per-kind `selected` tallies
//! depend only on the seed and the weights, never on ledger state. The run
//! here is long enough that a 2% absolute band holds with huge margin.

use ledgersim::ops::standard_catalog;
use ledgersim::{MemLedger, SimConfig, SimDriver, derive_domain_seed};
use ledgersim_types::SimAccount;

#[test]
fn standard_catalog_selection_matches_weights() {
    // 5600 invocations = 40 * total_weight, so expected counts are integral.
    let invocations = 5_600u64;
    let config = SimConfig {
        seed: ledgersim::LEDGERSIM_SEED,
        invocations,
        ..SimConfig::default()
    };
    let driver = SimDriver::new(standard_catalog().unwrap(), config).unwrap();
    let accounts = SimAccount::deterministic_set(8);
    let ledger = MemLedger::demo_genesis(
        derive_domain_seed(ledgersim::LEDGERSIM_SEED, "genesis"),
        &accounts,
        &driver.config().kind_filter,
    );

    let report = driver.run(&ledger, &ledger, &ledger, &accounts);

    let total_weight = u64::from(driver.catalog().total_weight());
    let band = invocations / 50;
    for entry in driver.catalog().entries() {
        let selected = report
            .per_kind
            .get(entry.kind())
            .map_or(0, |tally| tally.selected);
        let expected = invocations * u64::from(entry.weight()) / total_weight;
        assert!(
            selected.abs_diff(expected) <= band,
            "kind {} selected {selected} times, expected {expected} within {band}",
            entry.kind()
        );
    }

    let selected_total: u64 = report.per_kind.values().map(|tally| tally.selected).sum();
    assert_eq!(selected_total, invocations);
}

#[test]
fn every_registered_kind_gets_selected() {
    let config = SimConfig {
        seed: 31,
        invocations: 1_000,
        ..SimConfig::default()
    };
    let driver = SimDriver::new(standard_catalog().unwrap(), config).unwrap();
    let ledger = MemLedger::new();

    let report = driver.run(&ledger, &ledger, &ledger, &[]);

    for entry in driver.catalog().entries() {
        let selected = report
            .per_kind
            .get(entry.kind())
            .map_or(0, |tally| tally.selected);
        assert!(
            selected > 0,
            "kind {} was never selected in 1000 draws",
            entry.kind()
        );
    }
}
