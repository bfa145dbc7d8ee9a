//! In-memory reference implementation of the service under test.
//!
//! [`MemLedger`] implements all three collaborator seams, so a driver wired
//! to one instance runs a fully closed loop: discovery reads the same state
//! that delivery mutates. Delivery validates the entire envelope before
//! touching state; a rejected envelope leaves no partial side effects.
//!
//! State lives in `BTreeMap`s behind one mutex. Iteration order is the key
//! order, which keeps discovery input stable and runs reproducible.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use ledgersim_error::{SimError, SimResult};
use ledgersim_types::{
    Address, Coin, Coins, Collection, CollectionId, DEFAULT_DENOM, Record, RecordId, SimAccount,
    limits,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::dispatch::SubmitEnvelope;
use crate::env::{AccountKeeper, StateQuery, TxSubmitter};
use crate::operation::RequestPayload;
use crate::rand_util;

#[derive(Debug, Default)]
struct Inner {
    collections: BTreeMap<CollectionId, Collection>,
    records: BTreeMap<RecordId, Record>,
    next_seq: BTreeMap<CollectionId, u32>,
    balances: BTreeMap<Address, Coins>,
    controlled: BTreeSet<Address>,
    applied: u64,
}

/// In-memory ledger service.
#[derive(Debug, Default)]
pub struct MemLedger {
    inner: Mutex<Inner>,
}

impl MemLedger {
    /// An empty ledger with no accounts or collections.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a small random genesis state over `accounts`.
    ///
    /// Every account is registered with a spendable balance; collections of
    /// `kind` and their records are spread across the accounts. Identical
    /// seeds produce identical genesis states.
    #[must_use]
    pub fn demo_genesis(seed: u64, accounts: &[SimAccount], kind: &str) -> Self {
        let ledger = Self::new();
        let mut rng = StdRng::seed_from_u64(seed);

        for account in accounts {
            let amount = rng.gen_range(200..=5_000u128);
            ledger.register_account(account, Coins::from_coins([Coin::new(DEFAULT_DENOM, amount)]));
        }

        if accounts.is_empty() {
            return ledger;
        }
        let admin_of = |rng: &mut StdRng, accounts: &[SimAccount]| {
            let idx = rng.gen_range(0..accounts.len());
            accounts[idx].address.to_string()
        };

        let collections = rng.gen_range(2..=4u32);
        for n in 1..=collections {
            let id = CollectionId::new(format!("C{n:02}"));
            ledger.insert_collection(Collection {
                id: id.clone(),
                kind: kind.to_owned(),
                admin: admin_of(&mut rng, accounts),
                metadata: rand_util::rand_string_of_length(&mut rng, 16),
            });
            for _ in 0..rng.gen_range(0..=3u32) {
                ledger.create_seeded_record(&mut rng, &id, accounts);
            }
        }
        ledger
    }

    fn create_seeded_record(&self, rng: &mut StdRng, collection: &CollectionId, accounts: &[SimAccount]) {
        let idx = rng.gen_range(0..accounts.len());
        let admin = accounts[idx].address.to_string();
        let metadata = rand_util::rand_string_of_length(rng, 16);
        let mut inner = self.lock();
        let id = next_record_id(&mut inner, collection);
        inner.records.insert(
            id.clone(),
            Record {
                id,
                collection: collection.clone(),
                admin,
                metadata,
            },
        );
    }

    /// Registers `account` as harness-controlled with an initial balance.
    pub fn register_account(&self, account: &SimAccount, balance: Coins) {
        let mut inner = self.lock();
        inner.controlled.insert(account.address.clone());
        inner.balances.insert(account.address.clone(), balance);
    }

    /// Installs a collection fixture.
    pub fn insert_collection(&self, collection: Collection) {
        self.lock().collections.insert(collection.id.clone(), collection);
    }

    /// Installs a record fixture.
    pub fn insert_record(&self, record: Record) {
        self.lock().records.insert(record.id.clone(), record);
    }

    /// Overwrites the balance of `address`.
    pub fn set_balance(&self, address: &Address, balance: Coins) {
        self.lock().balances.insert(address.clone(), balance);
    }

    /// Point-in-time copy of a collection.
    #[must_use]
    pub fn collection(&self, id: &CollectionId) -> Option<Collection> {
        self.lock().collections.get(id).cloned()
    }

    /// Point-in-time copy of a record.
    #[must_use]
    pub fn record(&self, id: &RecordId) -> Option<Record> {
        self.lock().records.get(id).cloned()
    }

    /// Number of records currently under `collection`.
    #[must_use]
    pub fn record_count(&self, collection: &CollectionId) -> usize {
        self.lock()
            .records
            .values()
            .filter(|record| &record.collection == collection)
            .count()
    }

    /// Current balance of `address`; empty when unknown.
    #[must_use]
    pub fn balance_of(&self, address: &Address) -> Coins {
        self.lock().balances.get(address).cloned().unwrap_or_default()
    }

    /// Number of envelopes applied so far.
    #[must_use]
    pub fn applied_count(&self) -> u64 {
        self.lock().applied
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("lock")
    }
}

/// Next unused record id under `collection`, skipping fixture ids.
fn next_record_id(inner: &mut Inner, collection: &CollectionId) -> RecordId {
    let mut seq = inner.next_seq.get(collection).copied().unwrap_or(1);
    let mut id = RecordId::scoped(collection, seq);
    while inner.records.contains_key(&id) {
        seq += 1;
        id = RecordId::scoped(collection, seq);
    }
    inner.next_seq.insert(collection.clone(), seq + 1);
    id
}

fn check_metadata(metadata: &str) -> SimResult<()> {
    if metadata.len() > limits::MAX_METADATA_LEN {
        return Err(SimError::submission(format!(
            "metadata exceeds {} bytes",
            limits::MAX_METADATA_LEN
        )));
    }
    Ok(())
}

impl StateQuery for MemLedger {
    fn collections(&self, kind: &str) -> SimResult<Vec<Collection>> {
        Ok(self
            .lock()
            .collections
            .values()
            .filter(|collection| collection.kind == kind)
            .cloned()
            .collect())
    }

    fn records(&self, collection: &CollectionId) -> SimResult<Vec<Record>> {
        Ok(self
            .lock()
            .records
            .values()
            .filter(|record| &record.collection == collection)
            .cloned()
            .collect())
    }
}

impl AccountKeeper for MemLedger {
    fn resolve_account(&self, address: &Address) -> SimResult<Option<SimAccount>> {
        let inner = self.lock();
        Ok(inner
            .controlled
            .contains(address)
            .then(|| SimAccount::new(address.clone())))
    }

    fn spendable_balance(&self, address: &Address) -> SimResult<Coins> {
        Ok(self.balance_of(address))
    }
}

impl TxSubmitter for MemLedger {
    fn deliver(&self, envelope: &SubmitEnvelope) -> SimResult<()> {
        let mut inner = self.lock();
        let actor = &envelope.operation.actor;

        // Fee solvency first; the remainder is committed only after the
        // payload itself passes authorization.
        let balance = inner.balances.get(actor).cloned().unwrap_or_default();
        let Some(remainder) = balance.checked_sub(&envelope.fee) else {
            return Err(SimError::submission(format!(
                "insufficient funds: {actor} holds {balance}, fee is {}",
                envelope.fee
            )));
        };

        match &envelope.operation.payload {
            RequestPayload::UpdateRecordMetadata { record, metadata } => {
                check_metadata(metadata)?;
                let entry = authorize_record(&mut inner, record, actor)?;
                entry.metadata.clone_from(metadata);
            }
            RequestPayload::UpdateRecordAdmin { record, new_admin } => {
                let entry = authorize_record(&mut inner, record, actor)?;
                entry.admin = new_admin.to_string();
            }
            RequestPayload::UpdateCollectionMetadata {
                collection,
                metadata,
            } => {
                check_metadata(metadata)?;
                let entry = authorize_collection(&mut inner, collection, actor)?;
                entry.metadata.clone_from(metadata);
            }
            RequestPayload::UpdateCollectionAdmin {
                collection,
                new_admin,
            } => {
                let entry = authorize_collection(&mut inner, collection, actor)?;
                entry.admin = new_admin.to_string();
            }
            RequestPayload::CreateRecord {
                collection,
                metadata,
            } => {
                check_metadata(metadata)?;
                authorize_collection(&mut inner, collection, actor)?;
                let id = next_record_id(&mut inner, collection);
                inner.records.insert(
                    id.clone(),
                    Record {
                        id,
                        collection: collection.clone(),
                        admin: actor.to_string(),
                        metadata: metadata.clone(),
                    },
                );
            }
        }

        inner.balances.insert(actor.clone(), remainder);
        inner.applied += 1;
        debug!(
            kind = envelope.operation.kind(),
            target = envelope.operation.target(),
            fee = %envelope.fee,
            applied = inner.applied,
            "envelope applied"
        );
        Ok(())
    }
}

fn authorize_record<'a>(
    inner: &'a mut Inner,
    id: &RecordId,
    actor: &Address,
) -> SimResult<&'a mut Record> {
    let Some(record) = inner.records.get_mut(id) else {
        return Err(SimError::submission(format!("unknown record {id}")));
    };
    if record.admin != actor.as_str() {
        return Err(SimError::submission(format!(
            "unauthorized: {actor} is not the admin of {id}"
        )));
    }
    Ok(record)
}

fn authorize_collection<'a>(
    inner: &'a mut Inner,
    id: &CollectionId,
    actor: &Address,
) -> SimResult<&'a mut Collection> {
    let Some(collection) = inner.collections.get_mut(id) else {
        return Err(SimError::submission(format!("unknown collection {id}")));
    };
    if collection.admin != actor.as_str() {
        return Err(SimError::submission(format!(
            "unauthorized: {actor} is not the admin of {id}"
        )));
    }
    Ok(collection)
}
