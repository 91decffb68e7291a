use std::collections::BTreeMap;

use tracing::{debug, trace, warn};

use crate::transaction::{ActorLedger, Transaction, TOTAL_KEY};
use crate::{Crdt, DeltaCrdt, Error, Result};

/// A transactional grow-only counter (TG-Counter).
///
/// Like a G-Counter, every actor owns a share of the value and the value is
/// the sum of all shares. Unlike a G-Counter, each share is built from
/// identified transactions, so the same transaction submitted twice is only
/// counted once.
///
/// History stays bounded: whenever a replica merges as the owner of an actor
/// (see [`merge_as`](Self::merge_as)), that actor's recent transactions are
/// folded into a running total. After that, the folded ids are no longer
/// reported by [`has_transaction`](Self::has_transaction).
///
/// # Example
///
/// ```
/// use tgcounter::prelude::*;
///
/// let mut c1 = TGCounter::new();
/// c1.increment("node-1", "t1", 10).unwrap();
/// c1.increment("node-1", "t1", 10).unwrap(); // resubmission, ignored
///
/// let mut c2 = TGCounter::new();
/// c2.increment("node-2", "t2", 5).unwrap();
///
/// c1.merge_as(Some("node-1"), &c2);
/// assert_eq!(c1.value(), 15);
/// assert!(!c1.has_transaction("t1"));
/// assert!(c1.has_transaction("t2"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TGCounter {
    pub(crate) ledgers: BTreeMap<String, ActorLedger>,
}

impl TGCounter {
    /// Type discriminator written into snapshots.
    pub const TYPE_NAME: &'static str = "TGCounter";

    /// Create an empty counter with no actors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `amount` under `transaction_id` for `actor`.
    ///
    /// Recording an id that is already recent for `actor` with the same
    /// amount is a no-op. A different amount is rejected with
    /// [`Error::ConflictingTransaction`] and the counter is left untouched.
    pub fn increment(
        &mut self,
        actor: impl Into<String>,
        transaction_id: impl Into<String>,
        amount: u64,
    ) -> Result<()> {
        self.record(actor, Transaction::new(transaction_id, amount))
    }

    /// Record a prepared [`Transaction`] for `actor`.
    pub fn record(&mut self, actor: impl Into<String>, transaction: Transaction) -> Result<()> {
        let actor = actor.into();
        let (id, amount) = transaction.into_parts();

        if id == TOTAL_KEY {
            return Err(Error::ReservedTransactionId(id));
        }

        if let Some(recorded) = self.ledgers.get(&actor).and_then(|l| l.amount_of(&id)) {
            if recorded == amount {
                trace!(%actor, %id, amount, "duplicate transaction ignored");
                return Ok(());
            }
            warn!(%actor, %id, recorded, attempted = amount, "conflicting transaction rejected");
            return Err(Error::ConflictingTransaction {
                actor,
                id,
                recorded,
                attempted: amount,
            });
        }

        trace!(%actor, %id, amount, "transaction recorded");
        self.ledgers.entry(actor).or_default().recent.insert(id, amount);
        Ok(())
    }

    /// Whether `transaction_id` is still tracked for any actor.
    ///
    /// Only transactions that have not been compacted are reported.
    #[must_use]
    pub fn has_transaction(&self, transaction_id: &str) -> bool {
        self.ledgers.values().any(|l| l.contains(transaction_id))
    }

    /// Get the total counter value across all actors.
    ///
    /// Saturates at `u64::MAX` instead of overflowing.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.ledgers
            .values()
            .fold(0u64, |acc, l| acc.saturating_add(l.value()))
    }

    /// Merge `other` into `self`, compacting `local_actor`'s history.
    ///
    /// With `Some(actor)`, that actor's recent transactions and the remote
    /// view of it are collapsed into its total, leaving no recent
    /// transactions. Transactions recorded locally are never dropped, even
    /// when the remote view carries a larger total (a fresh session of the
    /// same actor read-repairing against storage).
    /// Every other actor is joined without compaction: only the replica that
    /// owns an actor ever compacts it. With `None` this is the plain
    /// [`Crdt::merge`].
    ///
    /// A stale remote view of an actor (smaller total) is ignored, so
    /// replayed or outdated snapshots never inflate the value.
    pub fn merge_as(&mut self, local_actor: Option<&str>, other: &Self) {
        if let Some(actor) = local_actor {
            let ledger = self.ledgers.entry(actor.to_owned()).or_default();
            let folded = ledger.recent_len();
            let amount = ledger.compact_with(other.ledgers.get(actor));
            debug!(actor, folded, amount, total = ledger.total, "compacted local history");
        }

        let mut joined = 0usize;
        for (actor, remote) in &other.ledgers {
            if local_actor == Some(actor.as_str()) {
                continue;
            }
            let changed = match self.ledgers.get_mut(actor) {
                Some(local) => local.join(remote),
                None => {
                    self.ledgers.insert(actor.clone(), remote.clone());
                    true
                }
            };
            if changed {
                joined += 1;
            }
        }
        debug!(?local_actor, joined, value = self.value(), "merged remote counter");
    }

    /// Collapse `actor`'s recent history into its total.
    ///
    /// Same as merging an empty counter as `actor`.
    pub fn compact(&mut self, actor: &str) {
        self.merge_as(Some(actor), &Self::new());
    }

    /// The ledger kept for `actor`, if the actor has been observed.
    #[must_use]
    pub fn ledger(&self, actor: &str) -> Option<&ActorLedger> {
        self.ledgers.get(actor)
    }

    /// All observed actors with their ledgers, in actor order.
    pub fn ledgers(&self) -> impl Iterator<Item = (&str, &ActorLedger)> + '_ {
        self.ledgers.iter().map(|(a, l)| (a.as_str(), l))
    }

    /// All observed actors, in order.
    pub fn actors(&self) -> impl Iterator<Item = &str> + '_ {
        self.ledgers.keys().map(String::as_str)
    }

    /// Compacted total for `actor` (0 if unknown).
    #[must_use]
    pub fn total_for(&self, actor: &str) -> u64 {
        self.ledgers.get(actor).map_or(0, ActorLedger::total)
    }

    /// Value contributed by `actor` (0 if unknown).
    #[must_use]
    pub fn value_for(&self, actor: &str) -> u64 {
        self.ledgers.get(actor).map_or(0, ActorLedger::value)
    }

    /// Number of observed actors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ledgers.len()
    }

    /// `true` if no actor has been observed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ledgers.is_empty()
    }
}

impl Crdt for TGCounter {
    fn merge(&mut self, other: &Self) {
        self.merge_as(None, other);
    }
}

/// Delta for [`TGCounter`]: only the ledgers the receiver is behind on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TGCounterDelta {
    ledgers: BTreeMap<String, ActorLedger>,
}

impl TGCounterDelta {
    /// Number of actor ledgers carried.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ledgers.len()
    }

    /// `true` if the receiver is already up to date.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ledgers.is_empty()
    }

    /// Ledger carried for `actor`.
    #[must_use]
    pub fn ledger(&self, actor: &str) -> Option<&ActorLedger> {
        self.ledgers.get(actor)
    }
}

impl DeltaCrdt for TGCounter {
    type Delta = TGCounterDelta;

    fn delta(&self, other: &Self) -> TGCounterDelta {
        let ledgers = self
            .ledgers
            .iter()
            .filter(|(actor, ledger)| {
                other
                    .ledgers
                    .get(actor.as_str())
                    .map_or(true, |theirs| !theirs.covers(ledger))
            })
            .map(|(actor, ledger)| (actor.clone(), ledger.clone()))
            .collect();
        TGCounterDelta { ledgers }
    }

    fn apply_delta(&mut self, delta: &TGCounterDelta) {
        for (actor, ledger) in &delta.ledgers {
            self.ledgers.entry(actor.clone()).or_default().join(ledger);
        }
    }
}
