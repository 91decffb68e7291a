use std::cmp::Ordering;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Key under which an actor's compacted total travels in the flat snapshot
/// form. It can never be used as a transaction id.
pub(crate) const TOTAL_KEY: &str = "total";

/// A single credit recorded by one actor.
///
/// Transactions are immutable: once recorded, the id and amount never change.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transaction {
    id: String,
    amount: u64,
}

impl Transaction {
    /// Create a transaction with the given id and amount.
    pub fn new(id: impl Into<String>, amount: u64) -> Self {
        Self {
            id: id.into(),
            amount,
        }
    }

    /// The transaction id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The transaction amount.
    #[must_use]
    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub(crate) fn into_parts(self) -> (String, u64) {
        (self.id, self.amount)
    }
}

/// One actor's share of a [`TGCounter`](crate::TGCounter).
///
/// `total` holds everything that has been compacted; `recent` holds the
/// transactions recorded since the last compaction, keyed by id so that
/// resubmissions are detected.
///
/// Two views of the same actor's ledger are joined lexicographically: the
/// larger `total` belongs to a later compaction epoch and wins outright,
/// while equal totals union their recent sets by per-key maximum. The owner
/// of the actor never drops its own recent transactions; it folds them with
/// [`compact_with`](Self::compact_with) instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActorLedger {
    pub(crate) total: u64,
    pub(crate) recent: BTreeMap<String, u64>,
}

impl ActorLedger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// A fully compacted ledger carrying only `total`.
    pub fn with_total(total: u64) -> Self {
        Self {
            total,
            recent: BTreeMap::new(),
        }
    }

    /// Value collapsed out of recent history.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Transactions not yet compacted, in id order.
    pub fn recent(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.recent.iter().map(|(id, &amount)| (id.as_str(), amount))
    }

    /// Amount recorded for a recent transaction.
    #[must_use]
    pub fn amount_of(&self, id: &str) -> Option<u64> {
        self.recent.get(id).copied()
    }

    /// Whether `id` is still tracked individually.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.recent.contains_key(id)
    }

    /// Number of transactions not yet compacted.
    #[must_use]
    pub fn recent_len(&self) -> usize {
        self.recent.len()
    }

    /// `true` when there is no recent history left.
    #[must_use]
    pub fn is_compacted(&self) -> bool {
        self.recent.is_empty()
    }

    /// `total` plus every recent amount.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.recent
            .values()
            .fold(self.total, |acc, &amount| acc.saturating_add(amount))
    }

    /// Join another view of the same actor into this one.
    ///
    /// Returns `true` if `self` changed.
    pub(crate) fn join(&mut self, other: &ActorLedger) -> bool {
        match self.total.cmp(&other.total) {
            Ordering::Greater => false,
            Ordering::Less => {
                self.clone_from(other);
                true
            }
            Ordering::Equal => {
                let mut changed = false;
                for (id, &amount) in &other.recent {
                    match self.recent.entry(id.clone()) {
                        Entry::Vacant(slot) => {
                            slot.insert(amount);
                            changed = true;
                        }
                        Entry::Occupied(mut slot) => {
                            if amount > *slot.get() {
                                slot.insert(amount);
                                changed = true;
                            }
                        }
                    }
                }
                changed
            }
        }
    }

    /// Whether joining `other` into `self` would leave `self` unchanged.
    pub(crate) fn covers(&self, other: &ActorLedger) -> bool {
        match self.total.cmp(&other.total) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => other
                .recent
                .iter()
                .all(|(id, &amount)| self.recent.get(id).is_some_and(|&own| own >= amount)),
        }
    }

    /// Fold every recent transaction into `total`; returns the folded amount.
    pub(crate) fn compact(&mut self) -> u64 {
        let collapsed = self
            .recent
            .values()
            .fold(0u64, |acc, &amount| acc.saturating_add(amount));
        self.total = self.total.saturating_add(collapsed);
        self.recent.clear();
        collapsed
    }

    /// Fold this owner-side view together with a remote view of the same
    /// actor, then compact.
    ///
    /// Local recent transactions are always kept: the owner is the only one
    /// that records them, so a remote view never already accounts for them.
    /// The remote recent set is unioned by per-key maximum unless it belongs
    /// to an older epoch (smaller total), in which case it was already folded
    /// into the local total. The new total starts from the larger of the two.
    pub(crate) fn compact_with(&mut self, remote: Option<&ActorLedger>) -> u64 {
        if let Some(remote) = remote.filter(|r| r.total >= self.total) {
            self.total = remote.total;
            for (id, &amount) in &remote.recent {
                let entry = self.recent.entry(id.clone()).or_insert(0);
                *entry = (*entry).max(amount);
            }
        }
        self.compact()
    }
}
