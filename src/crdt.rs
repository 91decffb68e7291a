/// State-based CRDT merge.
///
/// A CRDT (Conflict-free Replicated Data Type) guarantees that concurrent
/// updates on different replicas will converge to the same state after merging,
/// without requiring coordination.
///
/// # Properties
///
/// All implementations must satisfy:
/// - **Commutativity:** `a.merge(b) == b.merge(a)`
/// - **Associativity:** `a.merge(b.merge(c)) == a.merge(b).merge(c)`
/// - **Idempotency:** `a.merge(a) == a`
///
/// For [`TGCounter`](crate::TGCounter) this is the plain join, which never
/// compacts history. Replicas that own an actor use
/// [`TGCounter::merge_as`](crate::TGCounter::merge_as) instead.
pub trait Crdt {
    /// Merge another replica's state into this one.
    ///
    /// After merging, `self` contains the least upper bound of both states.
    fn merge(&mut self, other: &Self);
}

/// Extension trait for delta-state CRDTs.
///
/// Instead of shipping a full snapshot, a replica can send only the part of
/// its state the receiver is missing.
///
/// # Example
///
/// ```
/// use tgcounter::prelude::*;
///
/// let mut a = TGCounter::new();
/// a.increment("a", "t1", 10).unwrap();
///
/// let mut b = TGCounter::new();
/// b.increment("b", "t2", 5).unwrap();
///
/// let delta = a.delta(&b);
/// b.apply_delta(&delta);
/// assert_eq!(b.value(), 15);
/// ```
pub trait DeltaCrdt: Crdt {
    /// The type of delta produced by this CRDT.
    type Delta;

    /// Generate a delta containing changes in `self` that `other` does not have.
    fn delta(&self, other: &Self) -> Self::Delta;

    /// Apply a delta to this replica's state.
    ///
    /// Equivalent to merging the state that produced the delta.
    fn apply_delta(&mut self, delta: &Self::Delta);
}
