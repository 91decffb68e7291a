/// Errors returned by counter, ledger and snapshot operations.
///
/// Merging and reading a counter never fail; only recording a transaction,
/// decoding a snapshot and talking to a [`SnapshotStore`](crate::SnapshotStore)
/// can.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A snapshot declared a type other than the one being decoded.
    #[error("expected a `{expected}` snapshot, found type `{found}`")]
    TypeMismatch {
        /// The type discriminator the decoder accepts.
        expected: &'static str,
        /// The discriminator found in the input (`<missing>` if absent).
        found: String,
    },

    /// A transaction id was recorded again with a different amount.
    #[error(
        "transaction `{id}` of actor `{actor}` was recorded with amount {recorded}, refusing amount {attempted}"
    )]
    ConflictingTransaction {
        /// Actor the transaction was recorded under.
        actor: String,
        /// The transaction id.
        id: String,
        /// Amount already recorded.
        recorded: u64,
        /// Amount of the rejected call.
        attempted: u64,
    },

    /// The id collides with the key that carries the compacted total.
    #[error("transaction id `{0}` is reserved")]
    ReservedTransactionId(String),

    /// The snapshot was not valid JSON or did not have the counter shape.
    #[cfg(feature = "serde")]
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// The snapshot store failed.
    #[error("snapshot store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[cfg(feature = "serde")]
impl Error {
    pub(crate) fn store<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Store(Box::new(err))
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;
