use tracing::{debug, debug_span, Span};

use crate::{Result, TGCounter};
#[cfg(feature = "serde")]
use crate::{Error, SnapshotStore};

const DEFAULT_ACTOR: &str = "default";
const DEFAULT_HISTORY_LENGTH: usize = 50;

/// Configuration for a [`Ledger`] replica.
///
/// # Example
///
/// ```
/// use tgcounter::LedgerConfig;
///
/// let config = LedgerConfig::new("ACTOR1")
///     .with_history_length(5)
///     .with_tag("worker-7");
/// assert_eq!(config.actor, "ACTOR1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct LedgerConfig {
    /// Actor id this replica records transactions under.
    pub actor: String,
    /// Recent transactions kept before the local history is compacted.
    /// `0` disables automatic compaction.
    pub history_length: usize,
    /// Free-form diagnostic tag attached to log spans.
    pub tag: Option<String>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            actor: DEFAULT_ACTOR.to_owned(),
            history_length: DEFAULT_HISTORY_LENGTH,
            tag: None,
        }
    }
}

impl LedgerConfig {
    /// Default configuration for `actor`.
    pub fn new(actor: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            ..Self::default()
        }
    }

    /// Set the history length.
    pub fn with_history_length(mut self, history_length: usize) -> Self {
        self.history_length = history_length;
        self
    }

    /// Set the diagnostic tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

#[derive(Clone, Copy)]
enum Side {
    Credit,
    Debit,
}

/// A signed balance built from two [`TGCounter`]s.
///
/// Credits and debits are recorded as transactions under the configured
/// actor; the balance is `credits - debits`. Resubmitting a transaction id
/// that is still in recent history is ignored.
///
/// # Example
///
/// ```
/// use tgcounter::{Ledger, LedgerConfig};
///
/// let mut ledger = Ledger::new(LedgerConfig::new("ACTOR1"));
/// ledger.credit("txn1", 10).unwrap();
/// ledger.credit("txn1", 10).unwrap();
/// ledger.debit("txn2", 5).unwrap();
/// assert_eq!(ledger.value(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    config: LedgerConfig,
    credits: TGCounter,
    debits: TGCounter,
}

impl Ledger {
    /// Create an empty ledger.
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            config,
            credits: TGCounter::new(),
            debits: TGCounter::new(),
        }
    }

    /// Record a credit.
    pub fn credit(&mut self, transaction_id: impl Into<String>, amount: u64) -> Result<()> {
        self.record(Side::Credit, transaction_id.into(), amount)
    }

    /// Record a debit.
    pub fn debit(&mut self, transaction_id: impl Into<String>, amount: u64) -> Result<()> {
        self.record(Side::Debit, transaction_id.into(), amount)
    }

    /// Get the current balance (credits - debits).
    ///
    /// A balance outside the `i64` range saturates at `i64::MIN` or
    /// `i64::MAX`.
    #[must_use]
    pub fn value(&self) -> i64 {
        let balance = i128::from(self.credits.value()) - i128::from(self.debits.value());
        i64::try_from(balance).unwrap_or(if balance < 0 { i64::MIN } else { i64::MAX })
    }

    /// Whether `transaction_id` is still tracked on either side.
    #[must_use]
    pub fn has_transaction(&self, transaction_id: &str) -> bool {
        self.credits.has_transaction(transaction_id) || self.debits.has_transaction(transaction_id)
    }

    /// Merge another replica's ledger, compacting this replica's own history.
    pub fn merge(&mut self, other: &Ledger) {
        let _span = self.span().entered();
        let actor = self.config.actor.as_str();
        self.credits.merge_as(Some(actor), &other.credits);
        self.debits.merge_as(Some(actor), &other.debits);
    }

    /// The credit counter.
    #[must_use]
    pub fn credits(&self) -> &TGCounter {
        &self.credits
    }

    /// The debit counter.
    #[must_use]
    pub fn debits(&self) -> &TGCounter {
        &self.debits
    }

    /// This replica's configuration.
    #[must_use]
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    fn record(&mut self, side: Side, id: String, amount: u64) -> Result<()> {
        let _span = self.span().entered();
        let actor = self.config.actor.as_str();
        let limit = self.config.history_length;
        let counter = match side {
            Side::Credit => &mut self.credits,
            Side::Debit => &mut self.debits,
        };

        counter.increment(actor, id, amount)?;

        let recent = counter.ledger(actor).map_or(0, |l| l.recent_len());
        if limit > 0 && recent > limit {
            debug!(recent, limit, "history length exceeded");
            counter.compact(actor);
        }
        Ok(())
    }

    fn span(&self) -> Span {
        debug_span!(
            "ledger",
            actor = %self.config.actor,
            tag = self.config.tag.as_deref().unwrap_or("")
        )
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize)]
struct LedgerSnapshotRef<'a> {
    p: &'a TGCounter,
    n: &'a TGCounter,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct LedgerSnapshot {
    p: crate::codec::RawCounter,
    n: crate::codec::RawCounter,
}

#[cfg(feature = "serde")]
impl LedgerSnapshot {
    fn decode(bytes: &[u8]) -> Result<(TGCounter, TGCounter)> {
        let raw: Self = serde_json::from_slice(bytes)?;
        Ok((TGCounter::try_from(raw.p)?, TGCounter::try_from(raw.n)?))
    }
}

#[cfg(feature = "serde")]
impl Ledger {
    /// Serialize both counters as `{"p": credits, "n": debits}`.
    pub fn to_json(&self) -> Result<String> {
        let snapshot = LedgerSnapshotRef {
            p: &self.credits,
            n: &self.debits,
        };
        Ok(serde_json::to_string(&snapshot)?)
    }

    /// Decode a ledger snapshot for the replica described by `config`.
    pub fn from_json(config: LedgerConfig, json: &str) -> Result<Self> {
        let (credits, debits) = LedgerSnapshot::decode(json.as_bytes())?;
        Ok(Self {
            config,
            credits,
            debits,
        })
    }

    /// Load the snapshot stored under `key`, or an empty ledger if none exists.
    pub fn load<S: SnapshotStore>(config: LedgerConfig, store: &S, key: &str) -> Result<Self> {
        match store.get(key).map_err(Error::store)? {
            Some(bytes) => {
                let (credits, debits) = LedgerSnapshot::decode(&bytes)?;
                Ok(Self {
                    config,
                    credits,
                    debits,
                })
            }
            None => Ok(Self::new(config)),
        }
    }

    /// Merge the snapshot stored under `key` into this replica and persist
    /// the result back.
    ///
    /// This replica's own history is compacted on the way, so after a
    /// successful sync its recent transactions are no longer reported by
    /// [`has_transaction`](Self::has_transaction).
    pub fn sync<S: SnapshotStore>(&mut self, store: &mut S, key: &str) -> Result<()> {
        let _span = self.span().entered();
        let stored = match store.get(key).map_err(Error::store)? {
            Some(bytes) => LedgerSnapshot::decode(&bytes)?,
            None => (TGCounter::new(), TGCounter::new()),
        };

        let actor = self.config.actor.as_str();
        self.credits.merge_as(Some(actor), &stored.0);
        self.debits.merge_as(Some(actor), &stored.1);

        let json = self.to_json()?;
        store.put(key, json.as_bytes()).map_err(Error::store)?;
        debug!(key, value = self.value(), "ledger synced");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger(actor: &str, history_length: usize) -> Ledger {
        Ledger::new(LedgerConfig::new(actor).with_history_length(history_length))
    }

    #[test]
    fn new_ledger_is_zero() {
        assert_eq!(ledger("a", 5).value(), 0);
    }

    #[test]
    fn credit_and_debit() {
        let mut l = ledger("a", 0);
        for _ in 0..3 {
            l.credit("txn1", 10).unwrap();
        }
        assert_eq!(l.value(), 10);

        for _ in 0..3 {
            l.debit("txn2", 5).unwrap();
        }
        assert_eq!(l.value(), 5);
    }

    #[test]
    fn can_go_negative() {
        let mut l = ledger("a", 0);
        l.debit("t1", 7).unwrap();
        assert_eq!(l.value(), -7);
    }

    #[test]
    fn balance_saturates_at_i64_bounds() {
        let mut rich = ledger("a", 0);
        rich.credit("t1", u64::MAX).unwrap();
        assert_eq!(rich.value(), i64::MAX);
        rich.debit("t2", u64::MAX - 10).unwrap();
        assert_eq!(rich.value(), 10);

        let mut poor = ledger("a", 0);
        poor.debit("t1", u64::MAX).unwrap();
        assert_eq!(poor.value(), i64::MIN);
    }

    #[test]
    fn has_transaction_on_either_side() {
        let mut l = ledger("a", 0);
        l.credit("txn1", 10).unwrap();
        l.debit("txn2", 5).unwrap();

        assert!(l.has_transaction("txn1"));
        assert!(l.has_transaction("txn2"));
        assert!(!l.has_transaction("txn3"));
    }

    #[test]
    fn history_length_bounds_recent_transactions() {
        let mut l = ledger("ACTOR1", 5);
        for i in 1..=10 {
            l.credit(format!("txn{i}"), 10).unwrap();
        }
        for _ in 0..4 {
            l.credit("txn11", 10).unwrap();
        }

        assert_eq!(l.value(), 110);
        assert_eq!(l.credits().total_for("ACTOR1"), 60);
        for i in 1..=6 {
            assert!(!l.has_transaction(&format!("txn{i}")), "txn{i}");
        }
        for i in 7..=11 {
            assert!(l.has_transaction(&format!("txn{i}")), "txn{i}");
        }
    }

    #[test]
    fn merge_compacts_own_history_only() {
        let mut l1 = ledger("a", 0);
        l1.credit("t1", 10).unwrap();

        let mut l2 = ledger("b", 0);
        l2.debit("t2", 4).unwrap();

        l1.merge(&l2);
        assert_eq!(l1.value(), 6);
        assert!(!l1.has_transaction("t1"));
        assert!(l1.has_transaction("t2"));
    }

    #[test]
    fn config_defaults() {
        let config = LedgerConfig::default();
        assert_eq!(config.actor, "default");
        assert_eq!(config.history_length, 50);
        assert_eq!(config.tag, None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_round_trip() {
        let mut l = ledger("a", 0);
        l.credit("t1", 10).unwrap();
        l.debit("t2", 3).unwrap();

        let json = l.to_json().unwrap();
        assert!(json.starts_with(r#"{"p":{"type":"TGCounter""#));

        let decoded = Ledger::from_json(l.config().clone(), &json).unwrap();
        assert_eq!(decoded, l);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn from_json_reports_type_mismatch() {
        let json = r#"{"p":{"type":"TGCounter","c":{}},"n":{"type":"GCounter","c":{}}}"#;
        let err = Ledger::from_json(LedgerConfig::default(), json).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }
}
