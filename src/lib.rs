//! # tgcounter
//!
//! A transactional grow-only counter CRDT for offline-first ledgers.
//!
//! Every replica ("actor") records identified transactions on its own. Any
//! two replicas can be merged in any order, any number of times, and they
//! converge to the same value without coordination. Resubmitting a
//! transaction id is detected and ignored, and each replica keeps its own
//! history bounded by folding its transactions into a running total whenever
//! it merges.
//!
//! ## Quick Start
//!
//! ```
//! use tgcounter::prelude::*;
//!
//! let mut c1 = TGCounter::new();
//! c1.increment("device-1", "txn-1", 10).unwrap();
//!
//! let mut c2 = TGCounter::new();
//! c2.increment("device-2", "txn-2", 5).unwrap();
//!
//! c1.merge_as(Some("device-1"), &c2);
//! c2.merge_as(Some("device-2"), &c1);
//! assert_eq!(c1.value(), 15);
//! assert_eq!(c2.value(), 15);
//! ```
//!
//! ## Types
//!
//! - [`TGCounter`] - the replicated counter
//! - [`ActorLedger`] - one actor's compacted total and recent transactions
//! - [`Ledger`] - credits minus debits, built from two counters
//! - [`SnapshotStore`] / [`MemoryStore`] - where serialized snapshots live
//!
//! ## Features
//!
//! - `serde` *(default)*: JSON snapshots and [`Ledger::sync`]
//! - `wasm`: JavaScript bindings
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (compaction and merges at `debug`,
//! individual transactions at `trace`, rejected input at `warn`) and never
//! installs a subscriber itself.

#![warn(missing_docs)]

#[cfg(feature = "serde")]
mod codec;
mod crdt;
mod error;
mod ledger;
mod store;
mod tgcounter;
mod transaction;
#[cfg(feature = "wasm")]
mod wasm;

pub mod prelude;

pub use crdt::{Crdt, DeltaCrdt};
pub use error::{Error, Result};
pub use ledger::{Ledger, LedgerConfig};
pub use store::{MemoryStore, SnapshotStore};
pub use tgcounter::{TGCounter, TGCounterDelta};
pub use transaction::{ActorLedger, Transaction};
