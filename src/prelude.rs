//! Convenient re-exports for common usage.
//!
//! ```
//! use tgcounter::prelude::*;
//! ```

pub use crate::ActorLedger;
pub use crate::Crdt;
pub use crate::DeltaCrdt;
pub use crate::Ledger;
pub use crate::LedgerConfig;
pub use crate::TGCounter;
pub use crate::Transaction;
