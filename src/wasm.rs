//! WebAssembly bindings.
//!
//! Enable with the `wasm` feature:
//!
//! ```toml
//! [dependencies]
//! tgcounter = { version = "0.1", features = ["wasm"] }
//! ```
//!
//! Errors are thrown as JavaScript `Error`s.

use js_sys::Array;
use wasm_bindgen::prelude::*;

use crate::Crdt;

// ── TGCounter ───────────────────────────────────────────────────────

/// A transactional grow-only counter for use from JavaScript.
#[wasm_bindgen(js_name = TGCounter)]
#[derive(Default)]
pub struct WasmTGCounter {
    inner: crate::TGCounter,
}

#[wasm_bindgen(js_class = TGCounter)]
impl WasmTGCounter {
    /// Create an empty counter.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `amount` under `transaction` for `actor`.
    pub fn increment(&mut self, actor: &str, transaction: &str, amount: u64) -> Result<(), JsError> {
        Ok(self.inner.increment(actor, transaction, amount)?)
    }

    /// Whether the transaction is still tracked.
    #[wasm_bindgen(js_name = hasTransaction)]
    pub fn has_transaction(&self, transaction: &str) -> bool {
        self.inner.has_transaction(transaction)
    }

    /// Get the total counter value across all actors.
    pub fn value(&self) -> u64 {
        self.inner.value()
    }

    /// Merge another counter without compacting anything.
    pub fn merge(&mut self, other: &WasmTGCounter) {
        self.inner.merge(&other.inner);
    }

    /// Merge another counter as the owner of `actor`, compacting its history.
    #[wasm_bindgen(js_name = mergeAs)]
    pub fn merge_as(&mut self, actor: &str, other: &WasmTGCounter) {
        self.inner.merge_as(Some(actor), &other.inner);
    }

    /// All observed actor ids.
    pub fn actors(&self) -> Array {
        self.inner.actors().map(JsValue::from_str).collect()
    }

    /// Serialize to the JSON snapshot format.
    #[wasm_bindgen(js_name = toJson)]
    pub fn to_json(&self) -> Result<String, JsError> {
        Ok(self.inner.to_json()?)
    }

    /// Decode a JSON snapshot.
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(json: &str) -> Result<WasmTGCounter, JsError> {
        Ok(Self {
            inner: crate::TGCounter::from_json(json)?,
        })
    }
}

// ── Ledger ──────────────────────────────────────────────────────────

/// A credit/debit ledger for use from JavaScript.
#[wasm_bindgen(js_name = Ledger)]
pub struct WasmLedger {
    inner: crate::Ledger,
}

#[wasm_bindgen(js_class = Ledger)]
impl WasmLedger {
    /// Create an empty ledger for `actor`.
    #[wasm_bindgen(constructor)]
    pub fn new(actor: &str, history_length: usize) -> Self {
        let config = crate::LedgerConfig::new(actor).with_history_length(history_length);
        Self {
            inner: crate::Ledger::new(config),
        }
    }

    /// Record a credit.
    pub fn credit(&mut self, transaction: &str, amount: u64) -> Result<(), JsError> {
        Ok(self.inner.credit(transaction, amount)?)
    }

    /// Record a debit.
    pub fn debit(&mut self, transaction: &str, amount: u64) -> Result<(), JsError> {
        Ok(self.inner.debit(transaction, amount)?)
    }

    /// Get the current balance (credits - debits).
    pub fn value(&self) -> i64 {
        self.inner.value()
    }

    /// Whether the transaction is still tracked on either side.
    #[wasm_bindgen(js_name = hasTransaction)]
    pub fn has_transaction(&self, transaction: &str) -> bool {
        self.inner.has_transaction(transaction)
    }

    /// Merge another replica's ledger, compacting this replica's history.
    pub fn merge(&mut self, other: &WasmLedger) {
        self.inner.merge(&other.inner);
    }

    /// Serialize as `{"p": credits, "n": debits}`.
    #[wasm_bindgen(js_name = toJson)]
    pub fn to_json(&self) -> Result<String, JsError> {
        Ok(self.inner.to_json()?)
    }

    /// Decode a ledger snapshot for `actor`.
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(actor: &str, history_length: usize, json: &str) -> Result<WasmLedger, JsError> {
        let config = crate::LedgerConfig::new(actor).with_history_length(history_length);
        Ok(Self {
            inner: crate::Ledger::from_json(config, json)?,
        })
    }
}
