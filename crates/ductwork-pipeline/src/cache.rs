//! Single-slot memoization for resolvers.
//!
//! Each resolver owns one slot holding the most recent (call value, result)
//! pair. Call values compare with `serde_json::Value` equality, which is
//! structural for every JSON value (`1` and `1.0` are different values).

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

#[derive(Debug, Clone)]
struct Entry {
  call_value: Value,
  result: Value,
}

/// Remembers the last successful resolution of one resolver.
///
/// Clones share the slot. The lock is never held across an await, so
/// concurrent resolutions are last-write-wins.
#[derive(Debug, Clone, Default)]
pub(crate) struct ResultCache {
  slot: Arc<Mutex<Option<Entry>>>,
}

impl ResultCache {
  pub fn new() -> Self {
    Self::default()
  }

  /// The cached result if `call_value` matches the last stored call.
  pub fn get(&self, call_value: &Value) -> Option<Value> {
    self
      .lock()
      .as_ref()
      .filter(|entry| entry.call_value == *call_value)
      .map(|entry| entry.result.clone())
  }

  /// Replace the slot with a new pair.
  pub fn store(&self, call_value: Value, result: Value) {
    *self.lock() = Some(Entry { call_value, result });
  }

  /// Empty the slot.
  pub fn clear(&self) {
    *self.lock() = None;
  }

  fn lock(&self) -> MutexGuard<'_, Option<Entry>> {
    self.slot.lock().unwrap_or_else(PoisonError::into_inner)
  }
}
