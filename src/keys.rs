//! Result key generation

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic source of result keys, unique for the lifetime of the process
pub struct KeySequence {
  next: AtomicU64,
}

impl KeySequence {
  pub fn new() -> Self {
    Self {
      next: AtomicU64::new(1),
    }
  }

  /// Produce the next key, formatted as `{prefix}_{n}`
  pub fn next_key(&self, prefix: &str) -> String {
    let n = self.next.fetch_add(1, Ordering::Relaxed);
    format!("{}_{}", prefix, n)
  }
}

impl Default for KeySequence {
  fn default() -> Self {
    Self::new()
  }
}
