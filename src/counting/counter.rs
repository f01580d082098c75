//! Single-key counter.

use std::borrow::Borrow;
use std::fmt::Debug;
use std::hash::Hash;

use ahash::AHashMap;

use crate::error::{MltkError, Result};

/// Counts occurrences per key. Missing keys read as zero.
#[derive(Debug, Clone)]
pub struct Counter<K: Eq + Hash> {
    values: AHashMap<K, u64>,
}

impl<K: Eq + Hash + Debug> Counter<K> {
    /// Create an empty counter.
    pub fn new() -> Self {
        Counter {
            values: AHashMap::new(),
        }
    }

    /// Add one to the count for `key`.
    pub fn increment(&mut self, key: K) -> Result<()> {
        self.increment_by(key, 1)
    }

    /// Add `amount` to the count for `key`.
    ///
    /// # Errors
    /// `InvalidArgument` if the count would exceed `u64::MAX`; the stored
    /// count is left unchanged.
    pub fn increment_by(&mut self, key: K, amount: u64) -> Result<()> {
        let current = self.get(&key);
        let updated = current.checked_add(amount).ok_or_else(|| {
            MltkError::invalid_argument(format!(
                "count for {key:?} overflows: {current} + {amount}"
            ))
        })?;
        self.values.insert(key, updated);
        Ok(())
    }

    /// Count for `key`, zero if it was never incremented.
    pub fn get<Q>(&self, key: &Q) -> u64
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.values.get(key).copied().unwrap_or(0)
    }

    /// Iterate over counted keys in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.values.keys()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Eq + Hash + Debug> Default for Counter<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_reads_zero() {
        let counter: Counter<String> = Counter::new();
        assert_eq!(counter.get("absent"), 0);
        assert!(counter.is_empty());
    }

    #[test]
    fn test_increment() {
        let mut counter = Counter::new();
        counter.increment("a".to_string()).unwrap();
        counter.increment("a".to_string()).unwrap();
        counter.increment_by("b".to_string(), 5).unwrap();

        assert_eq!(counter.get("a"), 2);
        assert_eq!(counter.get("b"), 5);
        assert_eq!(counter.len(), 2);
    }

    #[test]
    fn test_increment_overflow() {
        let mut counter = Counter::new();
        counter.increment_by("f", u64::MAX).unwrap();

        let err = counter.increment("f").unwrap_err();
        assert!(matches!(err, MltkError::InvalidArgument(_)));
        assert_eq!(counter.get("f"), u64::MAX);
    }
}
