//! Two-key counter.

use std::borrow::Borrow;
use std::fmt::Debug;
use std::hash::Hash;

use ahash::{AHashMap, AHashSet};

use crate::error::{MltkError, Result};

/// Counts occurrences per `(outer, inner)` key pair. Missing pairs read as zero.
///
/// Used with `(label, feature)` pairs during training and with
/// `(true label, system label)` pairs in the confusion matrix.
#[derive(Debug, Clone)]
pub struct NestedCounter<K: Eq + Hash> {
    values: AHashMap<K, AHashMap<K, u64>>,
}

impl<K: Eq + Hash + Clone + Debug> NestedCounter<K> {
    /// Create an empty counter.
    pub fn new() -> Self {
        NestedCounter {
            values: AHashMap::new(),
        }
    }

    /// Add one to the count for `(outer, inner)`.
    pub fn increment(&mut self, outer: K, inner: K) -> Result<()> {
        self.increment_by(outer, inner, 1)
    }

    /// Add `amount` to the count for `(outer, inner)`.
    ///
    /// # Errors
    /// `InvalidArgument` if the count would exceed `u64::MAX`; the stored
    /// count is left unchanged.
    pub fn increment_by(&mut self, outer: K, inner: K, amount: u64) -> Result<()> {
        let current = self.get(&outer, &inner);
        let updated = current.checked_add(amount).ok_or_else(|| {
            MltkError::invalid_argument(format!(
                "count for ({outer:?}, {inner:?}) overflows: {current} + {amount}"
            ))
        })?;
        self.values.entry(outer).or_default().insert(inner, updated);
        Ok(())
    }

    /// Count for `(outer, inner)`, zero if never incremented.
    pub fn get<Q>(&self, outer: &Q, inner: &Q) -> u64
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.values
            .get(outer)
            .and_then(|row| row.get(inner))
            .copied()
            .unwrap_or(0)
    }

    /// Outer keys that have at least one count.
    pub fn outer_keys(&self) -> impl Iterator<Item = &K> {
        self.values.keys()
    }

    /// Every key seen in either position.
    pub fn all_keys(&self) -> AHashSet<K> {
        let mut keys = AHashSet::new();
        for (outer, row) in &self.values {
            keys.insert(outer.clone());
            keys.extend(row.keys().cloned());
        }
        keys
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.values.values().flat_map(|row| row.values()).sum()
    }

    /// Number of distinct outer keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Eq + Hash + Clone + Debug> Default for NestedCounter<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_and_get() {
        let mut counter = NestedCounter::new();
        counter.increment("spam".to_string(), "free".to_string()).unwrap();
        counter.increment("spam".to_string(), "free".to_string()).unwrap();
        counter
            .increment_by("ham".to_string(), "meeting".to_string(), 4)
            .unwrap();

        assert_eq!(counter.get("spam", "free"), 2);
        assert_eq!(counter.get("ham", "meeting"), 4);
        assert_eq!(counter.get("ham", "free"), 0);
        assert_eq!(counter.get("unknown", "free"), 0);
    }

    #[test]
    fn test_totals_and_keys() {
        let mut counter = NestedCounter::new();
        counter.increment("a", "x").unwrap();
        counter.increment("a", "y").unwrap();
        counter.increment("b", "x").unwrap();

        assert_eq!(counter.total(), 3);
        assert_eq!(counter.len(), 2);

        let keys = counter.all_keys();
        assert_eq!(keys.len(), 4);
        assert!(keys.contains("x") && keys.contains("b"));
    }

    #[test]
    fn test_increment_overflow() {
        let mut counter = NestedCounter::new();
        counter.increment_by("a", "f", u64::MAX).unwrap();

        let err = counter.increment_by("a", "f", 2).unwrap_err();
        assert!(matches!(err, MltkError::InvalidArgument(_)));
        assert_eq!(counter.get("a", "f"), u64::MAX);
        // Other pairs are unaffected.
        counter.increment_by("a", "g", u64::MAX).unwrap();
    }
}
