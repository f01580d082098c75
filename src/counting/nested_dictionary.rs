//! Two-key ordered dictionary.

use std::borrow::Borrow;
use std::collections::BTreeMap;

/// Maps `(outer, inner)` key pairs to values, iterating in key order.
///
/// The trained model stores `(label, feature) -> probability` here so that
/// model files are written in a stable order.
#[derive(Debug, Clone, PartialEq)]
pub struct NestedDictionary<K: Ord, V> {
    values: BTreeMap<K, BTreeMap<K, V>>,
}

impl<K: Ord, V> NestedDictionary<K, V> {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        NestedDictionary {
            values: BTreeMap::new(),
        }
    }

    /// Store `value` under `(outer, inner)`, returning the previous value.
    pub fn insert(&mut self, outer: K, inner: K, value: V) -> Option<V> {
        self.values.entry(outer).or_default().insert(inner, value)
    }

    /// Value under `(outer, inner)`, if any.
    pub fn get<Q>(&self, outer: &Q, inner: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.values.get(outer).and_then(|row| row.get(inner))
    }

    /// Value under `(outer, inner)`, or `default` when absent.
    pub fn safe_get<Q>(&self, outer: &Q, inner: &Q, default: V) -> V
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        V: Copy,
    {
        self.get(outer, inner).copied().unwrap_or(default)
    }

    /// Whether a value exists under `(outer, inner)`.
    pub fn contains<Q>(&self, outer: &Q, inner: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(outer, inner).is_some()
    }

    /// The inner map stored under `outer`.
    pub fn row<Q>(&self, outer: &Q) -> Option<&BTreeMap<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.values.get(outer)
    }

    /// Outer keys in order.
    pub fn outer_keys(&self) -> impl Iterator<Item = &K> {
        self.values.keys()
    }

    /// Iterate over `(outer, inner, value)` in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &K, &V)> {
        self.values
            .iter()
            .flat_map(|(outer, row)| row.iter().map(move |(inner, value)| (outer, inner, value)))
    }

    /// Total number of stored values.
    pub fn len(&self) -> usize {
        self.values.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: Ord, V> Default for NestedDictionary<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
