//! Shared test utilities for the grid crates
//!
//! This crate provides reusable, deterministic test infrastructure:
//! - `TestDataBuilder`: Deterministic domain names and vectors
//! - `catalog`: A small embedding catalog with known neighbourhoods
//! - `ScriptedPicks`: Replays a fixed sequence of random choices
//! - `assertions`: Custom assertion helpers
//!
//! # Usage
//!
//! ```
//! use test_utils::{catalog, TestDataBuilder};
//!
//! let builder = TestDataBuilder::from_test_name("my_test");
//! let entries = builder.catalog("shop", 20, 4);
//! assert_eq!(entries[3].0, builder.domain_at("shop", 3));
//!
//! let json = catalog::catalog_json(&entries);
//! assert!(json.starts_with('['));
//! ```

pub mod catalog;

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Builder for test data with deterministic randomization
///
/// This ensures tests are reproducible by using seeded random data.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_seed_grid");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Domain name unique to this builder, e.g. `shop-1234.test`
    pub fn domain(&self, label: &str) -> String {
        format!("{}-{}.test", label, self.seed)
    }

    /// The `index`-th domain of a generated catalog.
    pub fn domain_at(&self, label: &str, index: usize) -> String {
        format!("{}-{}-{}.test", label, self.seed, index)
    }

    /// `count` entries of `dimension`-wide vectors with components in `[-1, 1)`.
    ///
    /// Same seed, same catalog.
    pub fn catalog(&self, label: &str, count: usize, dimension: usize) -> Vec<(String, Vec<f32>)> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        (0..count)
            .map(|i| {
                let vector: Vec<f32> =
                    (0..dimension).map(|_| rng.random_range(-1.0..1.0)).collect();
                (self.domain_at(label, i), vector)
            })
            .collect()
    }
}

/// Replays a fixed list of indices, wrapping each into `0..len`.
///
/// Once the script is exhausted every pick returns index 0.
#[derive(Debug, Default)]
pub struct ScriptedPicks {
    script: Mutex<VecDeque<usize>>,
}

impl ScriptedPicks {
    pub fn new(script: impl IntoIterator<Item = usize>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
        }
    }

    /// Always the first candidate.
    pub fn first() -> Self {
        Self::default()
    }

    pub fn next_index(&self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let mut script = self
            .script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Some(script.pop_front().unwrap_or(0) % len)
    }
}

/// Test assertion helpers
pub mod assertions {
    use std::collections::HashSet;
    use std::fmt::Debug;
    use std::hash::Hash;

    /// Assert that no value appears twice
    pub fn assert_all_unique<T, I>(values: I, context: &str)
    where
        I: IntoIterator<Item = T>,
        T: Eq + Hash + Debug,
    {
        let mut seen = HashSet::new();
        for value in values {
            assert!(
                !seen.contains(&value),
                "{}: duplicate value {:?}",
                context,
                value
            );
            seen.insert(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_builder_deterministic() {
        let builder1 = TestDataBuilder::new(42);
        let builder2 = TestDataBuilder::new(42);

        assert_eq!(builder1.domain("shop"), builder2.domain("shop"));
        assert_eq!(builder1.catalog("shop", 5, 8), builder2.catalog("shop", 5, 8));
    }

    #[test]
    fn test_data_builder_different_names() {
        let builder1 = TestDataBuilder::from_test_name("test1");
        let builder2 = TestDataBuilder::from_test_name("test2");

        // Different test names should generate different data
        assert_ne!(builder1.domain("shop"), builder2.domain("shop"));
    }

    #[test]
    fn test_catalog_components_in_range() {
        let entries = TestDataBuilder::from_test_name("range").catalog("site", 4, 64);
        assert!(entries.iter().all(|(_, v)| v.len() == 64));
        assert!(entries
            .iter()
            .flat_map(|(_, v)| v.iter())
            .all(|c| (-1.0..1.0).contains(c)));
    }

    #[test]
    fn test_catalog_domains_are_unique() {
        let entries = TestDataBuilder::new(7).catalog("site", 50, 2);
        assertions::assert_all_unique(entries.iter().map(|(d, _)| d), "generated domains");
    }

    #[test]
    fn test_scripted_picks_wrap_and_fall_back() {
        let picks = ScriptedPicks::new([1, 5]);
        assert_eq!(picks.next_index(3), Some(1));
        assert_eq!(picks.next_index(3), Some(2));
        assert_eq!(picks.next_index(3), Some(0));
        assert_eq!(picks.next_index(0), None);
    }
}
