use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use std::sync::Mutex;

/// Source of uniform choices, injectable for reproducible runs and tests.
pub trait RandomSource: Send + Sync {
    /// Uniform index in `0..len`, `None` when `len == 0`.
    fn pick_index(&self, len: usize) -> Option<usize>;

    fn pick_one<'a>(&self, candidates: &'a [String]) -> Option<&'a String> {
        self.pick_index(candidates.len())
            .and_then(|idx| candidates.get(idx))
    }
}

/// Thread-local RNG; the production default.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick_index(&self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let mut rng = rand::rng();
        Some(rng.random_range(0..len))
    }
}

/// Deterministic RNG seeded from a `u64`.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn pick_index(&self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Some(rng.random_range(0..len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<String> {
        (0..10).map(|i| format!("site{}.com", i)).collect()
    }

    #[test]
    fn test_empty_candidates() {
        assert!(ThreadRandom.pick_one(&[]).is_none());
        assert!(SeededRandom::new(1).pick_one(&[]).is_none());
    }

    #[test]
    fn test_thread_random_stays_in_bounds() {
        let candidates = candidates();
        for _ in 0..100 {
            let picked = ThreadRandom.pick_one(&candidates).unwrap();
            assert!(candidates.contains(picked));
        }
    }

    #[test]
    fn test_seeded_random_is_reproducible() {
        let candidates = candidates();
        let a = SeededRandom::new(42);
        let b = SeededRandom::new(42);

        let picks_a: Vec<_> = (0..20).map(|_| a.pick_one(&candidates).cloned()).collect();
        let picks_b: Vec<_> = (0..20).map(|_| b.pick_one(&candidates).cloned()).collect();
        assert_eq!(picks_a, picks_b);
    }

    #[test]
    fn test_single_candidate_always_chosen() {
        let only = vec!["only.com".to_string()];
        assert_eq!(SeededRandom::new(7).pick_one(&only), Some(&only[0]));
    }
}

#[cfg(test)]
impl RandomSource for test_utils::ScriptedPicks {
    fn pick_index(&self, len: usize) -> Option<usize> {
        self.next_index(len)
    }
}
