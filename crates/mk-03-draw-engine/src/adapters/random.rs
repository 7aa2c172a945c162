use std::sync::atomic::{AtomicUsize, Ordering};

use rand::Rng;

use crate::ports::RandomSource;

/// Production random source backed by the thread-local `rand` generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandomSource;

impl RandomSource for ThreadRandomSource {
    fn random_usize(&self, max: usize) -> usize {
        if max == 0 {
            return 0;
        }
        rand::thread_rng().gen_range(0..max)
    }
}

/// Deterministic random source for tests.
///
/// Replays `values` in order, wrapping around, each taken modulo `max`.
#[derive(Debug)]
pub struct FixedRandomSource {
    values: Vec<usize>,
    cursor: AtomicUsize,
}

impl FixedRandomSource {
    /// Always the same value.
    pub fn new(value: usize) -> Self {
        Self::sequence(vec![value])
    }

    /// Always the first element.
    pub fn first() -> Self {
        Self::new(0)
    }

    pub fn sequence(values: Vec<usize>) -> Self {
        Self {
            values,
            cursor: AtomicUsize::new(0),
        }
    }
}

impl RandomSource for FixedRandomSource {
    fn random_usize(&self, max: usize) -> usize {
        if max == 0 || self.values.is_empty() {
            return 0;
        }
        let at = self.cursor.fetch_add(1, Ordering::Relaxed) % self.values.len();
        self.values[at] % max
    }
}
