//! # Outbound Ports
//!
//! Randomness is injected so draws are reproducible under test.

/// Uniform index source.
pub trait RandomSource: Send + Sync {
    /// Index in `0..max`. Returns 0 when `max` is 0.
    fn random_usize(&self, max: usize) -> usize;
}

impl<R: RandomSource + ?Sized> RandomSource for std::sync::Arc<R> {
    fn random_usize(&self, max: usize) -> usize {
        (**self).random_usize(max)
    }
}
