//! Noise sources.
//!
//! Noise-based timbres pull one value per sample from a [`NoiseSource`].
//! Production code uses an entropy-seeded generator; tests pass a seeded one
//! so rendered buffers are reproducible.

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Produces uniformly distributed samples in `[-1, 1]`.
pub trait NoiseSource {
    fn next_noise(&mut self) -> f32;
}

/// White noise backed by any `rand` generator.
pub struct WhiteNoise<R: Rng = StdRng> {
    rng: R,
}

impl<R: Rng> WhiteNoise<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl WhiteNoise<StdRng> {
    /// Seeded from the OS entropy source.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Reproducible sequence for tests and offline renders.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> NoiseSource for WhiteNoise<R> {
    #[inline]
    fn next_noise(&mut self) -> f32 {
        self.rng.gen::<f32>() * 2.0 - 1.0
    }
}

impl<N: NoiseSource + ?Sized> NoiseSource for &mut N {
    fn next_noise(&mut self) -> f32 {
        (**self).next_noise()
    }
}
