//! Hi-hat voice (closed).
//!
//! A tight burst of noise. Closed hi-hats are the backbone of most drum
//! patterns, so the decay is the fastest in the kit.

use super::render_noise;
use crate::dsp::{Decay, NoiseSource};

/// Render one closed hi-hat hit: noise at 0.4 under `exp(-50t)`.
pub fn hihat<N: NoiseSource + ?Sized>(out: &mut [f32], sample_rate: f32, noise: &mut N) {
    render_noise(out, sample_rate, noise, 0.4, Decay::new(50.0));
}
