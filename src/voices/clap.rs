//! Clap voice.
//!
//! Noise with a decay between the closed and open hats.

use super::render_noise;
use crate::dsp::{Decay, NoiseSource};

/// Render one clap: noise at 0.3 under `exp(-30t)`.
pub fn clap<N: NoiseSource + ?Sized>(out: &mut [f32], sample_rate: f32, noise: &mut N) {
    render_noise(out, sample_rate, noise, 0.3, Decay::new(30.0));
}
