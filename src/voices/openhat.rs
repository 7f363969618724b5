//! Open hi-hat voice.
//!
//! The same noise source as the closed hat, slightly quieter, left to ring
//! longer. The slower envelope is what distinguishes open from closed.

use super::render_noise;
use crate::dsp::{Decay, NoiseSource};

/// Render one open hi-hat hit: noise at 0.3 under `exp(-20t)`.
pub fn openhat<N: NoiseSource + ?Sized>(out: &mut [f32], sample_rate: f32, noise: &mut N) {
    render_noise(out, sample_rate, noise, 0.3, Decay::new(20.0));
}
