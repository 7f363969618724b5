//! Crash cymbal voice.
//!
//! A big noise wash. Crashes mark transitions and accents, so this is the
//! slowest noise decay in the kit and still audible at the end of the
//! half-second buffer.

use super::render_noise;
use crate::dsp::{Decay, NoiseSource};

/// Render one crash: noise at 0.4 under `exp(-10t)`.
pub fn crash<N: NoiseSource + ?Sized>(out: &mut [f32], sample_rate: f32, noise: &mut N) {
    render_noise(out, sample_rate, noise, 0.4, Decay::new(10.0));
}
