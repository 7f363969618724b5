//! Kick drum voice.
//!
//! A sine wave whose pitch falls off exponentially from 60 Hz. The fast
//! pitch drop is the "punch"; the slower amplitude decay is the body.
//!
//! # How It Works
//!
//! 1. Sine oscillator at `60 * exp(-30t)` Hz
//! 2. Amplitude envelope `exp(-15t)`
//! 3. Scaled to 0.5 to leave headroom for the rest of the kit
//!
//! # Variations
//!
//! - Slower amplitude decay = boomy 808-style kick
//! - Higher start pitch = more "click" on the attack

use super::render_tone;
use crate::dsp::{Decay, Pitch, SineOsc};

/// Render one kick hit into `out`.
pub fn kick(out: &mut [f32], sample_rate: f32) {
    let body = SineOsc::new(Pitch::sweep(60.0, 30.0));
    render_tone(out, sample_rate, body, Decay::new(15.0).with_amplitude(0.5));
}
