//! Percussion voice.
//!
//! A high, fast pitch drop similar to the kick but starting at 800 Hz.
//! Reads as a woodblock or synth "blip".
//!
//! # How It Works
//!
//! 1. Sine at `800 * exp(-20t)` Hz
//! 2. Envelope `exp(-35t)`, amplitude 0.4

use super::render_tone;
use crate::dsp::{Decay, Pitch, SineOsc};

/// Render one perc hit into `out`.
pub fn perc(out: &mut [f32], sample_rate: f32) {
    let blip = SineOsc::new(Pitch::sweep(800.0, 20.0));
    render_tone(out, sample_rate, blip, Decay::new(35.0).with_amplitude(0.4));
}
