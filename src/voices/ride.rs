//! Ride cymbal voice.
//!
//! A pure tone with a slow wobble rather than noise, closer to the bell
//! of a ride than its wash. The long decay gives a flowing, sustained ping.
//!
//! # How It Works
//!
//! 1. Sine at `250 + 10 * sin(50t)` Hz
//! 2. Envelope `exp(-8t)`, amplitude 0.3

use super::render_tone;
use crate::dsp::{Decay, Pitch, SineOsc};

/// Render one ride hit into `out`.
pub fn ride(out: &mut [f32], sample_rate: f32) {
    let bell = SineOsc::new(Pitch::wobble(250.0, 10.0, 50.0));
    render_tone(out, sample_rate, bell, Decay::new(8.0).with_amplitude(0.3));
}
