//! Snare drum voice.
//!
//! A tonal body plus noise for the wire rattle. Real snares have metal
//! wires stretched across the bottom head that buzz when the drum is
//! struck; broadband noise stands in for them.
//!
//! # How It Works
//!
//! 1. Noise at 0.3 for the rattle
//! 2. 200 Hz sine at 0.2 for the drum head
//! 3. Both share one envelope, `exp(-25t)`
//!
//! # Variations
//!
//! - More noise = trashy, lo-fi snare
//! - Less noise = more "tom" like

use crate::dsp::{Decay, NoiseSource, Pitch, SineOsc};

/// Render one snare hit into `out`.
pub fn snare<N: NoiseSource + ?Sized>(out: &mut [f32], sample_rate: f32, noise: &mut N) {
    let body = SineOsc::new(Pitch::fixed(200.0));
    let env = Decay::new(25.0);

    for (i, sample) in out.iter_mut().enumerate() {
        let t = i as f32 / sample_rate;
        let rattle = noise.next_noise() * 0.3;
        let tone = body.sample(t) * 0.2;
        *sample = (rattle + tone) * env.level(t);
    }
}
