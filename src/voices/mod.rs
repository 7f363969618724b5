//! Percussion voice recipes.
//!
//! Each voice fills a buffer with one hit, sample index `i` mapped to time
//! `t = i / sample_rate`. Tonal voices are deterministic; noise voices pull
//! one value per sample from the supplied [`NoiseSource`].
//!
//! # Example
//!
//! ```ignore
//! use drumgrid::{dsp::WhiteNoise, voices};
//!
//! let mut buf = vec![0.0f32; 22_050];
//! voices::kick(&mut buf, 44_100.0);
//! voices::snare(&mut buf, 44_100.0, &mut WhiteNoise::seeded(1));
//! ```

use crate::dsp::{Decay, NoiseSource, SineOsc};

mod clap;
mod crash;
mod hihat;
mod kick;
mod openhat;
mod perc;
mod ride;
mod snare;

pub use clap::clap;
pub use crash::crash;
pub use hihat::hihat;
pub use kick::kick;
pub use openhat::openhat;
pub use perc::perc;
pub use ride::ride;
pub use snare::snare;

/// `sine(t) * env(t)` for every sample.
fn render_tone(out: &mut [f32], sample_rate: f32, osc: SineOsc, env: Decay) {
    for (i, sample) in out.iter_mut().enumerate() {
        let t = i as f32 / sample_rate;
        *sample = osc.sample(t) * env.level(t);
    }
}

/// `noise * level * env(t)` for every sample.
fn render_noise<N: NoiseSource + ?Sized>(
    out: &mut [f32],
    sample_rate: f32,
    noise: &mut N,
    level: f32,
    env: Decay,
) {
    for (i, sample) in out.iter_mut().enumerate() {
        let t = i as f32 / sample_rate;
        *sample = noise.next_noise() * level * env.level(t);
    }
}
