//! Low-level DSP primitives used by the percussion voices.
//!
//! Everything here is a pure function of time (seconds since the hit) except
//! the noise source, which is the one piece of injectable state. Voices
//! combine a signal and an envelope sample by sample.

/// Exponential decay envelope.
pub mod envelope;
/// Random sources for noise-based timbres.
pub mod noise;
/// Sine oscillator with pitch contours.
pub mod oscillator;

pub use envelope::Decay;
pub use noise::{NoiseSource, WhiteNoise};
pub use oscillator::{Pitch, SineOsc};
