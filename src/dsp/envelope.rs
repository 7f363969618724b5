/*
Exponential Decay Envelope
==========================

Every percussion sound in the kit is a one-shot: it is struck, rings, and
dies away. There is no gate to hold and no release to trigger, so the full
ADSR machinery collapses to a single curve:

    level(t) = amplitude * e^(-rate * t)

  Level
    A   ┐╲
        │ ╲
        │  ╲__
        │     ╲____
    0.0 └──────────╲______________──→ Time

  rate        How quickly the sound dies. Larger is shorter. A rate of 50
              (closed hat) falls below 1% in ~92ms; a rate of 8 (ride)
              takes ~575ms.

  amplitude   Peak level at t = 0. Folded into the envelope so voices can
              state "sine * exp(-15t) * 0.5" as one envelope.

The level is evaluated in closed form from absolute time, so every sample
is exact and independent of block boundaries.

Time constant reference (level reaches 1/e after 1/rate seconds):

    rate 50 → 20ms     rate 25 → 40ms     rate 10 → 100ms
    rate 35 → 29ms     rate 20 → 50ms     rate 8  → 125ms
*/

/// One-shot exponential decay: `amplitude * exp(-rate * t)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decay {
    rate: f32,
    amplitude: f32,
}

impl Decay {
    /// Unity-amplitude decay.
    pub fn new(rate: f32) -> Self {
        Self {
            rate: rate.max(0.0),
            amplitude: 1.0,
        }
    }

    /// Scale the peak level.
    pub fn with_amplitude(mut self, amplitude: f32) -> Self {
        self.amplitude = amplitude;
        self
    }

    /// Envelope level `t` seconds after the hit.
    #[inline]
    pub fn level(&self, t: f32) -> f32 {
        self.amplitude * (-self.rate * t).exp()
    }
}
