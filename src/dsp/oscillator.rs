use std::f32::consts::TAU;

/*
Sine Oscillator with Pitch Contours
===================================

The tonal voices (kick, ride, perc, and the body of the snare) are all a
single sine wave whose frequency is a function of time since the hit:

    sample(t) = sin(2π · f(t) · t)

Note that f(t) multiplies t directly rather than being integrated into a
running phase. For a falling f(t) this makes the perceived sweep steeper
than f(t) alone suggests, which is part of the characteristic "zap" of
these recipes. Keep it that way; an integrated phase sounds softer.

Pitch Contours:
---------------

Fixed: constant frequency.
  - Use: snare body (200 Hz)

Exponential sweep: start · e^(-rate · t)
  - Sound: a drop from `start` toward 0 Hz. Fast rates give a click,
    slow rates a "boing".
  - Use: kick (60 Hz, rate 30), perc (800 Hz, rate 20)

Wobble: center + depth · sin(rate · t)
  - Sound: slow vibrato around `center`. `rate` is in radians per second.
  - Use: ride (250 Hz ± 10 Hz at 50 rad/s)

Example usage:
  let kick_body = SineOsc::new(Pitch::sweep(60.0, 30.0));
  let ride_bell = SineOsc::new(Pitch::wobble(250.0, 10.0, 50.0));
*/

/// Frequency as a function of time since the hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pitch {
    Fixed(f32),
    Sweep { start: f32, rate: f32 },
    Wobble { center: f32, depth: f32, rate: f32 },
}

impl Pitch {
    pub fn fixed(freq: f32) -> Self {
        Pitch::Fixed(freq)
    }

    pub fn sweep(start: f32, rate: f32) -> Self {
        Pitch::Sweep { start, rate }
    }

    pub fn wobble(center: f32, depth: f32, rate: f32) -> Self {
        Pitch::Wobble {
            center,
            depth,
            rate,
        }
    }

    /// Frequency in Hz at time `t` seconds.
    #[inline]
    pub fn at(&self, t: f32) -> f32 {
        match *self {
            Pitch::Fixed(freq) => freq,
            Pitch::Sweep { start, rate } => start * (-rate * t).exp(),
            Pitch::Wobble {
                center,
                depth,
                rate,
            } => center + depth * (rate * t).sin(),
        }
    }
}

/// Stateless sine evaluated at absolute time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SineOsc {
    pitch: Pitch,
}

impl SineOsc {
    pub fn new(pitch: Pitch) -> Self {
        Self { pitch }
    }

    #[inline]
    pub fn sample(&self, t: f32) -> f32 {
        (TAU * self.pitch.at(t) * t).sin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_sine_matches_reference() {
        let sample_rate = 48_000.0;
        let osc = SineOsc::new(Pitch::fixed(200.0));

        let sample_index = 12;
        let t = sample_index as f32 / sample_rate;
        let expected = (TAU * 200.0 * t).sin();
        let actual = osc.sample(t);
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn sweep_starts_at_start_frequency_and_falls() {
        let pitch = Pitch::sweep(800.0, 20.0);
        assert_eq!(pitch.at(0.0), 800.0);
        assert!(pitch.at(0.1) < pitch.at(0.05));
        assert!((pitch.at(0.05) - 800.0 * (-1.0f32).exp()).abs() < 1e-3);
    }

    #[test]
    fn wobble_stays_within_depth() {
        let pitch = Pitch::wobble(250.0, 10.0, 50.0);
        for i in 0..1000 {
            let f = pitch.at(i as f32 * 0.001);
            assert!((240.0..=260.0).contains(&f), "frequency {f} outside wobble");
        }
    }

    #[test]
    fn silent_at_time_zero() {
        let osc = SineOsc::new(Pitch::sweep(60.0, 30.0));
        assert_eq!(osc.sample(0.0), 0.0);
    }
}
