//! Track - one row of the grid bound to one timbre
//!
//! The set of tracks is fixed at startup. Identity (name and timbre) never
//! changes; only the gain does.

use crate::synth::Timbre;

/// Gain new tracks start with.
pub const DEFAULT_TRACK_GAIN: f32 = 0.8;

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    name: String,
    timbre: Timbre,
    gain: f32,
}

impl Track {
    /// Create a track named after its timbre
    pub fn new(timbre: Timbre, gain: f32) -> Self {
        let mut track = Self {
            name: timbre.name().to_string(),
            timbre,
            gain: 0.0,
        };
        track.set_gain(gain);
        track
    }

    /// The fixed eight-track kit, in grid order
    pub fn kit(gain: f32) -> Vec<Track> {
        Timbre::ALL.into_iter().map(|t| Track::new(t, gain)).collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timbre(&self) -> Timbre {
        self.timbre
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Set gain, clamped to [0, 1]
    pub fn set_gain(&mut self, gain: f32) {
        self.gain = if gain.is_nan() { 0.0 } else { gain.clamp(0.0, 1.0) };
    }

    /// Slider position 0-100 mapped to gain
    pub fn set_volume_percent(&mut self, percent: u8) {
        self.set_gain(f32::from(percent.min(100)) / 100.0);
    }

    /// Gain as a rounded slider position
    pub fn volume_percent(&self) -> u8 {
        (self.gain * 100.0).round() as u8
    }
}
