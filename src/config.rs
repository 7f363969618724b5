//! Machine configuration
//!
//! Defaults match a fresh session: 120 BPM, master volume 70%, every track
//! at 80%, electronic kit.
//!
//! ```ignore
//! use drumgrid::config::MachineConfig;
//!
//! let config = MachineConfig::new()
//!     .tempo(96)
//!     .master_volume(50)
//!     .seed(7);
//! ```

use std::path::PathBuf;

use crate::{sequencing::DEFAULT_TRACK_GAIN, synth::KitId, MAX_BPM, MIN_BPM};

/// Overrides the saved pattern directory.
pub const DATA_DIR_ENV: &str = "DRUMGRID_DATA_DIR";
/// `env_logger` filter for the binary.
pub const LOG_ENV: &str = "DRUMGRID_LOG";

pub const DEFAULT_TEMPO: u32 = 120;
pub const DEFAULT_MASTER_GAIN: f32 = 0.7;
/// Sample rate used to render sounds when no device reports one.
pub const FALLBACK_SAMPLE_RATE: f32 = 44_100.0;
/// BPM change per tempo nudge.
pub const TEMPO_NUDGE: i32 = 5;

/// Clamp a requested tempo into [60, 200] BPM.
pub fn clamp_tempo(bpm: i64) -> u32 {
    bpm.clamp(i64::from(MIN_BPM), i64::from(MAX_BPM)) as u32
}

/// Slider position 0-100 to gain 0.0-1.0.
pub fn percent_to_gain(percent: u8) -> f32 {
    f32::from(percent.min(100)) / 100.0
}

/// `$DRUMGRID_DATA_DIR`, else `<platform data dir>/drumgrid`.
pub fn default_data_dir() -> Option<PathBuf> {
    match std::env::var_os(DATA_DIR_ENV) {
        Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => dirs::data_dir().map(|dir| dir.join("drumgrid")),
    }
}

#[derive(Debug, Clone)]
pub struct MachineConfig {
    pub tempo: u32,
    pub master_gain: f32,
    pub track_gain: f32,
    pub kit: KitId,
    pub fallback_sample_rate: f32,
    /// Seed for noise and pattern randomization; entropy when `None`
    pub seed: Option<u64>,
    pub data_dir: Option<PathBuf>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            tempo: DEFAULT_TEMPO,
            master_gain: DEFAULT_MASTER_GAIN,
            track_gain: DEFAULT_TRACK_GAIN,
            kit: KitId::default(),
            fallback_sample_rate: FALLBACK_SAMPLE_RATE,
            seed: None,
            data_dir: None,
        }
    }
}

impl MachineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial tempo, clamped to [60, 200]
    pub fn tempo(mut self, bpm: u32) -> Self {
        self.tempo = clamp_tempo(i64::from(bpm));
        self
    }

    /// Initial master volume, 0-100
    pub fn master_volume(mut self, percent: u8) -> Self {
        self.master_gain = percent_to_gain(percent);
        self
    }

    /// Initial volume of every track, 0-100
    pub fn track_volume(mut self, percent: u8) -> Self {
        self.track_gain = percent_to_gain(percent);
        self
    }

    pub fn kit(mut self, kit: impl Into<KitId>) -> Self {
        self.kit = kit.into();
        self
    }

    pub fn fallback_sample_rate(mut self, sample_rate: f32) -> Self {
        self.fallback_sample_rate = sample_rate;
        self
    }

    /// Make noise timbres and randomized patterns reproducible
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Explicit data dir, else the environment/platform default.
    pub fn resolved_data_dir(&self) -> Option<PathBuf> {
        self.data_dir.clone().or_else(default_data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = MachineConfig::default();
        assert_eq!(config.tempo, 120);
        assert!((config.master_gain - 0.7).abs() < 1e-6);
        assert!((config.track_gain - 0.8).abs() < 1e-6);
        assert_eq!(config.kit.as_str(), "electronic");
    }

    #[test]
    fn builder_clamps() {
        let config = MachineConfig::new().tempo(10).master_volume(180).track_volume(25);
        assert_eq!(config.tempo, MIN_BPM);
        assert_eq!(config.master_gain, 1.0);
        assert!((config.track_gain - 0.25).abs() < 1e-6);
        assert_eq!(MachineConfig::new().tempo(999).tempo, MAX_BPM);
    }

    #[test]
    fn clamp_tempo_bounds() {
        assert_eq!(clamp_tempo(-5), 60);
        assert_eq!(clamp_tempo(59), 60);
        assert_eq!(clamp_tempo(128), 128);
        assert_eq!(clamp_tempo(205), 200);
    }

    #[test]
    fn explicit_data_dir_wins() {
        let config = MachineConfig::new().data_dir("/tmp/somewhere");
        assert_eq!(config.resolved_data_dir(), Some(PathBuf::from("/tmp/somewhere")));
    }
}
