pub mod config; // Machine defaults and builder
pub mod dsp; // Envelope, oscillator and noise primitives
pub mod machine; // Controller tying clock, pattern, sounds and storage together
pub mod output; // Audio sinks and the realtime mixer
pub mod sequencing; // Tracks, patterns and the step clock
pub mod store; // Saved pattern persistence
pub mod synth; // Timbre rendering and sound banks
pub mod voices; // One recipe per percussion timbre

/// Steps in one pattern cycle (sixteenth notes of a 4/4 bar).
pub const STEPS: usize = 16;
/// Fixed number of tracks in the grid.
pub const TRACK_COUNT: usize = 8;
/// Length of every rendered sound, in seconds.
pub const SOUND_SECONDS: f32 = 0.5;

pub const MIN_BPM: u32 = 60;
pub const MAX_BPM: u32 = 200;

pub const MAX_BLOCK_SIZE: usize = 2048;
