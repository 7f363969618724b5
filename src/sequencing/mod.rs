pub mod clock;
pub mod pattern;
pub mod timer;
pub mod track;

pub use clock::{step_interval, ClockState, SequencerClock, SequencerState, StepHandler};
pub use pattern::{Pattern, PatternError, PatternRow, RANDOM_DENSITY};
pub use timer::{IntervalTimer, ManualTimer, Timer};
pub use track::{Track, DEFAULT_TRACK_GAIN};
