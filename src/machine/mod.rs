//! DrumMachine - the controller that owns all session state
//!
//! Every UI action is a method here. The machine owns the pattern, tracks,
//! rendered sounds, clock and pattern library; front ends never reach into
//! them directly and learn about changes through an [`Observer`].
//!
//! # Example
//!
//! ```ignore
//! use drumgrid::{config::MachineConfig, machine::DrumMachine, output::NullSink,
//!     sequencing::IntervalTimer, store::{MemoryStore, PatternLibrary}};
//!
//! let mut machine = DrumMachine::new(
//!     MachineConfig::new().tempo(100),
//!     NullSink,
//!     PatternLibrary::new(MemoryStore::new()),
//!     IntervalTimer::new(),
//!     (),
//! );
//! machine.toggle_step("Kick", 0)?;
//! machine.play();
//! loop {
//!     machine.poll();
//! }
//! ```

mod dispatch;
pub mod events;

use std::time::Duration;

use rand::{rngs::StdRng, SeedableRng};

pub use events::{DisplayState, MachineEvent, Observer};

use self::dispatch::{Rack, StepDispatch};
use crate::{
    config::{self, clamp_tempo, percent_to_gain, MachineConfig},
    dsp::WhiteNoise,
    output::AudioSink,
    sequencing::{
        Pattern, PatternError, SequencerClock, SequencerState, Timer, Track, RANDOM_DENSITY,
    },
    store::{PatternLibrary, PatternSummary, SaveOutcome, StoreError},
    synth::{KitId, SoundBank},
};

pub struct DrumMachine<S: AudioSink, T: Timer, O: Observer> {
    clock: SequencerClock<T>,
    rack: Rack<S, O>,
    kit: KitId,
    library: PatternLibrary,
    noise: WhiteNoise,
    rng: StdRng,
    fallback_sample_rate: f32,
}

impl<S: AudioSink, T: Timer, O: Observer> DrumMachine<S, T, O> {
    pub fn new(
        config: MachineConfig,
        sink: S,
        library: PatternLibrary,
        timer: T,
        observer: O,
    ) -> Self {
        let (mut noise, rng) = match config.seed {
            Some(seed) => (WhiteNoise::seeded(seed), StdRng::seed_from_u64(seed)),
            None => (WhiteNoise::from_entropy(), StdRng::from_entropy()),
        };

        let tracks = Track::kit(config.track_gain);
        let pattern = Pattern::new(tracks.iter().map(|t| t.name().to_string()));
        let sample_rate = sink.sample_rate().unwrap_or(config.fallback_sample_rate);
        let bank = SoundBank::render(config.kit.clone(), sample_rate, &mut noise);
        let available = sink.is_available();

        let mut machine = Self {
            clock: SequencerClock::new(timer, clamp_tempo(i64::from(config.tempo)), config.master_gain),
            rack: Rack {
                tracks,
                pattern,
                bank,
                sink,
                observer,
            },
            kit: config.kit,
            library,
            noise,
            rng,
            fallback_sample_rate: config.fallback_sample_rate,
        };

        if available {
            machine.rack.status("Ready to play");
        } else {
            log::warn!("no audio output, running silent");
            machine.rack.status("Audio not supported on this system");
        }
        machine
    }

    // --- transport ---

    /// Start the clock from step 0, resuming audio output first.
    pub fn play(&mut self) {
        let master_gain = self.clock.master_gain();
        let started = self.clock.start(&mut StepDispatch {
            rack: &mut self.rack,
            master_gain,
        });
        if started {
            self.rack.notify(MachineEvent::Transport(true));
            self.rack.status("Playing...");
        }
    }

    /// Stop the clock and rewind. Already-triggered sounds ring out.
    pub fn stop(&mut self) {
        let master_gain = self.clock.master_gain();
        let stopped = self.clock.stop(&mut StepDispatch {
            rack: &mut self.rack,
            master_gain,
        });
        if stopped {
            self.rack.notify(MachineEvent::Transport(false));
            self.rack.status("Stopped");
        }
    }

    pub fn toggle_playback(&mut self) {
        if self.is_running() {
            self.stop();
        } else {
            self.play();
        }
    }

    /// Run every tick that is due. Call this from the event loop.
    pub fn poll(&mut self) -> usize {
        let master_gain = self.clock.master_gain();
        self.clock.poll(&mut StepDispatch {
            rack: &mut self.rack,
            master_gain,
        })
    }

    /// Run exactly one tick now, regardless of the timer.
    pub fn tick(&mut self) -> Option<usize> {
        let master_gain = self.clock.master_gain();
        self.clock.tick(&mut StepDispatch {
            rack: &mut self.rack,
            master_gain,
        })
    }

    /// How long the event loop may sleep before the next tick.
    pub fn until_next_tick(&self) -> Option<Duration> {
        self.clock.until_next_tick()
    }

    // --- tempo and levels ---

    /// Set tempo, clamped to [60, 200]. Applies from the next tick.
    pub fn set_tempo(&mut self, bpm: u32) {
        let bpm = clamp_tempo(i64::from(bpm));
        self.apply_tempo(bpm);
        self.rack.status(format!("Tempo set to {} BPM", bpm));
    }

    /// Move tempo by `delta` BPM, clamped to [60, 200].
    pub fn nudge_tempo(&mut self, delta: i32) {
        let bpm = clamp_tempo(i64::from(self.tempo()) + i64::from(delta));
        self.apply_tempo(bpm);
        let direction = if delta >= 0 { "increased" } else { "decreased" };
        self.rack.status(format!("Tempo {} to {} BPM", direction, bpm));
    }

    pub fn tempo_up(&mut self) {
        self.nudge_tempo(config::TEMPO_NUDGE);
    }

    pub fn tempo_down(&mut self) {
        self.nudge_tempo(-config::TEMPO_NUDGE);
    }

    /// Master volume slider, 0-100.
    pub fn set_master_volume(&mut self, percent: u8) {
        let percent = percent.min(100);
        self.clock.set_master_gain(percent_to_gain(percent));
        self.rack.status(format!("Master volume: {}%", percent));
    }

    /// Per-track volume slider, 0-100.
    pub fn set_track_volume(&mut self, track: &str, percent: u8) -> Result<(), PatternError> {
        let track = self
            .rack
            .tracks
            .iter_mut()
            .find(|t| t.name() == track)
            .ok_or_else(|| PatternError::UnknownTrack(track.to_string()))?;
        track.set_volume_percent(percent);
        Ok(())
    }

    // --- kit ---

    /// Switch kit and re-render every sound.
    pub fn select_kit(&mut self, kit: impl Into<KitId>) {
        self.kit = kit.into();
        self.regenerate_sounds();
        self.rack.notify(MachineEvent::KitChanged(self.kit.clone()));
        self.rack.status(format!("Switched to {} kit", self.kit));
        log::info!("kit {}", self.kit);
    }

    fn regenerate_sounds(&mut self) {
        let sample_rate = self
            .rack
            .sink
            .sample_rate()
            .unwrap_or(self.fallback_sample_rate);
        self.rack.bank = SoundBank::render(self.kit.clone(), sample_rate, &mut self.noise);
    }

    // --- pattern editing ---

    /// Flip one step and return its new value.
    pub fn toggle_step(&mut self, track: &str, step: usize) -> Result<bool, PatternError> {
        let active = self.rack.pattern.toggle(track, step)?;
        self.rack.notify(MachineEvent::PatternChanged);
        Ok(active)
    }

    pub fn clear_pattern(&mut self) {
        self.rack.pattern.clear();
        self.rack.notify(MachineEvent::PatternChanged);
        self.rack.status("Pattern cleared");
    }

    /// Every step on with 30% probability, independently.
    pub fn randomize_pattern(&mut self) {
        self.rack.pattern.randomize(&mut self.rng, RANDOM_DENSITY);
        self.rack.notify(MachineEvent::PatternChanged);
        self.rack.status("Random pattern generated");
    }

    /// Play one track's sound immediately at its current levels.
    pub fn trigger_track(&mut self, track: &str) -> Result<(), PatternError> {
        let master_gain = self.clock.master_gain();
        if self.rack.trigger(track, master_gain) {
            Ok(())
        } else {
            Err(PatternError::UnknownTrack(track.to_string()))
        }
    }

    // --- saved patterns ---

    /// Save the current grid, tempo and kit under `name`, replacing any
    /// pattern of the same name. A blank name does nothing.
    pub fn save_pattern(&mut self, name: &str) -> Result<SaveOutcome, StoreError> {
        let tempo = self.tempo();
        let outcome = match self.library.save(name, &self.rack.pattern, tempo, &self.kit) {
            Ok(outcome) => outcome,
            Err(err) => {
                log::error!("saving pattern failed: {}", err);
                self.rack.status(format!("Could not save pattern: {}", err));
                return Err(err);
            }
        };

        if outcome != SaveOutcome::Skipped {
            self.rack.notify(MachineEvent::LibraryChanged);
            self.rack.status(format!("Pattern \"{}\" saved", name.trim()));
        }
        Ok(outcome)
    }

    /// Restore a saved pattern with its tempo and kit. Returns false, with
    /// nothing changed, if no pattern has that name.
    pub fn load_pattern(&mut self, name: &str) -> bool {
        let Some(saved) = self.library.load(name) else {
            log::debug!("no saved pattern named {:?}", name);
            return false;
        };

        self.rack.pattern = saved
            .pattern
            .conform_to(self.rack.tracks.iter().map(|t| t.name()));
        self.apply_tempo(clamp_tempo(i64::from(saved.tempo)));
        self.kit = saved.kit;
        self.regenerate_sounds();

        self.rack.notify(MachineEvent::PatternChanged);
        self.rack.notify(MachineEvent::KitChanged(self.kit.clone()));
        self.rack.status(format!("Pattern \"{}\" loaded", saved.name));
        log::info!("loaded pattern {:?}", saved.name);
        true
    }

    pub fn saved_patterns(&self) -> Vec<PatternSummary> {
        self.library.list()
    }

    fn apply_tempo(&mut self, bpm: u32) {
        self.clock.set_tempo(bpm);
        self.rack.notify(MachineEvent::TempoChanged(bpm));
    }

    // --- accessors ---

    pub fn pattern(&self) -> &Pattern {
        &self.rack.pattern
    }

    pub fn tracks(&self) -> &[Track] {
        &self.rack.tracks
    }

    pub fn track(&self, name: &str) -> Option<&Track> {
        self.rack.track(name)
    }

    pub fn state(&self) -> &SequencerState {
        self.clock.state()
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn current_step(&self) -> usize {
        self.clock.current_step()
    }

    pub fn tempo(&self) -> u32 {
        self.clock.tempo()
    }

    pub fn master_gain(&self) -> f32 {
        self.clock.master_gain()
    }

    pub fn kit(&self) -> &KitId {
        &self.kit
    }

    pub fn sounds(&self) -> &SoundBank {
        &self.rack.bank
    }

    pub fn is_audio_available(&self) -> bool {
        self.rack.sink.is_available()
    }

    pub fn sink(&self) -> &S {
        &self.rack.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.rack.sink
    }

    pub fn observer(&self) -> &O {
        &self.rack.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.rack.observer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        self.clock.timer_mut()
    }
}
