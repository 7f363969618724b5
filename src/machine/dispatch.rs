//! The step callback: turns "step n is due" into sound triggers.

use crate::{
    output::AudioSink,
    sequencing::{Pattern, StepHandler, Track},
    synth::SoundBank,
};

use super::events::{MachineEvent, Observer};

/// Everything a step needs to make sound, owned by the machine.
pub(crate) struct Rack<S, O> {
    pub tracks: Vec<Track>,
    pub pattern: Pattern,
    pub bank: SoundBank,
    pub sink: S,
    pub observer: O,
}

impl<S: AudioSink, O: Observer> Rack<S, O> {
    pub fn track(&self, name: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.name() == name)
    }

    /// Play one track's sound at its gain scaled by `master_gain`.
    pub fn trigger(&mut self, name: &str, master_gain: f32) -> bool {
        let Some(track) = self.tracks.iter().find(|t| t.name() == name) else {
            return false;
        };
        play_track(&self.bank, &mut self.sink, track, master_gain);
        true
    }

    pub fn notify(&mut self, event: MachineEvent) {
        self.observer.notify(&event);
    }

    pub fn status(&mut self, message: impl Into<String>) {
        self.notify(MachineEvent::Status(message.into()));
    }
}

/// Send `track`'s rendered sound to `sink` at track gain times master gain.
fn play_track<S: AudioSink>(bank: &SoundBank, sink: &mut S, track: &Track, master_gain: f32) {
    sink.trigger(bank.get(track.timbre()), track.gain() * master_gain);
}

/// Borrowed view handed to the clock for one transition or tick.
pub(crate) struct StepDispatch<'a, S, O> {
    pub rack: &'a mut Rack<S, O>,
    pub master_gain: f32,
}

impl<S: AudioSink, O: Observer> StepHandler for StepDispatch<'_, S, O> {
    fn on_start(&mut self) {
        if let Err(err) = self.rack.sink.resume() {
            log::warn!("could not resume audio output: {}", err);
            self.rack.status(format!("Audio unavailable: {}", err));
        }
    }

    fn on_step(&mut self, step: usize) {
        let rack = &mut *self.rack;
        for row in rack.pattern.rows() {
            if !row.steps[step] {
                continue;
            }
            if let Some(track) = rack.tracks.iter().find(|t| t.name() == row.track) {
                play_track(&rack.bank, &mut rack.sink, track, self.master_gain);
            }
        }
        rack.observer.notify(&MachineEvent::StepChanged(Some(step)));
    }

    fn on_stop(&mut self) {
        self.rack.notify(MachineEvent::StepChanged(None));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dsp::WhiteNoise,
        output::OutputError,
        sequencing::{ManualTimer, SequencerClock},
        synth::{KitId, RenderedSound},
    };

    #[derive(Default)]
    struct Gains(Vec<f32>);

    impl AudioSink for Gains {
        fn resume(&mut self) -> Result<(), OutputError> {
            Ok(())
        }

        fn trigger(&mut self, _sound: &RenderedSound, gain: f32) {
            self.0.push(gain);
        }

        fn sample_rate(&self) -> Option<f32> {
            Some(8_000.0)
        }
    }

    fn rack() -> Rack<Gains, ()> {
        let mut tracks = Track::kit(0.8);
        tracks[1].set_volume_percent(50);
        let mut pattern = Pattern::new(tracks.iter().map(|t| t.name().to_string()));
        pattern.set("Snare", 0, true).unwrap();
        Rack {
            tracks,
            pattern,
            bank: SoundBank::render(KitId::default(), 8_000.0, &mut WhiteNoise::seeded(3)),
            sink: Gains::default(),
            observer: (),
        }
    }

    #[test]
    fn step_and_preview_use_the_same_gain() {
        let mut rack = rack();
        let mut clock = SequencerClock::new(ManualTimer::new(), 120, 0.6);
        let mut dispatch = StepDispatch {
            rack: &mut rack,
            master_gain: 0.6,
        };
        clock.start(&mut dispatch);
        clock.tick(&mut dispatch);

        assert!(rack.trigger("Snare", 0.6));
        assert!(!rack.trigger("Cowbell", 0.6));
        assert_eq!(rack.sink.0.len(), 2);
        assert!((rack.sink.0[0] - 0.3).abs() < 1e-6);
        assert_eq!(rack.sink.0[0], rack.sink.0[1]);
    }
}
