//! Step clock - decides *when* steps happen, never *what* they play
//!
//! The clock is a two-state machine:
//!
//! ```text
//!            start()                 tick(): on_step(cursor)
//!   ┌─────────┐ ─────────→ ┌─────────┐ ──┐    cursor = (cursor + 1) % 16
//!   │ Stopped │            │ Running │ ←─┘
//!   └─────────┘ ←───────── └─────────┘
//!            stop()
//! ```
//!
//! Both transitions reset the cursor to 0. Ticks arrive from a [`Timer`]
//! armed with one sixteenth note at the current tempo; a tempo change while
//! running re-arms the timer so the new interval applies from the next tick.

use std::time::Duration;

use super::timer::Timer;
use crate::STEPS;

/// Nanoseconds in one quarter of a minute (a sixteenth note at 1 BPM).
const SIXTEENTH_AT_ONE_BPM_NS: u64 = 15_000_000_000;

/// Length of one step (a sixteenth note) at `bpm`: `15000 / bpm` ms.
pub fn step_interval(bpm: u32) -> Duration {
    Duration::from_nanos(SIXTEENTH_AT_ONE_BPM_NS / u64::from(bpm.max(1)))
}

/// Callbacks the clock drives. The handler owns every playback and display
/// decision.
pub trait StepHandler {
    /// Called once per stopped → running transition, before the first tick.
    fn on_start(&mut self) {}

    /// Called each tick with the step about to be played.
    fn on_step(&mut self, step: usize);

    /// Called once per running → stopped transition.
    fn on_stop(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Stopped,
    Running,
}

/// Transport state owned by the clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequencerState {
    /// Step the next tick will play, in `0..16`
    pub current_step: usize,
    /// Tempo in BPM; callers keep it in [60, 200]
    pub tempo_bpm: u32,
    pub state: ClockState,
    /// Master gain in [0, 1]
    pub master_gain: f32,
}

impl SequencerState {
    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }
}

/// Tempo-locked sixteen step cursor
pub struct SequencerClock<T: Timer> {
    timer: T,
    state: SequencerState,
}

impl<T: Timer> SequencerClock<T> {
    pub fn new(timer: T, tempo_bpm: u32, master_gain: f32) -> Self {
        Self {
            timer,
            state: SequencerState {
                current_step: 0,
                tempo_bpm,
                state: ClockState::Stopped,
                master_gain: master_gain.clamp(0.0, 1.0),
            },
        }
    }

    /// Begin ticking from step 0. Returns false if already running.
    pub fn start<H: StepHandler + ?Sized>(&mut self, handler: &mut H) -> bool {
        if self.is_running() {
            return false;
        }

        handler.on_start();
        self.state.current_step = 0;
        self.state.state = ClockState::Running;
        self.timer.arm(self.interval());
        log::info!("clock started at {} BPM", self.state.tempo_bpm);
        true
    }

    /// Cancel ticking and rewind to step 0. Returns false if not running.
    pub fn stop<H: StepHandler + ?Sized>(&mut self, handler: &mut H) -> bool {
        if !self.is_running() {
            return false;
        }

        self.timer.disarm();
        self.state.state = ClockState::Stopped;
        self.state.current_step = 0;
        handler.on_stop();
        log::info!("clock stopped");
        true
    }

    /// Change tempo. While running, the timer is restarted with the new
    /// interval; phase within the current step is not preserved.
    pub fn set_tempo(&mut self, bpm: u32) {
        self.state.tempo_bpm = bpm;
        if self.is_running() {
            self.timer.arm(self.interval());
        }
        log::debug!("tempo {} BPM, step {:?}", bpm, self.interval());
    }

    pub fn set_master_gain(&mut self, gain: f32) {
        self.state.master_gain = if gain.is_nan() { 0.0 } else { gain.clamp(0.0, 1.0) };
    }

    /// Play the current step, then advance the cursor.
    ///
    /// Returns the step that was played, or `None` while stopped.
    pub fn tick<H: StepHandler + ?Sized>(&mut self, handler: &mut H) -> Option<usize> {
        if !self.is_running() {
            return None;
        }

        let step = self.state.current_step;
        handler.on_step(step);
        self.state.current_step = (step + 1) % STEPS;
        Some(step)
    }

    /// Deliver every tick the timer has due. Returns how many fired.
    pub fn poll<H: StepHandler + ?Sized>(&mut self, handler: &mut H) -> usize {
        let mut fired = 0;
        while self.is_running() && self.timer.fire() {
            self.tick(handler);
            fired += 1;
        }
        fired
    }

    pub fn interval(&self) -> Duration {
        step_interval(self.state.tempo_bpm)
    }

    /// Time until the next tick is due, `None` while stopped.
    pub fn until_next_tick(&self) -> Option<Duration> {
        if self.is_running() {
            self.timer.until_next()
        } else {
            None
        }
    }

    pub fn state(&self) -> &SequencerState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn current_step(&self) -> usize {
        self.state.current_step
    }

    pub fn tempo(&self) -> u32 {
        self.state.tempo_bpm
    }

    pub fn master_gain(&self) -> f32 {
        self.state.master_gain
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencing::timer::ManualTimer;

    #[derive(Default)]
    struct Recorder {
        starts: usize,
        stops: usize,
        steps: Vec<usize>,
    }

    impl StepHandler for Recorder {
        fn on_start(&mut self) {
            self.starts += 1;
        }

        fn on_step(&mut self, step: usize) {
            self.steps.push(step);
        }

        fn on_stop(&mut self) {
            self.stops += 1;
        }
    }

    fn clock(bpm: u32) -> SequencerClock<ManualTimer> {
        SequencerClock::new(ManualTimer::new(), bpm, 0.7)
    }

    #[test]
    fn interval_is_a_sixteenth_note() {
        assert_eq!(step_interval(120), Duration::from_millis(125));
        assert_eq!(step_interval(60), Duration::from_millis(250));
        assert_eq!(step_interval(200), Duration::from_millis(75));
        for bpm in 60..=200u32 {
            let expected_ms = 15_000.0 / bpm as f64;
            let actual_ms = step_interval(bpm).as_secs_f64() * 1000.0;
            assert!((actual_ms - expected_ms).abs() < 1e-6, "{bpm} BPM");
        }
    }

    #[test]
    fn seventeen_ticks_wrap_once() {
        let mut clock = clock(120);
        let mut rec = Recorder::default();
        clock.start(&mut rec);

        for _ in 0..17 {
            clock.tick(&mut rec);
        }

        let expected: Vec<usize> = (0..16).chain(std::iter::once(0)).collect();
        assert_eq!(rec.steps, expected);
        assert_eq!(clock.current_step(), 1);
    }

    #[test]
    fn start_is_idempotent() {
        let mut clock = clock(120);
        let mut rec = Recorder::default();

        assert!(clock.start(&mut rec));
        clock.tick(&mut rec);
        assert!(!clock.start(&mut rec));
        assert_eq!(rec.starts, 1);
        assert_eq!(clock.current_step(), 1, "second start must not rewind");
    }

    #[test]
    fn stop_is_idempotent_and_rewinds() {
        let mut clock = clock(120);
        let mut rec = Recorder::default();

        assert!(!clock.stop(&mut rec));
        assert_eq!(rec.stops, 0);

        clock.start(&mut rec);
        for _ in 0..5 {
            clock.tick(&mut rec);
        }
        assert!(clock.stop(&mut rec));
        assert_eq!(clock.current_step(), 0);
        assert_eq!(rec.stops, 1);
        assert!(!clock.timer().is_armed());
    }

    #[test]
    fn restart_always_begins_at_zero() {
        let mut clock = clock(90);
        let mut rec = Recorder::default();

        for ticks in [0usize, 3, 15, 16, 21] {
            clock.start(&mut rec);
            for _ in 0..ticks {
                clock.tick(&mut rec);
            }
            clock.stop(&mut rec);
            clock.start(&mut rec);
            rec.steps.clear();
            clock.tick(&mut rec);
            assert_eq!(rec.steps, vec![0], "after {ticks} ticks");
            clock.stop(&mut rec);
        }
    }

    #[test]
    fn stopped_clock_does_not_tick() {
        let mut clock = clock(120);
        let mut rec = Recorder::default();
        assert_eq!(clock.tick(&mut rec), None);
        clock.timer_mut().advance(Duration::from_secs(1));
        assert_eq!(clock.poll(&mut rec), 0);
        assert!(rec.steps.is_empty());
    }

    #[test]
    fn poll_follows_timer() {
        let mut clock = clock(120);
        let mut rec = Recorder::default();
        clock.start(&mut rec);

        clock.timer_mut().advance(Duration::from_millis(124));
        assert_eq!(clock.poll(&mut rec), 0);

        clock.timer_mut().advance(Duration::from_millis(1));
        assert_eq!(clock.poll(&mut rec), 1);

        clock.timer_mut().advance(Duration::from_millis(500));
        assert_eq!(clock.poll(&mut rec), 4);
        assert_eq!(rec.steps, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn tempo_change_rearms_only_while_running() {
        let mut clock = clock(120);
        let mut rec = Recorder::default();

        clock.set_tempo(100);
        assert_eq!(clock.timer().arm_count(), 0);

        clock.start(&mut rec);
        clock.timer_mut().advance(Duration::from_millis(100));
        clock.set_tempo(200);
        assert_eq!(clock.timer().interval(), Some(Duration::from_millis(75)));
        assert_eq!(clock.until_next_tick(), Some(Duration::from_millis(75)));

        // cursor is untouched by a tempo change
        clock.timer_mut().advance(Duration::from_millis(75));
        clock.poll(&mut rec);
        assert_eq!(rec.steps, vec![0]);
    }

    #[test]
    fn clock_does_not_clamp_tempo() {
        let mut clock = clock(120);
        clock.set_tempo(400);
        assert_eq!(clock.tempo(), 400);
        assert_eq!(clock.interval(), Duration::from_micros(37_500));
    }
}
