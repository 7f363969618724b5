//! App - event loop and key bindings

use std::time::Duration;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;
use rtrb::Consumer;

use drumgrid::{
    machine::{DisplayState, DrumMachine},
    output::AudioSink,
    sequencing::IntervalTimer,
    store::PatternSummary,
    STEPS,
};

use super::ui;

pub type Machine = DrumMachine<Box<dyn AudioSink>, IntervalTimer, DisplayState>;

/// Redraw at least this often (~60fps) even when the clock is idle
const FRAME: Duration = Duration::from_millis(16);

/// Samples kept for the level meter
pub const METER_WINDOW: usize = 2048;

/// Kits offered by the kit selector, in cycle order
const KITS: [&str; 3] = ["electronic", "acoustic", "vintage"];

const VOLUME_STEP: u8 = 10;

pub enum Mode {
    Grid,
    /// Typing a name to save under
    Naming(String),
    /// Picking a saved pattern to load
    Loading {
        entries: Vec<PatternSummary>,
        selected: usize,
    },
}

pub struct App {
    pub machine: Machine,
    /// Mixed output samples from the audio thread
    audio_rx: Consumer<f32>,
    pub audio_buffer: Vec<f32>,
    /// Peak of each drained chunk, newest last
    pub level_history: Vec<u64>,
    pub cursor_track: usize,
    pub cursor_step: usize,
    pub mode: Mode,
    should_quit: bool,
}

impl App {
    pub fn new(machine: Machine, audio_rx: Consumer<f32>) -> Self {
        Self {
            machine,
            audio_rx,
            audio_buffer: vec![0.0; METER_WINDOW],
            level_history: Vec::new(),
            cursor_track: 0,
            cursor_step: 0,
            mode: Mode::Grid,
            should_quit: false,
        }
    }

    pub fn run(mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.machine.poll();
            self.poll_audio();

            terminal.draw(|frame| ui::render(frame, &self))?;

            let timeout = self
                .machine
                .until_next_tick()
                .map_or(FRAME, |next| next.min(FRAME));
            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        self.machine.stop();
        Ok(())
    }

    fn poll_audio(&mut self) {
        let mut new_samples = Vec::new();
        while let Ok(sample) = self.audio_rx.pop() {
            new_samples.push(sample);
        }
        if new_samples.is_empty() {
            return;
        }

        let peak = new_samples.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        self.level_history.push((peak * 100.0) as u64);
        if self.level_history.len() > 256 {
            self.level_history.remove(0);
        }

        self.audio_buffer.extend(new_samples);
        if self.audio_buffer.len() > METER_WINDOW {
            let excess = self.audio_buffer.len() - METER_WINDOW;
            self.audio_buffer.drain(0..excess);
        }
    }

    fn cursor_track_name(&self) -> String {
        self.machine.tracks()[self.cursor_track].name().to_string()
    }

    fn set_status(&mut self, message: &str) {
        self.machine.observer_mut().status = message.to_string();
    }

    fn handle_key(&mut self, key: KeyCode) {
        match std::mem::replace(&mut self.mode, Mode::Grid) {
            Mode::Grid => self.handle_grid_key(key),
            Mode::Naming(name) => self.handle_naming_key(key, name),
            Mode::Loading { entries, selected } => self.handle_loading_key(key, entries, selected),
        }
    }

    fn handle_grid_key(&mut self, key: KeyCode) {
        let track_count = self.machine.tracks().len();
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,

            KeyCode::Left => self.cursor_step = (self.cursor_step + STEPS - 1) % STEPS,
            KeyCode::Right => self.cursor_step = (self.cursor_step + 1) % STEPS,
            KeyCode::Up => self.cursor_track = (self.cursor_track + track_count - 1) % track_count,
            KeyCode::Down => self.cursor_track = (self.cursor_track + 1) % track_count,

            KeyCode::Char(' ') | KeyCode::Enter => {
                let track = self.cursor_track_name();
                if let Err(err) = self.machine.toggle_step(&track, self.cursor_step) {
                    log::error!("toggle failed: {}", err);
                }
            }
            KeyCode::Char('p') => self.machine.toggle_playback(),
            KeyCode::Char('t') => {
                let track = self.cursor_track_name();
                if let Err(err) = self.machine.trigger_track(&track) {
                    log::error!("preview failed: {}", err);
                }
            }

            KeyCode::Char('+') | KeyCode::Char('=') => self.machine.tempo_up(),
            KeyCode::Char('-') => self.machine.tempo_down(),

            KeyCode::Char(']') => self.nudge_master(true),
            KeyCode::Char('[') => self.nudge_master(false),
            KeyCode::Char('.') => self.nudge_track_volume(true),
            KeyCode::Char(',') => self.nudge_track_volume(false),

            KeyCode::Char('k') => self.next_kit(),
            KeyCode::Char('c') => self.machine.clear_pattern(),
            KeyCode::Char('r') => self.machine.randomize_pattern(),

            KeyCode::Char('s') => self.mode = Mode::Naming(String::new()),
            KeyCode::Char('l') => {
                let entries = self.machine.saved_patterns();
                if entries.is_empty() {
                    self.set_status("No saved patterns");
                } else {
                    self.mode = Mode::Loading {
                        entries,
                        selected: 0,
                    };
                }
            }
            _ => {}
        }
    }

    fn handle_naming_key(&mut self, key: KeyCode, mut name: String) {
        match key {
            KeyCode::Esc => {}
            KeyCode::Enter => {
                // Failures are already reported on the status line
                let _ = self.machine.save_pattern(&name);
            }
            KeyCode::Backspace => {
                name.pop();
                self.mode = Mode::Naming(name);
            }
            KeyCode::Char(c) => {
                name.push(c);
                self.mode = Mode::Naming(name);
            }
            _ => self.mode = Mode::Naming(name),
        }
    }

    fn handle_loading_key(&mut self, key: KeyCode, entries: Vec<PatternSummary>, selected: usize) {
        let selected = match key {
            KeyCode::Esc => return,
            KeyCode::Enter => {
                if let Some(entry) = entries.get(selected) {
                    self.machine.load_pattern(&entry.name);
                }
                return;
            }
            KeyCode::Up => selected.saturating_sub(1),
            KeyCode::Down => (selected + 1).min(entries.len().saturating_sub(1)),
            _ => selected,
        };
        self.mode = Mode::Loading { entries, selected };
    }

    fn nudge_master(&mut self, up: bool) {
        let percent = (self.machine.master_gain() * 100.0).round() as u8;
        let percent = if up {
            percent.saturating_add(VOLUME_STEP).min(100)
        } else {
            percent.saturating_sub(VOLUME_STEP)
        };
        self.machine.set_master_volume(percent);
    }

    fn nudge_track_volume(&mut self, up: bool) {
        let track = &self.machine.tracks()[self.cursor_track];
        let name = track.name().to_string();
        let percent = if up {
            track.volume_percent().saturating_add(VOLUME_STEP).min(100)
        } else {
            track.volume_percent().saturating_sub(VOLUME_STEP)
        };
        if self.machine.set_track_volume(&name, percent).is_ok() {
            self.set_status(&format!("{} volume: {}%", name, percent));
        }
    }

    fn next_kit(&mut self) {
        let current = KITS
            .iter()
            .position(|kit| *kit == self.machine.kit().as_str())
            .unwrap_or(0);
        self.machine.select_kit(KITS[(current + 1) % KITS.len()]);
    }
}
