//! Notifications from the machine to whatever renders it.

use crate::synth::KitId;

#[derive(Debug, Clone, PartialEq)]
pub enum MachineEvent {
    /// Step being played, or `None` once the transport stops
    StepChanged(Option<usize>),
    /// Transport started (`true`) or stopped (`false`)
    Transport(bool),
    TempoChanged(u32),
    KitChanged(KitId),
    /// Grid contents changed (toggle, clear, randomize, load)
    PatternChanged,
    /// Saved pattern list changed
    LibraryChanged,
    /// Human-readable status line
    Status(String),
}

/// Receives every [`MachineEvent`] in the order it happened.
pub trait Observer {
    fn notify(&mut self, event: &MachineEvent);
}

/// Ignore everything.
impl Observer for () {
    fn notify(&mut self, _event: &MachineEvent) {}
}

/// Keep everything, mostly for tests.
impl Observer for Vec<MachineEvent> {
    fn notify(&mut self, event: &MachineEvent) {
        self.push(event.clone());
    }
}

/// Latest step and status only, enough to draw a transport bar.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DisplayState {
    pub current_step: Option<usize>,
    pub status: String,
}

impl Observer for DisplayState {
    fn notify(&mut self, event: &MachineEvent) {
        match event {
            MachineEvent::StepChanged(step) => self.current_step = *step,
            MachineEvent::Status(message) => self.status.clone_from(message),
            _ => {}
        }
    }
}
