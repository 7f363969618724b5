use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{dsp::NoiseSource, voices};

/// The eight percussion recipes, in grid order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timbre {
    Kick,
    Snare,
    HiHat,
    OpenHat,
    Clap,
    Crash,
    Ride,
    Perc,
}

impl Timbre {
    pub const ALL: [Timbre; 8] = [
        Timbre::Kick,
        Timbre::Snare,
        Timbre::HiHat,
        Timbre::OpenHat,
        Timbre::Clap,
        Timbre::Crash,
        Timbre::Ride,
        Timbre::Perc,
    ];

    /// Display name, also used as the track name.
    pub fn name(self) -> &'static str {
        match self {
            Timbre::Kick => "Kick",
            Timbre::Snare => "Snare",
            Timbre::HiHat => "Hi-Hat",
            Timbre::OpenHat => "Open Hat",
            Timbre::Clap => "Clap",
            Timbre::Crash => "Crash",
            Timbre::Ride => "Ride",
            Timbre::Perc => "Perc",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Position in [`Timbre::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub(crate) fn render_into<N: NoiseSource + ?Sized>(
        self,
        out: &mut [f32],
        sample_rate: f32,
        noise: &mut N,
    ) {
        match self {
            Timbre::Kick => voices::kick(out, sample_rate),
            Timbre::Snare => voices::snare(out, sample_rate, noise),
            Timbre::HiHat => voices::hihat(out, sample_rate, noise),
            Timbre::OpenHat => voices::openhat(out, sample_rate, noise),
            Timbre::Clap => voices::clap(out, sample_rate, noise),
            Timbre::Crash => voices::crash(out, sample_rate, noise),
            Timbre::Ride => voices::ride(out, sample_rate),
            Timbre::Perc => voices::perc(out, sample_rate),
        }
    }
}

impl fmt::Display for Timbre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifier of a sound kit, persisted with saved patterns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KitId(String);

impl KitId {
    pub const ELECTRONIC: &'static str = "electronic";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for KitId {
    fn default() -> Self {
        Self::new(Self::ELECTRONIC)
    }
}

impl fmt::Display for KitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for KitId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}
