//! Audio output sinks.
//!
//! A sink plays a rendered sound once at a given gain, independently of
//! every other trigger. Sinks start suspended where the platform allows it
//! and are resumed when the transport first starts.

pub mod device;
pub mod mixer;

use std::fmt;

pub use device::CpalSink;
pub use mixer::{channel, Mixer, OfflineSink, Trigger, TriggerQueue, MAX_VOICES, TRIGGER_QUEUE_SIZE};

use crate::synth::RenderedSound;

pub trait AudioSink {
    /// Leave the suspended state. Calling it again is a no-op.
    fn resume(&mut self) -> Result<(), OutputError>;

    /// Fire-and-forget playback of `sound` at `gain`. Overlapping triggers,
    /// including of the same sound, all play to completion.
    fn trigger(&mut self, sound: &RenderedSound, gain: f32);

    /// False when triggers are silently discarded.
    fn is_available(&self) -> bool {
        true
    }

    /// Device sample rate, if there is a device.
    fn sample_rate(&self) -> Option<f32>;
}

impl<S: AudioSink + ?Sized> AudioSink for Box<S> {
    fn resume(&mut self) -> Result<(), OutputError> {
        (**self).resume()
    }

    fn trigger(&mut self, sound: &RenderedSound, gain: f32) {
        (**self).trigger(sound, gain)
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn sample_rate(&self) -> Option<f32> {
        (**self).sample_rate()
    }
}

/// Sink used when no audio output could be opened. Every trigger is a no-op.
#[derive(Debug, Default)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn resume(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn trigger(&mut self, _sound: &RenderedSound, _gain: f32) {}

    fn is_available(&self) -> bool {
        false
    }

    fn sample_rate(&self) -> Option<f32> {
        None
    }
}

/// Errors that can occur when opening or resuming an output device
#[derive(Debug)]
pub enum OutputError {
    /// The host has no default output device
    NoDevice,
    /// The device's default sample format is not f32
    UnsupportedFormat(String),
    /// Querying the default stream config failed
    Config(cpal::DefaultStreamConfigError),
    /// Building the output stream failed
    Build(cpal::BuildStreamError),
    /// Starting the stream failed
    Play(cpal::PlayStreamError),
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputError::NoDevice => write!(f, "no default output device available"),
            OutputError::UnsupportedFormat(format) => {
                write!(f, "unsupported output sample format: {}", format)
            }
            OutputError::Config(err) => write!(f, "failed to fetch default output config: {}", err),
            OutputError::Build(err) => write!(f, "failed to build output stream: {}", err),
            OutputError::Play(err) => write!(f, "failed to start output stream: {}", err),
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OutputError::Config(err) => Some(err),
            OutputError::Build(err) => Some(err),
            OutputError::Play(err) => Some(err),
            _ => None,
        }
    }
}
