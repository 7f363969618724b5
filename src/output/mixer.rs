/*
One-Shot Voice Mixer
====================

The control thread decides when sounds start; the audio thread decides what
the speaker hears. The two meet at a lock-free SPSC queue:

    control thread                      audio thread
    ──────────────                      ────────────
    TriggerQueue::send ──[ rtrb ]──→ Mixer::render_block
                                          │
                                          ├─ start a PlayingVoice per Trigger
                                          ├─ sum every voice into the block
                                          └─ drop voices that reached the end

Each trigger gets its own voice, so a fast retrigger of the same sound layers
on top of the previous hit instead of cutting it off. The voice pool is
allocated up front; when it is full the oldest voice is stolen.

Nothing in `render_block` allocates. The only deallocation that can happen
on the audio thread is the last `Arc` of a sound bank that was replaced
while one of its sounds was still playing.
*/

use std::sync::Arc;

use rtrb::{Consumer, Producer, RingBuffer};

use super::AudioSink;
use crate::synth::RenderedSound;

/// Simultaneous voices before the oldest is stolen.
pub const MAX_VOICES: usize = 64;
/// Triggers that can be in flight between the control and audio threads.
pub const TRIGGER_QUEUE_SIZE: usize = 256;

/// Request to play one sound once.
pub struct Trigger {
    samples: Arc<[f32]>,
    gain: f32,
}

/// Control-thread end of the trigger queue.
pub struct TriggerQueue {
    tx: Producer<Trigger>,
}

impl TriggerQueue {
    /// Queue `sound` at `gain`. Returns false if the queue was full and the
    /// trigger was dropped.
    pub fn send(&mut self, sound: &RenderedSound, gain: f32) -> bool {
        let trigger = Trigger {
            samples: sound.shared(),
            gain: if gain.is_nan() { 0.0 } else { gain.clamp(0.0, 1.0) },
        };
        self.tx.push(trigger).is_ok()
    }
}

struct PlayingVoice {
    samples: Arc<[f32]>,
    gain: f32,
    position: usize,
}

/// Audio-thread end: sums all playing voices.
pub struct Mixer {
    rx: Consumer<Trigger>,
    voices: Vec<PlayingVoice>,
    max_voices: usize,
    tap: Option<Producer<f32>>,
}

/// Create a connected queue and mixer.
pub fn channel(queue_size: usize, max_voices: usize) -> (TriggerQueue, Mixer) {
    let (tx, rx) = RingBuffer::<Trigger>::new(queue_size);
    let max_voices = max_voices.max(1);
    let mixer = Mixer {
        rx,
        voices: Vec::with_capacity(max_voices),
        max_voices,
        tap: None,
    };
    (TriggerQueue { tx }, mixer)
}

impl Mixer {
    /// Copy every mixed sample into `tap` (for metering). Samples that do
    /// not fit are dropped.
    pub fn set_tap(&mut self, tap: Option<Producer<f32>>) {
        self.tap = tap;
    }

    /// Number of voices currently sounding.
    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    pub fn render_block(&mut self, out: &mut [f32]) {
        while let Ok(trigger) = self.rx.pop() {
            if self.voices.len() == self.max_voices {
                // Voices are kept in start order, so the front is the oldest
                self.voices.remove(0);
            }
            self.voices.push(PlayingVoice {
                samples: trigger.samples,
                gain: trigger.gain,
                position: 0,
            });
        }

        out.fill(0.0);
        for voice in &mut self.voices {
            let remaining = &voice.samples[voice.position.min(voice.samples.len())..];
            let n = remaining.len().min(out.len());
            for (o, &s) in out[..n].iter_mut().zip(remaining) {
                *o += s * voice.gain;
            }
            voice.position += n;
        }
        self.voices.retain(|v| v.position < v.samples.len());

        for sample in out.iter_mut() {
            *sample = sample.clamp(-1.0, 1.0);
        }

        if let Some(tap) = self.tap.as_mut() {
            for &sample in out.iter() {
                if tap.push(sample).is_err() {
                    break;
                }
            }
        }
    }
}

/// Sink that mixes in the calling thread instead of on a device.
///
/// Used for offline rendering and for tests.
pub struct OfflineSink {
    queue: TriggerQueue,
    mixer: Mixer,
    sample_rate: f32,
    resumed: bool,
}

impl OfflineSink {
    pub fn new(sample_rate: f32) -> Self {
        let (queue, mixer) = channel(TRIGGER_QUEUE_SIZE, MAX_VOICES);
        Self {
            queue,
            mixer,
            sample_rate,
            resumed: false,
        }
    }

    /// Mix the next `frames` samples.
    pub fn render(&mut self, frames: usize) -> Vec<f32> {
        let mut out = vec![0.0f32; frames];
        for block in out.chunks_mut(crate::MAX_BLOCK_SIZE) {
            self.mixer.render_block(block);
        }
        out
    }

    pub fn is_resumed(&self) -> bool {
        self.resumed
    }

    pub fn active_voices(&self) -> usize {
        self.mixer.active_voices()
    }
}

impl AudioSink for OfflineSink {
    fn resume(&mut self) -> Result<(), super::OutputError> {
        self.resumed = true;
        Ok(())
    }

    fn trigger(&mut self, sound: &RenderedSound, gain: f32) {
        if !self.queue.send(sound, gain) {
            log::warn!("trigger queue full, dropping hit");
        }
    }

    fn sample_rate(&self) -> Option<f32> {
        Some(self.sample_rate)
    }
}
