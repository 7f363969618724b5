//! Output to the default audio device through cpal.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::SampleFormat;
use rtrb::Producer;

use super::mixer::{self, TriggerQueue, MAX_VOICES, TRIGGER_QUEUE_SIZE};
use super::{AudioSink, OutputError};
use crate::{synth::RenderedSound, MAX_BLOCK_SIZE};

/// Device sink. The stream is opened paused and only starts on `resume`.
pub struct CpalSink {
    stream: cpal::Stream,
    queue: TriggerQueue,
    sample_rate: f32,
    resumed: bool,
}

impl CpalSink {
    /// Open the default output device.
    ///
    /// `tap`, if given, receives a copy of every mixed mono sample.
    pub fn open(tap: Option<Producer<f32>>) -> Result<Self, OutputError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(OutputError::NoDevice)?;
        let config = device
            .default_output_config()
            .map_err(OutputError::Config)?;

        if config.sample_format() != SampleFormat::F32 {
            return Err(OutputError::UnsupportedFormat(format!(
                "{:?}",
                config.sample_format()
            )));
        }

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        let (queue, mut mixer) = mixer::channel(TRIGGER_QUEUE_SIZE, MAX_VOICES);
        mixer.set_tap(tap);

        let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];
        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _| {
                    let total_frames = data.len() / channels;
                    let mut frames_written = 0;

                    while frames_written < total_frames {
                        let frames_remaining = total_frames - frames_written;
                        let frames_to_render = frames_remaining.min(MAX_BLOCK_SIZE);

                        let block = &mut render_buf[..frames_to_render];
                        mixer.render_block(block);

                        // Mono to all channels
                        let out_off = frames_written * channels;
                        for (i, &s) in block.iter().enumerate() {
                            for ch in 0..channels {
                                data[out_off + i * channels + ch] = s;
                            }
                        }

                        frames_written += frames_to_render;
                    }
                },
                |err| log::error!("Audio stream error: {}", err),
                None,
            )
            .map_err(OutputError::Build)?;

        // Some hosts start streams on creation
        if let Err(err) = stream.pause() {
            log::debug!("could not pause new stream: {}", err);
        }

        log::info!("audio output: {} Hz, {} channels", sample_rate, channels);

        Ok(Self {
            stream,
            queue,
            sample_rate,
            resumed: false,
        })
    }
}

impl AudioSink for CpalSink {
    fn resume(&mut self) -> Result<(), OutputError> {
        if self.resumed {
            return Ok(());
        }
        self.stream.play().map_err(OutputError::Play)?;
        self.resumed = true;
        log::info!("audio output resumed");
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
