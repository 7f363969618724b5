use std::sync::Arc;

use crate::{dsp::NoiseSource, SOUND_SECONDS};

use super::{generate, KitId, Timbre};

/// Immutable rendered buffer, cheap to clone and share with the audio thread.
#[derive(Debug, Clone)]
pub struct RenderedSound {
    samples: Arc<[f32]>,
    sample_rate: f32,
}

impl RenderedSound {
    pub fn new(samples: Vec<f32>, sample_rate: f32) -> Self {
        Self {
            samples: samples.into(),
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Shared handle to the sample data.
    pub fn shared(&self) -> Arc<[f32]> {
        Arc::clone(&self.samples)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn duration(&self) -> f32 {
        if self.sample_rate > 0.0 {
            self.len() as f32 / self.sample_rate
        } else {
            0.0
        }
    }

    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
    }
}

/// Every timbre of one kit, rendered at one sample rate.
#[derive(Debug, Clone)]
pub struct SoundBank {
    kit: KitId,
    sample_rate: f32,
    sounds: Vec<RenderedSound>,
}

impl SoundBank {
    /// Render all timbres for `kit`.
    pub fn render<N: NoiseSource + ?Sized>(kit: KitId, sample_rate: f32, noise: &mut N) -> Self {
        let sounds = Timbre::ALL
            .into_iter()
            .map(|timbre| {
                let samples = generate(timbre, &kit, sample_rate, SOUND_SECONDS, noise);
                RenderedSound::new(samples, sample_rate)
            })
            .collect();

        log::debug!("rendered sound bank for kit {kit} at {sample_rate} Hz");
        Self {
            kit,
            sample_rate,
            sounds,
        }
    }

    pub fn get(&self, timbre: Timbre) -> &RenderedSound {
        &self.sounds[timbre.index()]
    }

    pub fn kit(&self) -> &KitId {
        &self.kit
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}
