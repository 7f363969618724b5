//! Procedural synthesis of the kit's timbres.
//!
//! [`generate`] renders one timbre into a fresh buffer; [`SoundBank`] holds
//! the pre-rendered buffer for every timbre of the active kit and is rebuilt
//! wholesale whenever the kit changes.

pub mod bank;
pub mod timbre;

pub use bank::{RenderedSound, SoundBank};
pub use timbre::{KitId, Timbre};

use crate::dsp::NoiseSource;

/// Number of samples in a buffer of `duration` seconds.
pub fn sample_count(sample_rate: f32, duration: f32) -> usize {
    let n = (sample_rate as f64 * duration as f64).round();
    if n.is_finite() && n > 0.0 {
        n as usize
    } else {
        0
    }
}

/// Render `timbre` for `duration` seconds at `sample_rate`.
///
/// Always succeeds, whether or not an audio device exists. Every kit
/// currently renders the same recipes; the kit is accepted so banks can be
/// keyed and regenerated by it.
pub fn generate<N: NoiseSource + ?Sized>(
    timbre: Timbre,
    kit: &KitId,
    sample_rate: f32,
    duration: f32,
    noise: &mut N,
) -> Vec<f32> {
    let mut buffer = vec![0.0f32; sample_count(sample_rate, duration)];
    log::trace!("rendering {} for kit {} ({} samples)", timbre, kit, buffer.len());
    timbre.render_into(&mut buffer, sample_rate, noise);

    debug_assert!(buffer.iter().all(|s| (-1.0..=1.0).contains(s)));
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dsp::WhiteNoise, SOUND_SECONDS};

    #[test]
    fn every_timbre_has_exact_length_and_range() {
        let kit = KitId::default();
        for &sample_rate in &[8_000.0f32, 22_050.0, 44_100.0, 48_000.0] {
            let expected = (sample_rate * SOUND_SECONDS).round() as usize;
            for timbre in Timbre::ALL {
                let mut noise = WhiteNoise::seeded(5);
                let buf = generate(timbre, &kit, sample_rate, SOUND_SECONDS, &mut noise);
                assert_eq!(buf.len(), expected, "{timbre} at {sample_rate}");
                assert!(
                    buf.iter().all(|s| (-1.0..=1.0).contains(s)),
                    "{timbre} out of range"
                );
            }
        }
    }

    #[test]
    fn odd_sample_rate_rounds_length() {
        let buf = generate(
            Timbre::Kick,
            &KitId::default(),
            11_025.0,
            0.5,
            &mut WhiteNoise::seeded(0),
        );
        // 5512.5 rounds half away from zero
        assert_eq!(buf.len(), 5_513);
    }

    #[test]
    fn kick_matches_formula() {
        let sample_rate = 44_100.0;
        let buf = generate(
            Timbre::Kick,
            &KitId::default(),
            sample_rate,
            0.5,
            &mut WhiteNoise::seeded(0),
        );
        for &i in &[0usize, 1, 100, 4_410, 20_000] {
            let t = i as f32 / sample_rate;
            let freq = 60.0 * (-30.0 * t).exp();
            let expected = (std::f32::consts::TAU * freq * t).sin() * (-15.0 * t).exp() * 0.5;
            assert!((buf[i] - expected).abs() < 1e-5, "sample {i}");
        }
    }

    #[test]
    fn tonal_timbres_ignore_noise() {
        let kit = KitId::default();
        for timbre in [Timbre::Kick, Timbre::Ride, Timbre::Perc] {
            let a = generate(timbre, &kit, 22_050.0, 0.5, &mut WhiteNoise::seeded(1));
            let b = generate(timbre, &kit, 22_050.0, 0.5, &mut WhiteNoise::seeded(2));
            assert_eq!(a, b, "{timbre} should be deterministic");
        }
    }

    #[test]
    fn noise_timbres_follow_the_seed() {
        let kit = KitId::default();
        let a = generate(Timbre::Crash, &kit, 22_050.0, 0.5, &mut WhiteNoise::seeded(9));
        let b = generate(Timbre::Crash, &kit, 22_050.0, 0.5, &mut WhiteNoise::seeded(9));
        let c = generate(Timbre::Crash, &kit, 22_050.0, 0.5, &mut WhiteNoise::seeded(10));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn hat_dies_faster_than_crash() {
        let kit = KitId::default();
        let tail = |timbre| {
            let buf = generate(timbre, &kit, 22_050.0, 0.5, &mut WhiteNoise::seeded(4));
            buf[buf.len() / 2..].iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
        };
        assert!(tail(Timbre::HiHat) < tail(Timbre::Crash));
    }

    #[test]
    fn zero_length_request_is_empty() {
        let buf = generate(Timbre::Snare, &KitId::default(), 44_100.0, 0.0, &mut WhiteNoise::seeded(0));
        assert!(buf.is_empty());
    }
}
