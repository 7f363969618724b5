/*
Step Pattern
============

A pattern is the on/off grid the sequencer reads: one row per track, sixteen
steps per row, one step per sixteenth note of a 4/4 bar.

    Kick     x . . . x . . . x . . . x . . .
    Snare    . . . . x . . . . . . . x . . .
    Hi-Hat   x . x . x . x . x . x . x . x .

Rows keep the grid order of the tracks, and that order is the order in which
triggers fire within a step. Every row always has exactly sixteen entries;
the fixed-size array makes any other length unrepresentable.

Stored form is a list of rows, `[{"track": "Kick", "steps": [..16]}, ..]`.
An object keyed by track name, `{"Kick": [..16], ..}`, is also accepted when
reading; its rows come back sorted by name until conformed to a track list.
*/

use std::collections::BTreeMap;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};

use crate::STEPS;

/// Chance that `randomize` turns a step on.
pub const RANDOM_DENSITY: f64 = 0.3;

/// One track's sixteen steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRow {
    pub track: String,
    pub steps: [bool; STEPS],
}

/// The full grid.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Pattern {
    rows: Vec<PatternRow>,
}

/// Every shape a stored grid may take.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredPattern {
    Rows(Vec<PatternRow>),
    ByTrack(BTreeMap<String, [bool; STEPS]>),
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows = match StoredPattern::deserialize(deserializer)? {
            StoredPattern::Rows(rows) => rows,
            StoredPattern::ByTrack(by_track) => by_track
                .into_iter()
                .map(|(track, steps)| PatternRow { track, steps })
                .collect(),
        };
        Ok(Self { rows })
    }
}

impl Pattern {
    /// Empty grid with one row per track name, in the given order.
    pub fn new<I, S>(tracks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows = tracks
            .into_iter()
            .map(|name| PatternRow {
                track: name.into(),
                steps: [false; STEPS],
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[PatternRow] {
        &self.rows
    }

    pub fn steps(&self, track: &str) -> Option<&[bool; STEPS]> {
        self.row(track).map(|row| &row.steps)
    }

    pub fn get(&self, track: &str, step: usize) -> Option<bool> {
        self.steps(track).and_then(|steps| steps.get(step).copied())
    }

    /// Flip one step, returning its new value.
    pub fn toggle(&mut self, track: &str, step: usize) -> Result<bool, PatternError> {
        let cell = self.cell_mut(track, step)?;
        *cell = !*cell;
        Ok(*cell)
    }

    pub fn set(&mut self, track: &str, step: usize, active: bool) -> Result<(), PatternError> {
        *self.cell_mut(track, step)? = active;
        Ok(())
    }

    pub fn clear(&mut self) {
        for row in &mut self.rows {
            row.steps = [false; STEPS];
        }
    }

    /// Turn each step on independently with `probability`.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R, probability: f64) {
        let probability = if probability.is_nan() {
            0.0
        } else {
            probability.clamp(0.0, 1.0)
        };
        for row in &mut self.rows {
            for step in row.steps.iter_mut() {
                *step = rng.gen_bool(probability);
            }
        }
    }

    /// Tracks active at `step`, in row order.
    pub fn active_at(&self, step: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .filter(move |row| row.steps.get(step).copied().unwrap_or(false))
            .map(|row| row.track.as_str())
    }

    pub fn active_count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.steps.iter().filter(|&&on| on).count())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    /// Rebuild this pattern over exactly `tracks`, in that order.
    ///
    /// Rows for tracks this pattern lacks come back empty; rows for tracks
    /// not listed are dropped.
    pub fn conform_to<'a, I>(&self, tracks: I) -> Pattern
    where
        I: IntoIterator<Item = &'a str>,
    {
        let rows = tracks
            .into_iter()
            .map(|name| PatternRow {
                track: name.to_string(),
                steps: self.steps(name).copied().unwrap_or([false; STEPS]),
            })
            .collect();
        Pattern { rows }
    }

    fn row(&self, track: &str) -> Option<&PatternRow> {
        self.rows.iter().find(|row| row.track == track)
    }

    fn row_mut(&mut self, track: &str) -> Option<&mut PatternRow> {
        self.rows.iter_mut().find(|row| row.track == track)
    }

    fn cell_mut(&mut self, track: &str, step: usize) -> Result<&mut bool, PatternError> {
        let row = self
            .row_mut(track)
            .ok_or_else(|| PatternError::UnknownTrack(track.to_string()))?;
        row.steps
            .get_mut(step)
            .ok_or(PatternError::StepOutOfRange(step))
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.rows.iter().map(|r| r.track.len()).max().unwrap_or(0);
        for row in &self.rows {
            write!(f, "{:width$} ", row.track)?;
            for &on in &row.steps {
                f.write_str(if on { "x" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Errors from editing a pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// No row with this track name
    UnknownTrack(String),
    /// Step index outside `0..16`
    StepOutOfRange(usize),
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::UnknownTrack(name) => write!(f, "Unknown track: {}", name),
            PatternError::StepOutOfRange(step) => {
                write!(f, "Step {} out of range (pattern has {} steps)", step, STEPS)
            }
        }
    }
}

impl std::error::Error for PatternError {}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn two_tracks() -> Pattern {
        Pattern::new(["Kick", "Snare"])
    }

    #[test]
    fn test_new_pattern_is_empty() {
        let pattern = two_tracks();
        assert!(pattern.is_empty());
        assert_eq!(pattern.rows().len(), 2);
        assert!(pattern.rows().iter().all(|r| r.steps.len() == STEPS));
    }

    #[test]
    fn test_toggle_twice_restores() {
        let mut pattern = two_tracks();
        let before = pattern.clone();

        assert_eq!(pattern.toggle("Snare", 4), Ok(true));
        assert_eq!(pattern.get("Snare", 4), Some(true));
        assert_eq!(pattern.toggle("Snare", 4), Ok(false));
        assert_eq!(pattern, before);
    }

    #[test]
    fn test_toggle_rejects_bad_input() {
        let mut pattern = two_tracks();
        assert_eq!(
            pattern.toggle("Cowbell", 0),
            Err(PatternError::UnknownTrack("Cowbell".into()))
        );
        assert_eq!(pattern.toggle("Kick", 16), Err(PatternError::StepOutOfRange(16)));
        assert!(pattern.is_empty());
    }

    #[test]
    fn test_active_at_keeps_row_order() {
        let mut pattern = Pattern::new(["Kick", "Snare", "Hi-Hat"]);
        pattern.set("Hi-Hat", 0, true).unwrap();
        pattern.set("Kick", 0, true).unwrap();

        let active: Vec<&str> = pattern.active_at(0).collect();
        assert_eq!(active, vec!["Kick", "Hi-Hat"]);
        assert_eq!(pattern.active_at(1).count(), 0);
        assert_eq!(pattern.active_at(99).count(), 0);
    }

    #[test]
    fn test_clear() {
        let mut pattern = two_tracks();
        pattern.randomize(&mut StdRng::seed_from_u64(9), 1.0);
        pattern.clear();
        assert!(pattern.is_empty());
    }

    #[test]
    fn test_randomize_density_converges() {
        let mut rng = StdRng::seed_from_u64(1234);
        let mut pattern = Pattern::new(["A", "B", "C", "D", "E", "F", "G", "H"]);

        let trials = 500;
        let mut active = 0;
        for _ in 0..trials {
            pattern.randomize(&mut rng, RANDOM_DENSITY);
            active += pattern.active_count();
        }

        let rate = active as f64 / (trials * 8 * STEPS) as f64;
        assert!((rate - RANDOM_DENSITY).abs() < 0.01, "rate {rate}");
    }

    #[test]
    fn test_randomize_extremes() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut pattern = two_tracks();
        pattern.randomize(&mut rng, 1.0);
        assert_eq!(pattern.active_count(), 2 * STEPS);
        pattern.randomize(&mut rng, 0.0);
        assert!(pattern.is_empty());
    }

    #[test]
    fn test_conform_to_fills_and_drops() {
        let mut saved = Pattern::new(["Snare", "Legacy"]);
        saved.set("Snare", 3, true).unwrap();
        saved.set("Legacy", 5, true).unwrap();

        let pattern = saved.conform_to(["Kick", "Snare"]);
        let names: Vec<&str> = pattern.rows().iter().map(|r| r.track.as_str()).collect();
        assert_eq!(names, vec!["Kick", "Snare"]);
        assert_eq!(pattern.get("Snare", 3), Some(true));
        assert_eq!(pattern.steps("Kick"), Some(&[false; STEPS]));
        assert_eq!(pattern.active_count(), 1);
    }

    #[test]
    fn test_display_grid() {
        let mut pattern = Pattern::new(["Kick"]);
        for step in [0, 4, 8, 12] {
            pattern.set("Kick", step, true).unwrap();
        }
        assert_eq!(pattern.to_string(), "Kick x...x...x...x...\n");
    }

    #[test]
    fn test_serde_shape() {
        let mut pattern = Pattern::new(["Kick"]);
        pattern.set("Kick", 0, true).unwrap();
        let json = serde_json::to_value(&pattern).unwrap();
        assert_eq!(json[0]["track"], "Kick");
        assert_eq!(json[0]["steps"].as_array().unwrap().len(), STEPS);

        let back: Pattern = serde_json::from_value(json).unwrap();
        assert_eq!(back, pattern);
    }

    #[test]
    fn test_reads_rows_keyed_by_track_name() {
        let mut kick = vec![false; STEPS];
        kick[0] = true;
        kick[8] = true;
        let json = serde_json::json!({
            "Snare": vec![false; STEPS],
            "Kick": kick,
        });

        let pattern: Pattern = serde_json::from_value(json).unwrap();
        let names: Vec<&str> = pattern.rows().iter().map(|r| r.track.as_str()).collect();
        assert_eq!(names, vec!["Kick", "Snare"]);
        assert_eq!(pattern.get("Kick", 8), Some(true));
        assert_eq!(pattern.active_count(), 2);
    }

    #[test]
    fn test_short_row_is_rejected() {
        let json = serde_json::json!({ "Kick": [true, false] });
        assert!(serde_json::from_value::<Pattern>(json).is_err());
    }
}
