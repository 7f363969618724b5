use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::{KeyValueStore, StoreError};
use crate::{sequencing::Pattern, synth::KitId};

/// Key the saved pattern list lives under.
pub const STORAGE_KEY: &str = "drumPatterns";

/// Tempo assumed for records saved without one.
const FALLBACK_TEMPO: u32 = 120;

fn fallback_tempo() -> u32 {
    FALLBACK_TEMPO
}

/// Positive numeric tempo, else the fallback (`null`, `0`, strings).
fn lenient_tempo<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let tempo = match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f > 0.0)
                    .map(|f| f.round() as u64)
            })
            .filter(|&bpm| bpm > 0)
            .map(|bpm| bpm.min(u64::from(u32::MAX)) as u32),
        _ => None,
    };
    Ok(tempo.unwrap_or(FALLBACK_TEMPO))
}

/// Non-empty kit name, else the default kit.
fn lenient_kit<'de, D: Deserializer<'de>>(deserializer: D) -> Result<KitId, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(kit) if !kit.is_empty() => KitId::new(kit),
        _ => KitId::default(),
    })
}

/// A named snapshot of the grid, tempo and kit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPattern {
    pub name: String,
    pub pattern: Pattern,
    #[serde(default = "fallback_tempo", deserialize_with = "lenient_tempo")]
    pub tempo: u32,
    #[serde(default, deserialize_with = "lenient_kit")]
    pub kit: KitId,
    #[serde(default = "Utc::now", alias = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Name and tempo, for a selection list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSummary {
    pub name: String,
    pub tempo: u32,
}

impl fmt::Display for PatternSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}BPM)", self.name, self.tempo)
    }
}

/// What a `save` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Created,
    /// An existing record with the same name was overwritten in place
    Replaced,
    /// Empty name; nothing stored
    Skipped,
}

/// Saved patterns kept as one JSON array in a key-value store.
pub struct PatternLibrary {
    store: Box<dyn KeyValueStore>,
}

impl PatternLibrary {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Upsert a snapshot by name. A blank name is a no-op.
    pub fn save(
        &mut self,
        name: &str,
        pattern: &Pattern,
        tempo: u32,
        kit: &KitId,
    ) -> Result<SaveOutcome, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(SaveOutcome::Skipped);
        }

        let record = SavedPattern {
            name: name.to_string(),
            pattern: pattern.clone(),
            tempo,
            kit: kit.clone(),
            created_at: Utc::now(),
        };

        let mut records = self.records();
        let outcome = match records.iter_mut().find(|r| r.name == name) {
            Some(existing) => {
                *existing = record;
                SaveOutcome::Replaced
            }
            None => {
                records.push(record);
                SaveOutcome::Created
            }
        };

        let json = serde_json::to_string(&records)?;
        self.store.set(STORAGE_KEY, &json)?;
        log::info!("saved pattern {:?} ({:?})", name, outcome);
        Ok(outcome)
    }

    /// All saved names with their tempo, in save order.
    pub fn list(&self) -> Vec<PatternSummary> {
        self.records()
            .into_iter()
            .map(|r| PatternSummary {
                name: r.name,
                tempo: r.tempo,
            })
            .collect()
    }

    pub fn load(&self, name: &str) -> Option<SavedPattern> {
        self.records().into_iter().find(|r| r.name == name)
    }

    /// Every readable record. Unreadable storage or a malformed document
    /// yields an empty list; malformed individual records are skipped.
    pub fn records(&self) -> Vec<SavedPattern> {
        let raw = match self.store.get(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                log::warn!("could not read saved patterns: {}", err);
                return Vec::new();
            }
        };

        let values: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(values) => values,
            Err(err) => {
                log::warn!("saved patterns are malformed, ignoring them: {}", err);
                return Vec::new();
            }
        };

        values
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<SavedPattern>(value) {
                Ok(record) => Some(record),
                Err(err) => {
                    log::warn!("skipping malformed saved pattern: {}", err);
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn beat() -> Pattern {
        let mut pattern = Pattern::new(["Kick", "Snare"]);
        pattern.set("Kick", 0, true).unwrap();
        pattern.set("Snare", 4, true).unwrap();
        pattern
    }

    fn library_with(raw: &str) -> PatternLibrary {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, raw).unwrap();
        PatternLibrary::new(store)
    }

    #[test]
    fn save_then_load_restores_everything() {
        let mut library = PatternLibrary::new(MemoryStore::new());
        let kit = KitId::new("electronic");

        let outcome = library.save("groove", &beat(), 97, &kit).unwrap();
        assert_eq!(outcome, SaveOutcome::Created);

        let loaded = library.load("groove").unwrap();
        assert_eq!(loaded.pattern, beat());
        assert_eq!(loaded.tempo, 97);
        assert_eq!(loaded.kit, kit);
    }

    #[test]
    fn saving_same_name_replaces() {
        let mut library = PatternLibrary::new(MemoryStore::new());
        let kit = KitId::default();

        library.save("a", &beat(), 100, &kit).unwrap();
        library.save("b", &beat(), 110, &kit).unwrap();
        let outcome = library.save("a", &Pattern::new(["Kick"]), 150, &kit).unwrap();

        assert_eq!(outcome, SaveOutcome::Replaced);
        let list = library.list();
        assert_eq!(
            list,
            vec![
                PatternSummary { name: "a".into(), tempo: 150 },
                PatternSummary { name: "b".into(), tempo: 110 },
            ]
        );
        assert!(library.load("a").unwrap().pattern.is_empty());
    }

    #[test]
    fn blank_name_is_skipped() {
        let mut library = PatternLibrary::new(MemoryStore::new());
        for name in ["", "   "] {
            let outcome = library.save(name, &beat(), 120, &KitId::default()).unwrap();
            assert_eq!(outcome, SaveOutcome::Skipped);
        }
        assert!(library.list().is_empty());
    }

    #[test]
    fn load_missing_is_none() {
        let library = PatternLibrary::new(MemoryStore::new());
        assert_eq!(library.load("nope"), None);
    }

    #[test]
    fn malformed_document_reads_as_empty() {
        for raw in ["not json", "{\"a\":1}", "[1, 2"] {
            let library = library_with(raw);
            assert!(library.list().is_empty(), "{raw}");
        }
    }

    #[test]
    fn malformed_records_are_skipped() {
        let raw = r#"[
            {"name": "bad", "pattern": [{"track": "Kick", "steps": [true]}]},
            {"name": "good", "pattern": []}
        ]"#;
        let library = library_with(raw);
        let names: Vec<String> = library.list().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["good"]);
    }

    #[test]
    fn missing_fields_fall_back() {
        let library = library_with(r#"[{"name": "old", "pattern": []}]"#);
        let record = library.load("old").unwrap();
        assert_eq!(record.tempo, 120);
        assert_eq!(record.kit, KitId::default());
    }

    #[test]
    fn accepts_timestamp_alias() {
        let library = library_with(
            r#"[{"name": "x", "pattern": [], "timestamp": "2024-03-01T12:00:00Z"}]"#,
        );
        let record = library.load("x").unwrap();
        assert_eq!(record.created_at.to_rfc3339(), "2024-03-01T12:00:00+00:00");
    }

    #[test]
    fn save_over_malformed_data_starts_fresh() {
        let mut library = library_with("garbage");
        library.save("fresh", &beat(), 120, &KitId::default()).unwrap();
        assert_eq!(library.list().len(), 1);
    }

    #[test]
    fn summary_display() {
        let summary = PatternSummary { name: "groove".into(), tempo: 128 };
        assert_eq!(summary.to_string(), "groove (128BPM)");
    }

    #[test]
    fn empty_tempo_and_kit_fall_back() {
        let library = library_with(
            r#"[
                {"name": "a", "pattern": [], "tempo": null, "kit": null},
                {"name": "b", "pattern": [], "tempo": 0, "kit": ""},
                {"name": "c", "pattern": [], "tempo": 96.0, "kit": "vintage"}
            ]"#,
        );
        for name in ["a", "b"] {
            let record = library.load(name).unwrap();
            assert_eq!(record.tempo, 120, "{name}");
            assert_eq!(record.kit, KitId::default(), "{name}");
        }
        let record = library.load("c").unwrap();
        assert_eq!(record.tempo, 96);
        assert_eq!(record.kit.as_str(), "vintage");
    }

    #[test]
    fn reads_grid_keyed_by_track_name() {
        let library = library_with(
            r#"[{
                "name": "web",
                "pattern": {
                    "Kick": [true,false,false,false,true,false,false,false,true,false,false,false,true,false,false,false],
                    "Snare": [false,false,false,false,true,false,false,false,false,false,false,false,true,false,false,false]
                },
                "tempo": 128,
                "kit": "electronic",
                "timestamp": "2024-01-01T00:00:00.000Z"
            }]"#,
        );
        assert_eq!(
            library.list(),
            vec![PatternSummary { name: "web".into(), tempo: 128 }]
        );
        let record = library.load("web").unwrap();
        assert_eq!(record.pattern.get("Kick", 12), Some(true));
        assert_eq!(record.pattern.get("Snare", 4), Some(true));
        assert_eq!(record.pattern.active_count(), 6);
    }
}
