//! On-disk project format.
//!
//! A project file is a JSON object `{ schema, timeline, written_by }`. Files
//! from older schemas are upgraded step by step as raw JSON before they are
//! typed, and every decoded timeline is sanitized before it reaches a store.

use std::path::Path;

use clipforge_core::{defaults, ClipForgeError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use crate::timeline::Timeline;

/// Schema written by this build.
pub const SCHEMA_VERSION: u32 = 1;

/// `UPGRADES[n]` lifts a schema `n` document to schema `n + 1`.
const UPGRADES: &[fn(Value) -> Value] = &[wrap_bare_timeline];

/// Schema 0 stored the timeline object itself with no envelope.
fn wrap_bare_timeline(bare: Value) -> Value {
    json!({
        "schema": 1,
        "timeline": bare,
        "written_by": "unknown",
    })
}

/// A timeline together with the envelope it is stored in.
#[derive(Debug, Serialize, Deserialize)]
pub struct TimelineFile {
    #[serde(alias = "version")]
    pub schema: u32,
    pub timeline: Timeline,
    /// Crate version of the writer
    #[serde(alias = "app_version")]
    pub written_by: String,
}

impl TimelineFile {
    pub fn new(timeline: Timeline) -> Self {
        Self {
            schema: SCHEMA_VERSION,
            timeline,
            written_by: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| ClipForgeError::Serialization(format!("encode timeline: {e}")))
    }

    /// Decode with the default minimum clip duration.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        Self::decode(data, defaults::MIN_CLIP_DURATION)
    }

    /// Parse, upgrade to the current schema, then sanitize the timeline:
    /// clip ranges are clamped, colliding ids replaced and `duration`
    /// re-derived.
    pub fn decode(data: &[u8], min_clip_duration: f64) -> Result<Self> {
        let raw: Value = serde_json::from_slice(data)
            .map_err(|e| ClipForgeError::Serialization(format!("malformed JSON: {e}")))?;
        let current = upgrade(raw)?;
        let mut file: Self = serde_json::from_value(current)
            .map_err(|e| ClipForgeError::Serialization(format!("decode timeline: {e}")))?;

        let repairs = file.timeline.sanitize(min_clip_duration);
        if !repairs.is_clean() {
            warn!(?repairs, "loaded timeline needed repairs");
        }
        Ok(file)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let data = self.to_json()?;
        std::fs::write(path, data).map_err(|e| {
            ClipForgeError::Persistence(format!("write {}: {e}", path.display()))
        })
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).map_err(|e| {
            ClipForgeError::Persistence(format!("read {}: {e}", path.display()))
        })?;
        Self::from_json(&data)
    }
}

/// Schema of a raw document. Envelopes written before the field was renamed
/// carry it as `version`; a document with neither is a bare schema 0 timeline.
fn schema_of(doc: &Value) -> u64 {
    doc.get("schema")
        .or_else(|| doc.get("version"))
        .and_then(Value::as_u64)
        .unwrap_or(0)
}

fn upgrade(mut doc: Value) -> Result<Value> {
    let found = schema_of(&doc);
    if found > u64::from(SCHEMA_VERSION) {
        return Err(ClipForgeError::Serialization(format!(
            "schema {found} is newer than supported schema {SCHEMA_VERSION}"
        )));
    }
    for step in &UPGRADES[found as usize..] {
        doc = step(doc);
    }
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::Clip;
    use crate::store::TimelineStore;
    use crate::track::TrackKind;

    fn sample() -> Timeline {
        let mut timeline = Timeline::default();
        let id = timeline.push_track(TrackKind::Video);
        timeline
            .track_mut(id)
            .unwrap()
            .push_clip(Clip::video("a.mp4", 1.0, 4.0));
        timeline.recompute_duration();
        timeline
    }

    #[test]
    fn test_encode_decode_keeps_timeline() {
        let file = TimelineFile::new(sample());
        let loaded = TimelineFile::from_json(&file.to_json().unwrap()).unwrap();
        assert_eq!(loaded.schema, SCHEMA_VERSION);
        assert_eq!(loaded.timeline, file.timeline);
    }

    #[test]
    fn test_bare_timeline_is_upgraded() {
        let bare = serde_json::to_vec(&sample()).unwrap();
        let loaded = TimelineFile::from_json(&bare).unwrap();
        assert_eq!(loaded.schema, SCHEMA_VERSION);
        assert_eq!(loaded.written_by, "unknown");
        assert_eq!(loaded.timeline.clip_count(), 1);
    }

    #[test]
    fn test_legacy_envelope_field_names_accepted() {
        let doc = json!({
            "version": 1,
            "timeline": sample(),
            "app_version": "0.1.0",
        });
        let loaded = TimelineFile::from_json(&serde_json::to_vec(&doc).unwrap()).unwrap();
        assert_eq!(loaded.schema, 1);
        assert_eq!(loaded.written_by, "0.1.0");
    }

    #[test]
    fn test_stale_duration_is_rederived() {
        let mut timeline = sample();
        timeline.duration = 999.0;
        let json = TimelineFile::new(timeline).to_json().unwrap();
        let loaded = TimelineFile::from_json(&json).unwrap();
        assert_eq!(loaded.timeline.duration, 5.0);
    }

    #[test]
    fn test_out_of_range_clips_and_shared_ids_are_repaired() {
        let mut timeline = Timeline::default();
        let first = timeline.push_track(TrackKind::Video);
        let second = timeline.push_track(TrackKind::Overlay);
        let early = Clip::video("a.mp4", -2.0, 0.1);
        let shared = early.id;
        let mut twin = Clip::text("twin", 1.0, 2.0);
        twin.id = shared;
        timeline.track_mut(first).unwrap().push_clip(early);
        timeline.track_mut(second).unwrap().push_clip(twin);
        let json = TimelineFile::new(timeline).to_json().unwrap();

        let loaded = TimelineFile::from_json(&json).unwrap().timeline;
        for (_, clip) in loaded.clips() {
            assert!(clip.start_time >= 0.0);
            assert!(clip.duration >= defaults::MIN_CLIP_DURATION);
        }
        let ids: Vec<_> = loaded.clips().map(|(_, c)| c.id).collect();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
        assert_eq!(loaded.duration, 3.0);

        let mut store = TimelineStore::new(Timeline::default());
        store.replace(loaded);
        store.delete_clip(shared).unwrap();
        assert_eq!(store.timeline().clip_count(), 1);
        assert!(store.clip(ids[1]).is_some());
    }

    #[test]
    fn test_newer_schema_rejected() {
        let doc = json!({
            "schema": SCHEMA_VERSION + 1,
            "timeline": {},
            "written_by": "99.0.0",
        });
        let data = serde_json::to_vec(&doc).unwrap();
        assert!(matches!(
            TimelineFile::from_json(&data),
            Err(ClipForgeError::Serialization(_))
        ));
    }

    #[test]
    fn test_missing_file_is_persistence_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = TimelineFile::load_from_file(&dir.path().join("none.json")).unwrap_err();
        assert!(matches!(err, ClipForgeError::Persistence(_)));
    }
}
