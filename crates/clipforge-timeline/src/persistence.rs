//! Persistence collaborator: whole-document load/save keyed by project id.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use clipforge_core::{ClipForgeError, Result};
use parking_lot::Mutex;
use tracing::info;

use crate::serialization::TimelineFile;
use crate::timeline::Timeline;

/// Loads and saves timeline documents as atomic snapshots. No partial merge.
pub trait TimelineRepository {
    /// Load the timeline for `project_id`; `Ok(None)` when none was saved.
    fn load(&self, project_id: &str) -> Result<Option<Timeline>>;

    /// Replace the stored timeline for `project_id`.
    fn save(&self, project_id: &str, timeline: &Timeline) -> Result<()>;
}

/// Project ids become file names, so only a conservative alphabet is allowed.
fn validate_project_id(project_id: &str) -> Result<()> {
    let valid = !project_id.is_empty()
        && project_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ClipForgeError::InvalidParameter(format!(
            "invalid project id: {project_id:?}"
        )))
    }
}

/// Stores one `<project_id>.json` file per project in a directory.
#[derive(Debug, Clone)]
pub struct JsonDirRepository {
    root: PathBuf,
}

impl JsonDirRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, project_id: &str) -> Result<PathBuf> {
        validate_project_id(project_id)?;
        Ok(self.root.join(format!("{project_id}.json")))
    }
}

impl TimelineRepository for JsonDirRepository {
    fn load(&self, project_id: &str) -> Result<Option<Timeline>> {
        let path = self.path_for(project_id)?;
        if !path.exists() {
            return Ok(None);
        }
        let file = TimelineFile::load_from_file(&path)?;
        info!(project_id, path = %path.display(), "timeline loaded");
        Ok(Some(file.timeline))
    }

    fn save(&self, project_id: &str, timeline: &Timeline) -> Result<()> {
        let path = self.path_for(project_id)?;
        std::fs::create_dir_all(&self.root)?;

        // Write-then-rename so readers never observe a half-written document.
        let tmp = path.with_extension("json.tmp");
        TimelineFile::new(timeline.clone()).save_to_file(&tmp)?;
        std::fs::rename(&tmp, &path).map_err(|e| {
            ClipForgeError::Persistence(format!("failed to commit {}: {e}", path.display()))
        })?;
        info!(project_id, path = %path.display(), "timeline saved");
        Ok(())
    }
}

/// In-memory repository, mostly for tests and previews.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    documents: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.lock().is_empty()
    }
}

impl TimelineRepository for MemoryRepository {
    fn load(&self, project_id: &str) -> Result<Option<Timeline>> {
        validate_project_id(project_id)?;
        let documents = self.documents.lock();
        match documents.get(project_id) {
            Some(bytes) => Ok(Some(TimelineFile::from_json(bytes)?.timeline)),
            None => Ok(None),
        }
    }

    fn save(&self, project_id: &str, timeline: &Timeline) -> Result<()> {
        validate_project_id(project_id)?;
        let bytes = TimelineFile::new(timeline.clone()).to_json()?;
        self.documents.lock().insert(project_id.to_string(), bytes);
        Ok(())
    }
}
