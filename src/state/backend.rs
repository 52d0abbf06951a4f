//! Persistence backends for layout annotations.
//!
//! The hosted backend stores a layout's annotations as one JSON blob, so a
//! backend only needs to load and replace that list. Writes are last-write-wins.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::Annotation;

/// Errors reported by a [`LayoutBackend`].
#[derive(Error, Debug)]
pub enum BackendError {
    /// I/O error while reading or writing storage
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored blob could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Backend refused or failed the request
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

/// Storage for the annotation list of each venue layout.
pub trait LayoutBackend {
    /// Load the annotations of a layout. Unknown layouts have none.
    fn load_annotations(&self, layout_id: &str) -> Result<Vec<Annotation>, BackendError>;

    /// Replace the annotations of a layout.
    fn save_annotations(
        &mut self,
        layout_id: &str,
        annotations: &[Annotation],
    ) -> Result<(), BackendError>;
}

/// In-memory backend.
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    layouts: HashMap<String, Vec<Annotation>>,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a layout.
    pub fn with_layout(mut self, layout_id: impl Into<String>, annotations: Vec<Annotation>) -> Self {
        self.layouts.insert(layout_id.into(), annotations);
        self
    }

    /// Stored annotations of a layout.
    pub fn stored(&self, layout_id: &str) -> &[Annotation] {
        self.layouts
            .get(layout_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl LayoutBackend for MemoryBackend {
    fn load_annotations(&self, layout_id: &str) -> Result<Vec<Annotation>, BackendError> {
        Ok(self.stored(layout_id).to_vec())
    }

    fn save_annotations(
        &mut self,
        layout_id: &str,
        annotations: &[Annotation],
    ) -> Result<(), BackendError> {
        self.layouts
            .insert(layout_id.to_string(), annotations.to_vec());
        Ok(())
    }
}

/// Backend writing one `<layout_id>.json` file per layout into a directory.
#[derive(Debug, Clone)]
pub struct JsonDirBackend {
    dir: PathBuf,
}

impl JsonDirBackend {
    /// Use `dir` for storage, creating it if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, BackendError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        log::debug!("Using annotation storage at {:?}", dir);
        Ok(Self { dir })
    }

    /// Storage directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn layout_path(&self, layout_id: &str) -> Result<PathBuf, BackendError> {
        let valid = !layout_id.is_empty()
            && layout_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(BackendError::Unavailable(format!(
                "invalid layout id '{}'",
                layout_id
            )));
        }
        Ok(self.dir.join(format!("{}.json", layout_id)))
    }
}

impl LayoutBackend for JsonDirBackend {
    fn load_annotations(&self, layout_id: &str) -> Result<Vec<Annotation>, BackendError> {
        let path = self.layout_path(layout_id)?;
        if !path.exists() {
            return Ok(Vec::new());
        }
        let json = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&json)?)
    }

    fn save_annotations(
        &mut self,
        layout_id: &str,
        annotations: &[Annotation],
    ) -> Result<(), BackendError> {
        let path = self.layout_path(layout_id)?;
        let json = serde_json::to_string_pretty(annotations)?;
        // Write-then-rename so a crash never leaves a truncated blob
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &path)?;
        log::debug!("Saved {} annotations to {:?}", annotations.len(), path);
        Ok(())
    }
}
