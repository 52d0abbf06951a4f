//! Annotation store for one venue layout.
//!
//! Every mutation is applied to the local list first so the canvas updates
//! immediately, then the whole list is saved to the backend. When the save
//! fails the local change is reverted, an error notice is queued and the
//! error is returned. There is no retry.

use thiserror::Error;

use crate::model::{Annotation, AnnotationPatch, ModelError};
use crate::state::backend::{BackendError, LayoutBackend};
use crate::state::notice::Notice;

/// Errors from [`AnnotationStore`] operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No annotation with this id in the layout
    #[error("Annotation not found: {0}")]
    NotFound(String),

    /// An annotation with this id already exists
    #[error("Annotation already exists: {0}")]
    DuplicateId(String),

    /// The change was rejected before reaching the backend
    #[error("Invalid annotation: {0}")]
    Invalid(#[from] ModelError),

    /// The backend write failed and the local change was reverted
    #[error("Save failed, change reverted: {0}")]
    Backend(#[from] BackendError),
}

/// Local, backend-synced annotation list of one layout.
pub struct AnnotationStore<B: LayoutBackend> {
    backend: B,
    layout_id: String,
    annotations: Vec<Annotation>,
    notices: Vec<Notice>,
}

impl<B: LayoutBackend> AnnotationStore<B> {
    /// Open the store for a layout, loading its current annotations.
    pub fn open(backend: B, layout_id: impl Into<String>) -> Result<Self, StoreError> {
        let layout_id = layout_id.into();
        let annotations = backend.load_annotations(&layout_id)?;
        log::info!(
            "Opened layout {} with {} annotations",
            layout_id,
            annotations.len()
        );
        Ok(Self {
            backend,
            layout_id,
            annotations,
            notices: Vec::new(),
        })
    }

    /// Layout this store belongs to.
    pub fn layout_id(&self) -> &str {
        &self.layout_id
    }

    /// Current annotations in drawing order.
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Look up an annotation by id.
    pub fn get(&self, id: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    /// Number of annotations.
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    /// Check if the layout has no annotations.
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// The backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The backend, mutably.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Pending notices.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Take all pending notices.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Add an annotation.
    pub fn add(&mut self, annotation: Annotation) -> Result<(), StoreError> {
        annotation.validate()?;
        if self.get(&annotation.id).is_some() {
            return Err(StoreError::DuplicateId(annotation.id));
        }

        self.annotations.push(annotation);
        self.persist("add annotation", |annotations| {
            annotations.pop();
        })
    }

    /// Apply a partial update to an annotation.
    pub fn update(&mut self, id: &str, patch: AnnotationPatch) -> Result<(), StoreError> {
        let idx = self.index_of(id)?;
        let previous = self.annotations[idx].clone();
        self.annotations[idx].apply_patch(patch)?;

        self.persist("update annotation", move |annotations| {
            annotations[idx] = previous;
        })
    }

    /// Delete an annotation, returning it.
    pub fn delete(&mut self, id: &str) -> Result<Annotation, StoreError> {
        let idx = self.index_of(id)?;
        let removed = self.annotations.remove(idx);
        let restore = removed.clone();

        self.persist("delete annotation", move |annotations| {
            annotations.insert(idx, restore);
        })?;
        Ok(removed)
    }

    /// Delete every annotation of the layout.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        let previous = std::mem::take(&mut self.annotations);
        self.persist("clear annotations", move |annotations| {
            *annotations = previous;
        })
    }

    /// Replace the local list with the backend's.
    pub fn reload(&mut self) -> Result<(), StoreError> {
        self.annotations = self.backend.load_annotations(&self.layout_id)?;
        log::debug!(
            "Reloaded layout {} ({} annotations)",
            self.layout_id,
            self.annotations.len()
        );
        Ok(())
    }

    fn index_of(&self, id: &str) -> Result<usize, StoreError> {
        self.annotations
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Save the current list; on failure undo the local change with `revert`.
    fn persist(
        &mut self,
        action: &str,
        revert: impl FnOnce(&mut Vec<Annotation>),
    ) -> Result<(), StoreError> {
        match self
            .backend
            .save_annotations(&self.layout_id, &self.annotations)
        {
            Ok(()) => {
                log::debug!("{} on layout {} saved", action, self.layout_id);
                Ok(())
            }
            Err(e) => {
                revert(&mut self.annotations);
                log::warn!(
                    "Failed to {} on layout {}: {} (reverted)",
                    action,
                    self.layout_id,
                    e
                );
                self.notices
                    .push(Notice::error(format!("Failed to {}: {}", action, e)));
                Err(StoreError::Backend(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnnotationCategory, PercentPoint, SideData};
    use crate::state::backend::MemoryBackend;

    /// Memory backend whose writes can be switched off.
    #[derive(Default)]
    struct FlakyBackend {
        inner: MemoryBackend,
        fail_writes: bool,
    }

    impl LayoutBackend for FlakyBackend {
        fn load_annotations(&self, layout_id: &str) -> Result<Vec<Annotation>, BackendError> {
            self.inner.load_annotations(layout_id)
        }

        fn save_annotations(
            &mut self,
            layout_id: &str,
            annotations: &[Annotation],
        ) -> Result<(), BackendError> {
            if self.fail_writes {
                return Err(BackendError::Unavailable("offline".to_string()));
            }
            self.inner.save_annotations(layout_id, annotations)
        }
    }

    fn marker(x: f32) -> Annotation {
        Annotation::marker(
            AnnotationCategory::Signage,
            "sign",
            PercentPoint::new(x, 50.0),
        )
        .unwrap()
        .with_side1(SideData::new("Tickets"))
    }

    fn store_with(annotations: Vec<Annotation>) -> AnnotationStore<FlakyBackend> {
        let backend = FlakyBackend {
            inner: MemoryBackend::new().with_layout("layout", annotations),
            fail_writes: false,
        };
        AnnotationStore::open(backend, "layout").unwrap()
    }

    #[test]
    fn test_add_update_delete_persist() {
        let mut store = store_with(Vec::new());
        let ann = marker(10.0);
        let id = ann.id.clone();

        store.add(ann).unwrap();
        assert_eq!(store.backend().inner.stored("layout").len(), 1);

        store
            .update(&id, AnnotationPatch::new().notes(Some("gate 3".to_string())))
            .unwrap();
        assert_eq!(
            store.backend().inner.stored("layout")[0].notes.as_deref(),
            Some("gate 3")
        );

        let removed = store.delete(&id).unwrap();
        assert_eq!(removed.id, id);
        assert!(store.is_empty());
        assert!(store.backend().inner.stored("layout").is_empty());
        assert!(store.notices().is_empty());
    }

    #[test]
    fn test_failed_add_reverts() {
        let mut store = store_with(vec![marker(1.0)]);
        store.backend_mut().fail_writes = true;

        let result = store.add(marker(2.0));
        assert!(matches!(result, Err(StoreError::Backend(_))));
        assert_eq!(store.len(), 1);

        let notices = store.drain_notices();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].is_error());
        assert!(store.notices().is_empty());
    }

    #[test]
    fn test_failed_update_reverts() {
        let original = marker(1.0);
        let id = original.id.clone();
        let mut store = store_with(vec![original.clone()]);
        store.backend_mut().fail_writes = true;

        let result = store.update(&id, AnnotationPatch::new().orientation(90.0));
        assert!(result.is_err());
        assert_eq!(store.get(&id), Some(&original));
    }

    #[test]
    fn test_failed_delete_restores_position() {
        let annotations = vec![marker(1.0), marker(2.0), marker(3.0)];
        let middle = annotations[1].id.clone();
        let mut store = store_with(annotations.clone());
        store.backend_mut().fail_writes = true;

        assert!(store.delete(&middle).is_err());
        assert_eq!(store.annotations(), annotations.as_slice());
    }

    #[test]
    fn test_failed_clear_restores_all() {
        let annotations = vec![marker(1.0), marker(2.0)];
        let mut store = store_with(annotations.clone());
        store.backend_mut().fail_writes = true;

        assert!(store.clear().is_err());
        assert_eq!(store.annotations(), annotations.as_slice());

        store.backend_mut().fail_writes = false;
        store.clear().unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_invalid_changes_never_reach_backend() {
        let mut store = store_with(vec![marker(1.0)]);
        let id = store.annotations()[0].id.clone();

        let result = store.update(
            &id,
            AnnotationPatch::new().points(vec![PercentPoint::new(200.0, 0.0)]),
        );
        assert!(matches!(result, Err(StoreError::Invalid(_))));
        assert!(matches!(
            store.delete("missing"),
            Err(StoreError::NotFound(_))
        ));

        let dup = store.annotations()[0].clone();
        assert!(matches!(store.add(dup), Err(StoreError::DuplicateId(_))));
        assert!(store.notices().is_empty());
    }

    #[test]
    fn test_reload_picks_up_backend_state() {
        let mut store = store_with(Vec::new());
        store
            .backend_mut()
            .inner
            .save_annotations("layout", &[marker(5.0)])
            .unwrap();
        assert!(store.is_empty());
        store.reload().unwrap();
        assert_eq!(store.len(), 1);
    }
}
