//! Data models for the signage planner.

mod annotation;
mod catalog;
mod error;
mod event;

pub use annotation::{
    Annotation, AnnotationCategory, AnnotationId, AnnotationPatch, AssetStatus, Direction,
    FaceSide, PercentPoint, SideData, normalize_orientation,
};
pub use catalog::{Catalog, HolderType, ResolvedDesign, SignageSubType, SignageType};
pub use error::ModelError;
pub use event::{Event, EventRegistry, FloorPlan, ValidationIssue, VenueLayout};

/// Compare two user-entered names the way duplicate validation does.
pub fn names_match(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Trim `name` and make sure no entry of `existing` matches it.
///
/// Callers renaming an entity exclude that entity from `existing`.
pub(crate) fn check_unique_name<'a>(
    kind: &'static str,
    name: &str,
    mut existing: impl Iterator<Item = &'a str>,
) -> Result<String, ModelError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ModelError::EmptyName { kind });
    }
    if existing.any(|other| names_match(other, trimmed)) {
        return Err(ModelError::DuplicateName {
            kind,
            name: trimmed.to_string(),
        });
    }
    Ok(trimmed.to_string())
}
