//! Events, venue layouts and floor plans.
//!
//! An event owns one or more venue layouts; each layout carries the uploaded
//! floor-plan image reference and its annotations (stored by the backend as a
//! single JSON blob per layout).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::annotation::{Annotation, AnnotationCategory};
use crate::model::catalog::Catalog;
use crate::model::error::ModelError;
use crate::model::{check_unique_name, names_match};

/// Reference to an uploaded floor-plan image.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorPlan {
    /// Storage URL or local path of the image.
    pub image_url: String,
    /// Natural image width in pixels, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub natural_width: Option<u32>,
    /// Natural image height in pixels, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub natural_height: Option<u32>,
}

impl FloorPlan {
    /// Create a floor plan reference without known dimensions.
    pub fn new(image_url: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
            natural_width: None,
            natural_height: None,
        }
    }

    /// Set the natural dimensions.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.natural_width = Some(width);
        self.natural_height = Some(height);
        self
    }

    /// Build a floor plan from a local image, reading its natural size.
    pub fn from_image_file(path: &Path) -> Result<Self, ModelError> {
        let (width, height) = image::image_dimensions(path)?;
        log::debug!("Floor plan {:?} is {}x{}", path, width, height);
        Ok(Self::new(path.to_string_lossy()).with_dimensions(width, height))
    }

    /// Natural (width, height) if both are known and non-zero.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match (self.natural_width, self.natural_height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some((w, h)),
            _ => None,
        }
    }
}

/// One floor of a venue with its annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueLayout {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor_plan: Option<FloorPlan>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl VenueLayout {
    /// Create an empty layout without a floor plan.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            floor_plan: None,
            annotations: Vec::new(),
        }
    }

    /// Count annotations of a category.
    pub fn count_category(&self, category: AnnotationCategory) -> usize {
        self.annotations
            .iter()
            .filter(|a| a.category == category)
            .count()
    }
}

/// A problem found while validating an event.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub layout_name: String,
    pub annotation_id: Option<String>,
    pub message: String,
}

/// A venue event with its layouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    /// Event date (ISO 8601 date).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub layouts: Vec<VenueLayout>,
}

impl Event {
    /// Create an event without layouts.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            venue: None,
            date: None,
            layouts: Vec::new(),
        }
    }

    /// Look up a layout by id.
    pub fn layout(&self, id: &str) -> Option<&VenueLayout> {
        self.layouts.iter().find(|l| l.id == id)
    }

    /// Look up a layout by id, mutably.
    pub fn layout_mut(&mut self, id: &str) -> Option<&mut VenueLayout> {
        self.layouts.iter_mut().find(|l| l.id == id)
    }

    /// Look up a layout by name (case-insensitive).
    pub fn layout_by_name(&self, name: &str) -> Option<&VenueLayout> {
        self.layouts.iter().find(|l| names_match(&l.name, name))
    }

    /// Add a layout; names are unique within the event. Returns its id.
    pub fn add_layout(&mut self, name: &str) -> Result<String, ModelError> {
        let name = check_unique_name(
            "layout",
            name,
            self.layouts.iter().map(|l| l.name.as_str()),
        )?;
        let layout = VenueLayout::new(name);
        let id = layout.id.clone();
        self.layouts.push(layout);
        Ok(id)
    }

    /// Rename a layout.
    pub fn rename_layout(&mut self, id: &str, new_name: &str) -> Result<(), ModelError> {
        let name = check_unique_name(
            "layout",
            new_name,
            self.layouts
                .iter()
                .filter(|l| l.id != id)
                .map(|l| l.name.as_str()),
        )?;
        self.layout_mut(id)
            .ok_or_else(|| ModelError::not_found("layout", id))?
            .name = name;
        Ok(())
    }

    /// Remove a layout with all its annotations.
    pub fn remove_layout(&mut self, id: &str) -> Result<VenueLayout, ModelError> {
        let idx = self
            .layouts
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| ModelError::not_found("layout", id))?;
        Ok(self.layouts.remove(idx))
    }

    /// Total annotations over all layouts.
    pub fn total_annotations(&self) -> usize {
        self.layouts.iter().map(|l| l.annotations.len()).sum()
    }

    /// Point annotations at a renamed signage type. Returns faces updated.
    pub fn rename_signage_references(&mut self, old_name: &str, new_name: &str) -> usize {
        let mut updated = 0;
        for annotation in self.layouts.iter_mut().flat_map(|l| l.annotations.iter_mut()) {
            let sides = annotation
                .side1
                .iter_mut()
                .chain(annotation.side2.iter_mut());
            for side in sides {
                if names_match(&side.signage_type_name, old_name) {
                    side.signage_type_name = new_name.to_string();
                    updated += 1;
                }
            }
            if let Some(legacy) = &mut annotation.signage_type_name
                && names_match(legacy, old_name)
            {
                *legacy = new_name.to_string();
                updated += 1;
            }
        }
        updated
    }

    /// Point annotations at a renamed sub-type of `type_name`. Returns faces
    /// updated.
    pub fn rename_sub_type_references(
        &mut self,
        type_name: &str,
        old_name: &str,
        new_name: &str,
    ) -> usize {
        let renames = |parent: &str, sub_type: &mut Option<String>| match sub_type {
            Some(name)
                if names_match(parent, type_name) && names_match(name.as_str(), old_name) =>
            {
                *name = new_name.to_string();
                true
            }
            _ => false,
        };

        let mut updated = 0;
        for annotation in self.layouts.iter_mut().flat_map(|l| l.annotations.iter_mut()) {
            let sides = annotation
                .side1
                .iter_mut()
                .chain(annotation.side2.iter_mut());
            for side in sides {
                if renames(&side.signage_type_name, &mut side.sub_type_name) {
                    updated += 1;
                }
            }
            if let Some(parent) = &annotation.signage_type_name
                && renames(parent, &mut annotation.sub_type_name)
            {
                updated += 1;
            }
        }
        updated
    }

    /// Point annotations at a renamed holder type. Returns annotations updated.
    pub fn rename_holder_references(&mut self, old_name: &str, new_name: &str) -> usize {
        let mut updated = 0;
        for annotation in self.layouts.iter_mut().flat_map(|l| l.annotations.iter_mut()) {
            if let Some(holder) = &mut annotation.holder_type
                && names_match(holder, old_name)
            {
                *holder = new_name.to_string();
                updated += 1;
            }
        }
        updated
    }

    /// Report inconsistencies between annotations and the catalog.
    pub fn validate(&self, catalog: &Catalog) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        for layout in &self.layouts {
            let mut issue = |annotation_id: Option<&str>, message: String| {
                issues.push(ValidationIssue {
                    layout_name: layout.name.clone(),
                    annotation_id: annotation_id.map(str::to_string),
                    message,
                })
            };

            if layout.floor_plan.is_none() {
                issue(None, "layout has no floor plan".to_string());
            }

            for annotation in &layout.annotations {
                let id = Some(annotation.id.as_str());
                if let Err(e) = annotation.validate() {
                    issue(id, e.to_string());
                }
                if annotation.category != AnnotationCategory::Signage {
                    continue;
                }

                let holder = annotation.holder_type.as_deref();
                if let Some(name) = holder
                    && catalog.holder_type(name).is_none()
                {
                    issue(id, format!("unknown holder type '{}'", name));
                }
                if annotation.side2.is_some() && catalog.holder_sides(holder) < 2 {
                    issue(id, "side 2 is set on a single-sided holder".to_string());
                }

                let sides = std::iter::once(annotation.primary_side())
                    .chain(annotation.side2.clone());
                for side in sides {
                    if side.signage_type_name.trim().is_empty() {
                        issue(id, "sign face has no signage type".to_string());
                        continue;
                    }
                    match catalog.signage_type(&side.signage_type_name) {
                        None => issue(
                            id,
                            format!("unknown signage type '{}'", side.signage_type_name),
                        ),
                        Some(t) => {
                            if let Some(sub) = &side.sub_type_name
                                && t.sub_type(sub).is_none()
                            {
                                issue(
                                    id,
                                    format!("unknown sub-type '{}' of '{}'", sub, t.name),
                                );
                            }
                        }
                    }
                }
            }
        }

        issues
    }
}

/// All events of a workspace; event names are unique.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventRegistry {
    #[serde(default)]
    pub events: Vec<Event>,
}

impl EventRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an event. Returns its id.
    pub fn create_event(&mut self, name: &str) -> Result<String, ModelError> {
        let name = check_unique_name(
            "event",
            name,
            self.events.iter().map(|e| e.name.as_str()),
        )?;
        let event = Event::new(name);
        let id = event.id.clone();
        log::info!("Created event '{}' ({})", event.name, id);
        self.events.push(event);
        Ok(id)
    }

    /// Rename an event.
    pub fn rename_event(&mut self, id: &str, new_name: &str) -> Result<(), ModelError> {
        let name = check_unique_name(
            "event",
            new_name,
            self.events
                .iter()
                .filter(|e| e.id != id)
                .map(|e| e.name.as_str()),
        )?;
        self.event_mut(id)
            .ok_or_else(|| ModelError::not_found("event", id))?
            .name = name;
        Ok(())
    }

    /// Remove an event.
    pub fn remove_event(&mut self, id: &str) -> Result<Event, ModelError> {
        let idx = self
            .events
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| ModelError::not_found("event", id))?;
        Ok(self.events.remove(idx))
    }

    /// Look up an event by id.
    pub fn event(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Look up an event by id, mutably.
    pub fn event_mut(&mut self, id: &str) -> Option<&mut Event> {
        self.events.iter_mut().find(|e| e.id == id)
    }
}
