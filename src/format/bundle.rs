//! Export bundle: the event, its layouts and the catalog in one document.
//!
//! # Versioning
//!
//! Bundles use semantic versioning (MAJOR.MINOR.PATCH):
//!
//! - **Version 0.x.x**: Unstable. The layout may change in breaking ways
//!   between any 0.x releases; only the same minor version is considered
//!   compatible.
//!
//! - **Version 1.x.x** (future): Breaking changes only in major bumps.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::format::error::FormatError;
use crate::model::{Catalog, Event, VenueLayout};
use crate::timestamp::now_iso8601;

/// Everything needed to recreate an event elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    /// Format version for compatibility checking.
    pub version: String,

    /// When the bundle was written (ISO 8601).
    pub exported_at: String,

    /// The event with its layouts and annotations.
    pub event: Event,

    /// Signage and holder types referenced by the annotations.
    #[serde(default)]
    pub catalog: Catalog,

    #[serde(default)]
    pub metadata: BundleMetadata,
}

impl ExportBundle {
    /// Current version of the bundle format.
    pub const CURRENT_VERSION: &'static str = "0.1.0";

    /// Major version number for compatibility checking.
    pub const VERSION_MAJOR: u32 = 0;

    /// Minor version number.
    pub const VERSION_MINOR: u32 = 1;

    /// Create a bundle stamped with the current time.
    pub fn new(event: Event, catalog: Catalog) -> Self {
        Self {
            version: Self::CURRENT_VERSION.to_string(),
            exported_at: now_iso8601(),
            event,
            catalog,
            metadata: BundleMetadata::new(),
        }
    }

    /// Parse a version string into (major, minor, patch) components.
    pub fn parse_version(version: &str) -> Option<(u32, u32, u32)> {
        let parts: Vec<&str> = version.split('.').collect();
        if parts.len() != 3 {
            return None;
        }
        let major = parts[0].parse().ok()?;
        let minor = parts[1].parse().ok()?;
        let patch = parts[2].parse().ok()?;
        Some((major, minor, patch))
    }

    /// Check if a version is compatible with the current version.
    ///
    /// For 0.x.x only the same minor version is compatible; from 1.x.x on,
    /// the same major version is.
    pub fn is_version_compatible(file_version: &str) -> bool {
        let Some((file_major, file_minor, _)) = Self::parse_version(file_version) else {
            return false;
        };

        if Self::VERSION_MAJOR == 0 {
            file_major == 0 && file_minor == Self::VERSION_MINOR
        } else {
            file_major == Self::VERSION_MAJOR
        }
    }

    /// Check if a bundle can be read at all, possibly with warnings.
    pub fn is_version_readable(file_version: &str) -> bool {
        let Some((file_major, _, _)) = Self::parse_version(file_version) else {
            return false;
        };
        file_major == 0 || file_major == Self::VERSION_MAJOR
    }

    /// Reject unreadable versions, warn about incompatible ones.
    pub fn check_version(&self) -> Result<(), FormatError> {
        if !Self::is_version_readable(&self.version) {
            return Err(FormatError::VersionMismatch {
                expected: Self::CURRENT_VERSION.to_string(),
                found: self.version.clone(),
            });
        }

        if !Self::is_version_compatible(&self.version) {
            log::warn!(
                "Bundle version {} may not be fully compatible with current version {}",
                self.version,
                Self::CURRENT_VERSION
            );
        }
        Ok(())
    }

    /// Total annotations over all layouts.
    pub fn total_annotations(&self) -> usize {
        self.event.total_annotations()
    }

    /// Layouts to export: all of them, or the one matching `layout` by id or
    /// name.
    pub fn select_layouts(&self, layout: Option<&str>) -> Result<Vec<&VenueLayout>, FormatError> {
        match layout {
            None => Ok(self.event.layouts.iter().collect()),
            Some(key) => self
                .event
                .layout(key)
                .or_else(|| self.event.layout_by_name(key))
                .map(|l| vec![l])
                .ok_or_else(|| FormatError::layout_not_found(key)),
        }
    }

    /// Copy of the bundle holding only the selected layout(s).
    pub fn restricted(&self, layout: Option<&str>) -> Result<Self, FormatError> {
        let layouts = self
            .select_layouts(layout)?
            .into_iter()
            .cloned()
            .collect();
        let mut bundle = self.clone();
        bundle.event.layouts = layouts;
        Ok(bundle)
    }
}

/// Bundle provenance.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleMetadata {
    /// Tool that wrote this file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,

    /// Tool version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_version: Option<String>,

    /// Format-specific extra data.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, serde_json::Value>,
}

impl BundleMetadata {
    pub fn new() -> Self {
        Self {
            created_by: Some("signplan".to_string()),
            tool_version: Some(env!("CARGO_PKG_VERSION").to_string()),
            extra: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle() -> ExportBundle {
        let mut event = Event::new("Festival");
        event.add_layout("Main hall").unwrap();
        event.add_layout("Annex").unwrap();
        ExportBundle::new(event, Catalog::new())
    }

    #[test]
    fn test_version_parsing() {
        assert_eq!(ExportBundle::parse_version("0.1.0"), Some((0, 1, 0)));
        assert_eq!(ExportBundle::parse_version("10.20.30"), Some((10, 20, 30)));
        assert_eq!(ExportBundle::parse_version("1.2"), None);
        assert_eq!(ExportBundle::parse_version("a.b.c"), None);
    }

    #[test]
    fn test_version_compatibility() {
        assert!(ExportBundle::is_version_compatible(
            ExportBundle::CURRENT_VERSION
        ));
        assert!(ExportBundle::is_version_compatible("0.1.7"));
        assert!(!ExportBundle::is_version_compatible("0.2.0"));
        assert!(!ExportBundle::is_version_compatible("1.0.0"));

        assert!(ExportBundle::is_version_readable("0.2.0"));
        assert!(!ExportBundle::is_version_readable("1.0.0"));
        assert!(!ExportBundle::is_version_readable("garbage"));
    }

    #[test]
    fn test_check_version() {
        let mut b = bundle();
        assert!(b.check_version().is_ok());
        b.version = "2.0.0".to_string();
        assert!(matches!(
            b.check_version(),
            Err(FormatError::VersionMismatch { .. })
        ));
    }

    #[test]
    fn test_select_layouts_by_id_or_name() {
        let b = bundle();
        assert_eq!(b.select_layouts(None).unwrap().len(), 2);

        let annex_id = b.event.layouts[1].id.clone();
        assert_eq!(b.select_layouts(Some(&annex_id)).unwrap()[0].name, "Annex");
        assert_eq!(
            b.select_layouts(Some("main hall")).unwrap()[0].name,
            "Main hall"
        );
        assert!(matches!(
            b.select_layouts(Some("Roof")),
            Err(FormatError::LayoutNotFound { .. })
        ));
    }

    #[test]
    fn test_restricted_keeps_one_layout() {
        let b = bundle();
        let only = b.restricted(Some("Annex")).unwrap();
        assert_eq!(only.event.layouts.len(), 1);
        assert_eq!(only.event.name, "Festival");
        assert_eq!(b.event.layouts.len(), 2);
    }

    #[test]
    fn test_camel_case_fields() {
        let json = serde_json::to_value(bundle()).unwrap();
        assert!(json.get("exportedAt").is_some());
        assert_eq!(json["metadata"]["createdBy"], "signplan");
    }
}
