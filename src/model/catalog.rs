//! Signage type hierarchy and holder types.
//!
//! Signage types form a two-level hierarchy: a type (e.g. "Washroom") owns
//! sub-types (e.g. "Accessible"). Sub-types inherit colour, icon and artwork
//! from their parent when they don't set their own. Holder types describe the
//! physical stand a sign is mounted on and how many faces it shows.

use serde::{Deserialize, Serialize};

use crate::color_utils;
use crate::constants::DEFAULT_SIGNAGE_COLOR;
use crate::model::error::ModelError;
use crate::model::{check_unique_name, names_match};

/// A sub-type within a signage type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignageSubType {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl SignageSubType {
    fn new(name: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            color: None,
            icon: None,
            notes: None,
            image_url: None,
        }
    }
}

/// A user-defined signage type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignageType {
    pub id: String,
    pub name: String,
    /// `#rrggbb` colour used for markers of this type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Emoji icon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Artwork for the printed sign
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub sub_types: Vec<SignageSubType>,
}

impl SignageType {
    /// Look up a sub-type by name (case-insensitive).
    pub fn sub_type(&self, name: &str) -> Option<&SignageSubType> {
        self.sub_types.iter().find(|s| names_match(&s.name, name))
    }

    fn sub_type_mut(&mut self, id: &str) -> Option<&mut SignageSubType> {
        self.sub_types.iter_mut().find(|s| s.id == id)
    }
}

/// A physical sign holder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolderType {
    pub id: String,
    pub name: String,
    /// Number of sign faces, 1 or 2
    pub sides: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl HolderType {
    fn new(name: String, sides: u8) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            sides,
            notes: None,
        }
    }
}

/// Colour, icon and artwork after sub-type inheritance.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedDesign {
    pub color: String,
    pub icon: Option<String>,
    pub image_url: Option<String>,
}

/// All signage and holder types of a workspace.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    #[serde(default)]
    pub signage_types: Vec<SignageType>,
    #[serde(default)]
    pub holder_types: Vec<HolderType>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog seeded with common venue signage and holders.
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        let seeds = [
            ("Tickets", "🎟️"),
            ("Alcohol", "🍺"),
            ("Accessibility", "♿"),
            ("Washroom", "🚻"),
            ("First Aid", "⛑️"),
            ("Exit", "🚪"),
        ];
        for (name, icon) in seeds {
            if let Ok(id) = catalog.add_signage_type(name) {
                catalog.set_type_icon(&id, Some(icon.to_string()));
            }
        }
        for (name, sides) in [("Single-sided stand", 1), ("A-frame", 2), ("Wall mount", 1)] {
            catalog
                .holder_types
                .push(HolderType::new(name.to_string(), sides));
        }
        catalog
    }

    /// Look up a signage type by name (case-insensitive).
    pub fn signage_type(&self, name: &str) -> Option<&SignageType> {
        self.signage_types.iter().find(|t| names_match(&t.name, name))
    }

    /// Look up a signage type by id.
    pub fn signage_type_by_id(&self, id: &str) -> Option<&SignageType> {
        self.signage_types.iter().find(|t| t.id == id)
    }

    fn signage_type_mut(&mut self, id: &str) -> Result<&mut SignageType, ModelError> {
        self.signage_types
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| ModelError::not_found("signage type", id))
    }

    /// Create a signage type with a generated palette colour. Returns its id.
    pub fn add_signage_type(&mut self, name: &str) -> Result<String, ModelError> {
        let name = check_unique_name(
            "signage type",
            name,
            self.signage_types.iter().map(|t| t.name.as_str()),
        )?;
        let id = uuid::Uuid::new_v4().to_string();
        log::debug!("Adding signage type '{}' ({})", name, id);
        self.signage_types.push(SignageType {
            id: id.clone(),
            name,
            color: Some(color_utils::palette_color(self.signage_types.len())),
            icon: None,
            notes: None,
            image_url: None,
            sub_types: Vec::new(),
        });
        Ok(id)
    }

    /// Rename a signage type.
    ///
    /// Annotations keep the old name until [`Event::rename_signage_references`]
    /// is applied.
    ///
    /// [`Event::rename_signage_references`]: crate::model::Event::rename_signage_references
    pub fn rename_signage_type(&mut self, id: &str, new_name: &str) -> Result<(), ModelError> {
        let name = check_unique_name(
            "signage type",
            new_name,
            self.signage_types
                .iter()
                .filter(|t| t.id != id)
                .map(|t| t.name.as_str()),
        )?;
        self.signage_type_mut(id)?.name = name;
        Ok(())
    }

    /// Remove a signage type and its sub-types.
    pub fn remove_signage_type(&mut self, id: &str) -> Result<SignageType, ModelError> {
        let idx = self
            .signage_types
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| ModelError::not_found("signage type", id))?;
        Ok(self.signage_types.remove(idx))
    }

    /// Set or clear the colour of a signage type.
    pub fn set_type_color(&mut self, id: &str, color: Option<&str>) -> Result<(), ModelError> {
        let color = normalize_color(color)?;
        self.signage_type_mut(id)?.color = color;
        Ok(())
    }

    /// Set or clear the icon of a signage type. Unknown ids are ignored.
    pub fn set_type_icon(&mut self, id: &str, icon: Option<String>) {
        if let Ok(t) = self.signage_type_mut(id) {
            t.icon = icon;
        }
    }

    /// Set or clear the artwork URL of a signage type.
    pub fn set_type_image(&mut self, id: &str, image_url: Option<String>) -> Result<(), ModelError> {
        self.signage_type_mut(id)?.image_url = image_url;
        Ok(())
    }

    /// Create a sub-type under `type_id`. Returns its id.
    pub fn add_sub_type(&mut self, type_id: &str, name: &str) -> Result<String, ModelError> {
        let parent = self.signage_type_mut(type_id)?;
        let name = check_unique_name(
            "sub-type",
            name,
            parent.sub_types.iter().map(|s| s.name.as_str()),
        )?;
        let sub_type = SignageSubType::new(name);
        let id = sub_type.id.clone();
        parent.sub_types.push(sub_type);
        Ok(id)
    }

    /// Rename a sub-type; names only need to be unique within the parent.
    ///
    /// Annotations keep the old name until
    /// [`Event::rename_sub_type_references`] is applied.
    ///
    /// [`Event::rename_sub_type_references`]: crate::model::Event::rename_sub_type_references
    pub fn rename_sub_type(
        &mut self,
        type_id: &str,
        sub_type_id: &str,
        new_name: &str,
    ) -> Result<(), ModelError> {
        let parent = self.signage_type_mut(type_id)?;
        let name = check_unique_name(
            "sub-type",
            new_name,
            parent
                .sub_types
                .iter()
                .filter(|s| s.id != sub_type_id)
                .map(|s| s.name.as_str()),
        )?;
        parent
            .sub_type_mut(sub_type_id)
            .ok_or_else(|| ModelError::not_found("sub-type", sub_type_id))?
            .name = name;
        Ok(())
    }

    /// Remove a sub-type.
    pub fn remove_sub_type(
        &mut self,
        type_id: &str,
        sub_type_id: &str,
    ) -> Result<SignageSubType, ModelError> {
        let parent = self.signage_type_mut(type_id)?;
        let idx = parent
            .sub_types
            .iter()
            .position(|s| s.id == sub_type_id)
            .ok_or_else(|| ModelError::not_found("sub-type", sub_type_id))?;
        Ok(parent.sub_types.remove(idx))
    }

    /// Set or clear the colour of a sub-type (None inherits the parent's).
    pub fn set_sub_type_color(
        &mut self,
        type_id: &str,
        sub_type_id: &str,
        color: Option<&str>,
    ) -> Result<(), ModelError> {
        let color = normalize_color(color)?;
        self.signage_type_mut(type_id)?
            .sub_type_mut(sub_type_id)
            .ok_or_else(|| ModelError::not_found("sub-type", sub_type_id))?
            .color = color;
        Ok(())
    }

    /// Set or clear the artwork of a sub-type (None inherits the parent's).
    pub fn set_sub_type_image(
        &mut self,
        type_id: &str,
        sub_type_id: &str,
        image_url: Option<String>,
    ) -> Result<(), ModelError> {
        self.signage_type_mut(type_id)?
            .sub_type_mut(sub_type_id)
            .ok_or_else(|| ModelError::not_found("sub-type", sub_type_id))?
            .image_url = image_url;
        Ok(())
    }

    /// Resolve colour, icon and artwork for a (type, sub-type) pair.
    ///
    /// Unknown types fall back to the default colour with no artwork.
    pub fn resolve_design(&self, type_name: &str, sub_type_name: Option<&str>) -> ResolvedDesign {
        let Some(parent) = self.signage_type(type_name) else {
            return ResolvedDesign {
                color: DEFAULT_SIGNAGE_COLOR.to_string(),
                ..ResolvedDesign::default()
            };
        };
        let sub = sub_type_name.and_then(|n| parent.sub_type(n));

        let color = sub
            .and_then(|s| s.color.clone())
            .or_else(|| parent.color.clone())
            .unwrap_or_else(|| DEFAULT_SIGNAGE_COLOR.to_string());
        let icon = sub
            .and_then(|s| s.icon.clone())
            .or_else(|| parent.icon.clone());
        let image_url = sub
            .and_then(|s| s.image_url.clone())
            .or_else(|| parent.image_url.clone());

        ResolvedDesign {
            color,
            icon,
            image_url,
        }
    }

    /// Look up a holder type by name (case-insensitive).
    pub fn holder_type(&self, name: &str) -> Option<&HolderType> {
        self.holder_types.iter().find(|h| names_match(&h.name, name))
    }

    /// Number of faces for a holder name. Missing or unknown holders have one.
    pub fn holder_sides(&self, name: Option<&str>) -> u8 {
        name.and_then(|n| self.holder_type(n))
            .map(|h| h.sides)
            .unwrap_or(1)
    }

    /// Create a holder type. Returns its id.
    pub fn add_holder_type(&mut self, name: &str, sides: u8) -> Result<String, ModelError> {
        if !(1..=2).contains(&sides) {
            return Err(ModelError::InvalidSides { sides });
        }
        let name = check_unique_name(
            "holder type",
            name,
            self.holder_types.iter().map(|h| h.name.as_str()),
        )?;
        let holder = HolderType::new(name, sides);
        let id = holder.id.clone();
        self.holder_types.push(holder);
        Ok(id)
    }

    /// Rename a holder type.
    ///
    /// Annotations keep the old name until [`Event::rename_holder_references`]
    /// is applied; until then they count as single-sided.
    ///
    /// [`Event::rename_holder_references`]: crate::model::Event::rename_holder_references
    pub fn rename_holder_type(&mut self, id: &str, new_name: &str) -> Result<(), ModelError> {
        let name = check_unique_name(
            "holder type",
            new_name,
            self.holder_types
                .iter()
                .filter(|h| h.id != id)
                .map(|h| h.name.as_str()),
        )?;
        self.holder_types
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or_else(|| ModelError::not_found("holder type", id))?
            .name = name;
        Ok(())
    }

    /// Remove a holder type.
    pub fn remove_holder_type(&mut self, id: &str) -> Result<HolderType, ModelError> {
        let idx = self
            .holder_types
            .iter()
            .position(|h| h.id == id)
            .ok_or_else(|| ModelError::not_found("holder type", id))?;
        Ok(self.holder_types.remove(idx))
    }
}

fn normalize_color(color: Option<&str>) -> Result<Option<String>, ModelError> {
    match color {
        None => Ok(None),
        Some(c) => color_utils::normalize_hex(c)
            .map(Some)
            .ok_or_else(|| ModelError::InvalidColor(c.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_type_name_rejected() {
        let mut catalog = Catalog::new();
        catalog.add_signage_type("Washroom").unwrap();

        let err = catalog.add_signage_type("  washroom ").unwrap_err();
        assert!(matches!(err, ModelError::DuplicateName { .. }));
        assert_eq!(catalog.signage_types.len(), 1);
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut catalog = Catalog::new();
        assert!(matches!(
            catalog.add_signage_type("   "),
            Err(ModelError::EmptyName { .. })
        ));
    }

    #[test]
    fn test_rename_to_existing_name_rejected() {
        let mut catalog = Catalog::new();
        catalog.add_signage_type("Tickets").unwrap();
        let id = catalog.add_signage_type("Alcohol").unwrap();

        assert!(catalog.rename_signage_type(&id, "TICKETS").is_err());
        // Case change of its own name is fine
        catalog.rename_signage_type(&id, "ALCOHOL").unwrap();
        assert!(catalog.signage_type("alcohol").is_some());
        assert_eq!(catalog.signage_type_by_id(&id).unwrap().name, "ALCOHOL");
    }

    #[test]
    fn test_sub_type_names_scoped_to_parent() {
        let mut catalog = Catalog::new();
        let washroom = catalog.add_signage_type("Washroom").unwrap();
        let exit = catalog.add_signage_type("Exit").unwrap();

        catalog.add_sub_type(&washroom, "Accessible").unwrap();
        assert!(catalog.add_sub_type(&washroom, "accessible").is_err());
        // Same name under a different parent is allowed
        catalog.add_sub_type(&exit, "Accessible").unwrap();

        let id = catalog.add_sub_type(&washroom, "Family").unwrap();
        assert!(catalog.rename_sub_type(&washroom, &id, "Accessible").is_err());
        catalog.rename_sub_type(&washroom, &id, "All gender").unwrap();
        catalog.remove_sub_type(&washroom, &id).unwrap();
        assert_eq!(catalog.signage_type("Washroom").unwrap().sub_types.len(), 1);
    }

    #[test]
    fn test_sub_type_inherits_design() {
        let mut catalog = Catalog::new();
        let type_id = catalog.add_signage_type("Washroom").unwrap();
        catalog.set_type_color(&type_id, Some("#112233")).unwrap();
        catalog
            .set_type_image(&type_id, Some("washroom.png".to_string()))
            .unwrap();
        let sub_id = catalog.add_sub_type(&type_id, "Accessible").unwrap();

        let inherited = catalog.resolve_design("Washroom", Some("Accessible"));
        assert_eq!(inherited.color, "#112233");
        assert_eq!(inherited.image_url.as_deref(), Some("washroom.png"));

        catalog
            .set_sub_type_color(&type_id, &sub_id, Some("#AA0000"))
            .unwrap();
        catalog
            .set_sub_type_image(&type_id, &sub_id, Some("accessible.png".to_string()))
            .unwrap();
        let own = catalog.resolve_design("washroom", Some("accessible"));
        assert_eq!(own.color, "#aa0000");
        assert_eq!(own.image_url.as_deref(), Some("accessible.png"));
    }

    #[test]
    fn test_resolve_unknown_type() {
        let catalog = Catalog::new();
        let design = catalog.resolve_design("Nope", None);
        assert_eq!(design.color, DEFAULT_SIGNAGE_COLOR);
        assert!(design.image_url.is_none());
    }

    #[test]
    fn test_invalid_color_rejected() {
        let mut catalog = Catalog::new();
        let id = catalog.add_signage_type("Tickets").unwrap();
        assert!(matches!(
            catalog.set_type_color(&id, Some("blue")),
            Err(ModelError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_holder_types() {
        let mut catalog = Catalog::new();
        catalog.add_holder_type("A-frame", 2).unwrap();
        assert!(catalog.add_holder_type("a-frame", 1).is_err());
        assert!(matches!(
            catalog.add_holder_type("Tripod", 3),
            Err(ModelError::InvalidSides { sides: 3 })
        ));

        assert_eq!(catalog.holder_sides(Some("A-FRAME")), 2);
        assert_eq!(catalog.holder_sides(Some("unknown")), 1);
        assert_eq!(catalog.holder_sides(None), 1);
    }

    #[test]
    fn test_defaults() {
        let catalog = Catalog::with_defaults();
        assert!(catalog.signage_type("Tickets").is_some());
        assert!(catalog.signage_type("Washroom").unwrap().icon.is_some());
        assert_eq!(catalog.holder_sides(Some("A-frame")), 2);
        assert_eq!(catalog.holder_types.len(), 3);
    }
}
