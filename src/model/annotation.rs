//! Annotation data structures.
//!
//! Annotations are stored in percentage-of-image coordinates so they survive
//! any resize of the rendered floor plan. A single point is a marker, two or
//! more points form a polyline (barriers, crowd flow arrows).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{PERCENT_MAX, PERCENT_MIN};
use crate::model::error::ModelError;
use crate::timestamp::now_iso8601;

/// Unique identifier for an annotation.
pub type AnnotationId = String;

/// A point on the floor plan, each component in 0..=100 percent of the image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentPoint {
    pub x: f32,
    pub y: f32,
}

impl PercentPoint {
    /// Create a new point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Clamp both components into the valid percentage range.
    pub fn clamped(self) -> Self {
        Self {
            x: self.x.clamp(PERCENT_MIN, PERCENT_MAX),
            y: self.y.clamp(PERCENT_MIN, PERCENT_MAX),
        }
    }

    /// Check that both components are finite and inside the image.
    pub fn in_range(&self) -> bool {
        let ok = |v: f32| v.is_finite() && (PERCENT_MIN..=PERCENT_MAX).contains(&v);
        ok(self.x) && ok(self.y)
    }
}

/// Top-level kind of annotation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationCategory {
    /// Sign markers, aggregated on the assets dashboard
    #[default]
    Signage,
    /// Barrier lines (fencing, bike racks)
    Barrier,
    /// Crowd flow lines
    Flow,
}

impl AnnotationCategory {
    /// Get the display name for this category.
    pub fn name(&self) -> &'static str {
        match self {
            AnnotationCategory::Signage => "Signage",
            AnnotationCategory::Barrier => "Barrier",
            AnnotationCategory::Flow => "Flow",
        }
    }

    /// Get all categories.
    pub fn all() -> &'static [AnnotationCategory] {
        &[
            AnnotationCategory::Signage,
            AnnotationCategory::Barrier,
            AnnotationCategory::Flow,
        ]
    }
}

/// Arrow direction printed on a sign face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    /// Get the display name for this direction.
    pub fn name(&self) -> &'static str {
        match self {
            Direction::None => "None",
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Left => "Left",
            Direction::Right => "Right",
            Direction::UpLeft => "Up-left",
            Direction::UpRight => "Up-right",
            Direction::DownLeft => "Down-left",
            Direction::DownRight => "Down-right",
        }
    }

    /// Get all directions.
    pub fn all() -> &'static [Direction] {
        &[
            Direction::None,
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
            Direction::UpLeft,
            Direction::UpRight,
            Direction::DownLeft,
            Direction::DownRight,
        ]
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Direction::all()
            .iter()
            .copied()
            .find(|d| d.name().to_lowercase() == wanted)
            .ok_or_else(|| format!("unknown direction '{}'", s))
    }
}

/// Production / installation status of a sign face or stand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    #[default]
    Pending,
    Ordered,
    Printed,
    Installed,
    Damaged,
    Removed,
}

impl AssetStatus {
    /// Get the display name for this status.
    pub fn name(&self) -> &'static str {
        match self {
            AssetStatus::Pending => "Pending",
            AssetStatus::Ordered => "Ordered",
            AssetStatus::Printed => "Printed",
            AssetStatus::Installed => "Installed",
            AssetStatus::Damaged => "Damaged",
            AssetStatus::Removed => "Removed",
        }
    }

    /// All statuses in dashboard column order.
    pub fn all() -> &'static [AssetStatus] {
        &[
            AssetStatus::Pending,
            AssetStatus::Ordered,
            AssetStatus::Printed,
            AssetStatus::Installed,
            AssetStatus::Damaged,
            AssetStatus::Removed,
        ]
    }

    /// Position of this status in [`AssetStatus::all`].
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AssetStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        AssetStatus::all()
            .iter()
            .copied()
            .find(|st| st.name().to_lowercase() == wanted)
            .ok_or_else(|| format!("unknown status '{}'", s))
    }
}

/// One physical side of a sign holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceSide {
    Side1,
    Side2,
}

impl FaceSide {
    /// 1-based side number.
    pub fn number(&self) -> u8 {
        match self {
            FaceSide::Side1 => 1,
            FaceSide::Side2 => 2,
        }
    }
}

/// Content configured for one face of a sign.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideData {
    /// Signage type name (e.g. "Washroom")
    #[serde(default)]
    pub signage_type_name: String,
    /// Optional sub-type name within the signage type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_type_name: Option<String>,
    /// Arrow direction
    #[serde(default)]
    pub direction: Direction,
    /// Production status of this face
    #[serde(default)]
    pub status: AssetStatus,
}

impl SideData {
    /// Create side data for a signage type.
    pub fn new(signage_type_name: impl Into<String>) -> Self {
        Self {
            signage_type_name: signage_type_name.into(),
            ..Self::default()
        }
    }

    /// Set the sub-type.
    pub fn with_sub_type(mut self, sub_type_name: impl Into<String>) -> Self {
        self.sub_type_name = Some(sub_type_name.into());
        self
    }

    /// Set the direction.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set the status.
    pub fn with_status(mut self, status: AssetStatus) -> Self {
        self.status = status;
        self
    }
}

/// A placed marker or polyline on a venue layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    /// Unique identifier.
    pub id: AnnotationId,

    /// Signage, barrier or flow.
    #[serde(default)]
    pub category: AnnotationCategory,

    /// Free-text kind within the category (e.g. "sign", "fence", "entry").
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Percentage coordinates; one point is a marker, more form a polyline.
    pub points: Vec<PercentPoint>,

    /// Content of the first face.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side1: Option<SideData>,

    /// Content of the second face, only used by two-sided holders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side2: Option<SideData>,

    /// Holder type name (stand, A-frame, wall mount...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holder_type: Option<String>,

    /// Orientation in degrees, 0..360.
    #[serde(default)]
    pub orientation: f32,

    /// Free-text notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Reference photos of the installed sign.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_urls: Vec<String>,

    /// Legacy root-level signage type (pre per-side data).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signage_type_name: Option<String>,

    /// Legacy root-level sub-type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_type_name: Option<String>,

    /// Legacy root-level direction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,

    /// Legacy root-level status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AssetStatus>,

    /// Creation timestamp (ISO 8601).
    #[serde(default)]
    pub created_at: String,

    /// Last modification timestamp (ISO 8601).
    #[serde(default)]
    pub updated_at: String,
}

impl Annotation {
    /// Create a single-point marker.
    pub fn marker(
        category: AnnotationCategory,
        kind: impl Into<String>,
        point: PercentPoint,
    ) -> Result<Self, ModelError> {
        Self::with_points(category, kind, vec![point])
    }

    /// Create a polyline; needs at least two points.
    pub fn polyline(
        category: AnnotationCategory,
        kind: impl Into<String>,
        points: Vec<PercentPoint>,
    ) -> Result<Self, ModelError> {
        if points.len() < 2 {
            return Err(ModelError::invalid_points(format!(
                "a polyline needs at least 2 points, got {}",
                points.len()
            )));
        }
        Self::with_points(category, kind, points)
    }

    fn with_points(
        category: AnnotationCategory,
        kind: impl Into<String>,
        points: Vec<PercentPoint>,
    ) -> Result<Self, ModelError> {
        validate_points(&points)?;
        let now = now_iso8601();
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            category,
            kind: kind.into(),
            points,
            side1: None,
            side2: None,
            holder_type: None,
            orientation: 0.0,
            notes: None,
            image_urls: Vec::new(),
            signage_type_name: None,
            sub_type_name: None,
            direction: None,
            status: None,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Set the first face.
    pub fn with_side1(mut self, side: SideData) -> Self {
        self.side1 = Some(side);
        self
    }

    /// Set the second face.
    pub fn with_side2(mut self, side: SideData) -> Self {
        self.side2 = Some(side);
        self
    }

    /// Set the holder type name.
    pub fn with_holder(mut self, holder: impl Into<String>) -> Self {
        self.holder_type = Some(holder.into());
        self
    }

    /// Set the notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Set the orientation (normalized to 0..360).
    pub fn with_orientation(mut self, degrees: f32) -> Self {
        self.orientation = normalize_orientation(degrees);
        self
    }

    /// Check if this annotation is a single-point marker.
    pub fn is_marker(&self) -> bool {
        self.points.len() == 1
    }

    /// Check if this annotation is a polyline.
    pub fn is_polyline(&self) -> bool {
        self.points.len() > 1
    }

    /// First point, used as the anchor for labels and markers.
    pub fn anchor(&self) -> Option<PercentPoint> {
        self.points.first().copied()
    }

    /// Notes trimmed, or None when empty.
    pub fn notes_text(&self) -> Option<&str> {
        self.notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }

    /// Side 1 content, falling back to the legacy root-level fields.
    pub fn primary_side(&self) -> SideData {
        if let Some(side) = &self.side1 {
            return side.clone();
        }
        SideData {
            signage_type_name: self.signage_type_name.clone().unwrap_or_default(),
            sub_type_name: self.sub_type_name.clone(),
            direction: self.direction.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
        }
    }

    /// Side 2 content for a holder with `sides` faces.
    ///
    /// Single-sided holders have no second face. A two-sided holder without
    /// explicit side 2 data shows the same content on both faces.
    pub fn secondary_side(&self, sides: u8) -> Option<SideData> {
        if sides < 2 {
            return None;
        }
        Some(self.side2.clone().unwrap_or_else(|| self.primary_side()))
    }

    /// Update the modification timestamp.
    pub fn touch(&mut self) {
        self.updated_at = now_iso8601();
    }

    /// Apply a partial update.
    ///
    /// The patch is validated first; on error the annotation is left untouched.
    pub fn apply_patch(&mut self, patch: AnnotationPatch) -> Result<(), ModelError> {
        if let Some(points) = &patch.points {
            validate_points(points)?;
        }

        let AnnotationPatch {
            category,
            kind,
            points,
            side1,
            side2,
            holder_type,
            orientation,
            notes,
            image_urls,
        } = patch;

        if let Some(category) = category {
            self.category = category;
        }
        if let Some(kind) = kind {
            self.kind = kind;
        }
        if let Some(points) = points {
            self.points = points;
        }
        if let Some(side1) = side1 {
            self.side1 = side1;
        }
        if let Some(side2) = side2 {
            self.side2 = side2;
        }
        if let Some(holder_type) = holder_type {
            self.holder_type = holder_type;
        }
        if let Some(orientation) = orientation {
            self.orientation = normalize_orientation(orientation);
        }
        if let Some(notes) = notes {
            self.notes = notes;
        }
        if let Some(image_urls) = image_urls {
            self.image_urls = image_urls;
        }

        self.touch();
        Ok(())
    }

    /// Check the geometry of this annotation.
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_points(&self.points)
    }
}

/// Partial update for an [`Annotation`].
///
/// Outer `None` leaves a field alone; `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationPatch {
    pub category: Option<AnnotationCategory>,
    pub kind: Option<String>,
    pub points: Option<Vec<PercentPoint>>,
    pub side1: Option<Option<SideData>>,
    pub side2: Option<Option<SideData>>,
    pub holder_type: Option<Option<String>>,
    pub orientation: Option<f32>,
    pub notes: Option<Option<String>>,
    pub image_urls: Option<Vec<String>>,
}

impl AnnotationPatch {
    /// Create an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the annotation.
    pub fn points(mut self, points: Vec<PercentPoint>) -> Self {
        self.points = Some(points);
        self
    }

    /// Replace or clear side 1.
    pub fn side1(mut self, side: Option<SideData>) -> Self {
        self.side1 = Some(side);
        self
    }

    /// Replace or clear side 2.
    pub fn side2(mut self, side: Option<SideData>) -> Self {
        self.side2 = Some(side);
        self
    }

    /// Replace or clear the holder type.
    pub fn holder_type(mut self, holder: Option<String>) -> Self {
        self.holder_type = Some(holder);
        self
    }

    /// Set the orientation.
    pub fn orientation(mut self, degrees: f32) -> Self {
        self.orientation = Some(degrees);
        self
    }

    /// Replace or clear the notes.
    pub fn notes(mut self, notes: Option<String>) -> Self {
        self.notes = Some(notes);
        self
    }

    /// Check if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Normalize an angle in degrees to 0..360.
pub fn normalize_orientation(degrees: f32) -> f32 {
    if degrees.is_finite() {
        degrees.rem_euclid(360.0)
    } else {
        0.0
    }
}

fn validate_points(points: &[PercentPoint]) -> Result<(), ModelError> {
    if points.is_empty() {
        return Err(ModelError::invalid_points("annotation has no points"));
    }
    if let Some((idx, p)) = points.iter().enumerate().find(|(_, p)| !p.in_range()) {
        return Err(ModelError::invalid_points(format!(
            "point {} ({}, {}) is outside 0..100",
            idx, p.x, p.y
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign() -> Annotation {
        Annotation::marker(
            AnnotationCategory::Signage,
            "sign",
            PercentPoint::new(10.0, 20.0),
        )
        .unwrap()
    }

    #[test]
    fn test_marker_and_polyline() {
        let marker = sign();
        assert!(marker.is_marker());
        assert!(!marker.is_polyline());
        assert!(!marker.id.is_empty());

        let line = Annotation::polyline(
            AnnotationCategory::Barrier,
            "fence",
            vec![PercentPoint::new(0.0, 0.0), PercentPoint::new(50.0, 50.0)],
        )
        .unwrap();
        assert!(line.is_polyline());
    }

    #[test]
    fn test_polyline_needs_two_points() {
        let result = Annotation::polyline(
            AnnotationCategory::Flow,
            "entry",
            vec![PercentPoint::new(1.0, 1.0)],
        );
        assert!(matches!(result, Err(ModelError::InvalidPoints { .. })));
    }

    #[test]
    fn test_out_of_range_point_rejected() {
        let result = Annotation::marker(
            AnnotationCategory::Signage,
            "sign",
            PercentPoint::new(101.0, 5.0),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_primary_side_legacy_fallback() {
        let mut ann = sign();
        ann.signage_type_name = Some("Washroom".to_string());
        ann.direction = Some(Direction::Left);
        ann.status = Some(AssetStatus::Installed);

        let side = ann.primary_side();
        assert_eq!(side.signage_type_name, "Washroom");
        assert_eq!(side.direction, Direction::Left);
        assert_eq!(side.status, AssetStatus::Installed);

        // Explicit side data wins over legacy fields
        let ann = ann.with_side1(SideData::new("Tickets"));
        assert_eq!(ann.primary_side().signage_type_name, "Tickets");
    }

    #[test]
    fn test_secondary_side() {
        let ann = sign().with_side1(SideData::new("Tickets"));
        assert!(ann.secondary_side(1).is_none());
        assert_eq!(
            ann.secondary_side(2).unwrap().signage_type_name,
            "Tickets"
        );

        let ann = ann.with_side2(SideData::new("Alcohol"));
        assert_eq!(
            ann.secondary_side(2).unwrap().signage_type_name,
            "Alcohol"
        );
    }

    #[test]
    fn test_apply_patch() {
        let mut ann = sign();
        ann.apply_patch(
            AnnotationPatch::new()
                .orientation(-90.0)
                .notes(Some("by the gate".to_string()))
                .holder_type(Some("A-frame".to_string())),
        )
        .unwrap();

        assert_eq!(ann.orientation, 270.0);
        assert_eq!(ann.notes_text(), Some("by the gate"));
        assert_eq!(ann.holder_type.as_deref(), Some("A-frame"));

        ann.apply_patch(AnnotationPatch::new().notes(None)).unwrap();
        assert!(ann.notes.is_none());
    }

    #[test]
    fn test_invalid_patch_leaves_annotation_untouched() {
        let mut ann = sign();
        let before = ann.clone();
        let result = ann.apply_patch(
            AnnotationPatch::new()
                .points(vec![PercentPoint::new(-1.0, 0.0)])
                .orientation(45.0),
        );
        assert!(result.is_err());
        assert_eq!(ann, before);
    }

    #[test]
    fn test_json_uses_web_field_names() {
        let ann = sign()
            .with_side1(SideData::new("Tickets").with_direction(Direction::UpLeft))
            .with_holder("Stand");
        let json = serde_json::to_value(&ann).unwrap();

        assert_eq!(json["type"], "sign");
        assert_eq!(json["category"], "signage");
        assert_eq!(json["holderType"], "Stand");
        assert_eq!(json["side1"]["signageTypeName"], "Tickets");
        assert_eq!(json["side1"]["direction"], "up-left");
        assert!(json.get("side2").is_none());
    }

    #[test]
    fn test_legacy_json_deserializes() {
        let json = r#"{
            "id": "a1",
            "type": "sign",
            "points": [{"x": 5, "y": 6}],
            "signageTypeName": "Alcohol",
            "status": "printed"
        }"#;
        let ann: Annotation = serde_json::from_str(json).unwrap();
        assert_eq!(ann.category, AnnotationCategory::Signage);
        assert_eq!(ann.primary_side().signage_type_name, "Alcohol");
        assert_eq!(ann.primary_side().status, AssetStatus::Printed);
    }

    #[test]
    fn test_status_and_direction_parse() {
        assert_eq!("installed".parse::<AssetStatus>(), Ok(AssetStatus::Installed));
        assert_eq!(" Pending ".parse::<AssetStatus>(), Ok(AssetStatus::Pending));
        assert!("done".parse::<AssetStatus>().is_err());
        assert_eq!("down_right".parse::<Direction>(), Ok(Direction::DownRight));
        assert_eq!("Up-left".parse::<Direction>(), Ok(Direction::UpLeft));
    }

    #[test]
    fn test_status_index_matches_all() {
        for (i, status) in AssetStatus::all().iter().enumerate() {
            assert_eq!(status.index(), i);
        }
    }
}
