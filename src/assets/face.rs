//! Face explosion: one record per physical sign face.

use crate::model::{
    Annotation, AnnotationCategory, AssetStatus, Catalog, Direction, FaceSide, SideData,
    VenueLayout,
};

/// One physical face of a placed sign.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceRecord {
    pub layout_id: String,
    pub annotation_id: String,
    pub side: FaceSide,
    pub type_name: String,
    pub sub_type_name: Option<String>,
    pub direction: Direction,
    pub status: AssetStatus,
    pub notes: Option<String>,
    pub holder_type: Option<String>,
}

impl FaceRecord {
    fn new(layout_id: &str, annotation: &Annotation, side: FaceSide, data: SideData) -> Self {
        Self {
            layout_id: layout_id.to_string(),
            annotation_id: annotation.id.clone(),
            side,
            type_name: data.signage_type_name.trim().to_string(),
            sub_type_name: data
                .sub_type_name
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            direction: data.direction,
            status: data.status,
            notes: annotation.notes_text().map(str::to_string),
            holder_type: annotation.holder_type.clone(),
        }
    }
}

/// Faces of a single annotation: none for barriers and flows, one or two for
/// signage depending on its holder type.
pub fn annotation_faces(
    layout_id: &str,
    annotation: &Annotation,
    catalog: &Catalog,
) -> Vec<FaceRecord> {
    if annotation.category != AnnotationCategory::Signage {
        return Vec::new();
    }

    let sides = catalog.holder_sides(annotation.holder_type.as_deref());
    let mut faces = vec![FaceRecord::new(
        layout_id,
        annotation,
        FaceSide::Side1,
        annotation.primary_side(),
    )];
    if let Some(second) = annotation.secondary_side(sides) {
        faces.push(FaceRecord::new(layout_id, annotation, FaceSide::Side2, second));
    }
    faces
}

/// Faces of every signage annotation in a layout, in drawing order.
pub fn layout_faces(layout: &VenueLayout, catalog: &Catalog) -> Vec<FaceRecord> {
    layout
        .annotations
        .iter()
        .flat_map(|a| annotation_faces(&layout.id, a, catalog))
        .collect()
}
