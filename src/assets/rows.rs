//! Dashboard rows built from face records.
//!
//! Grouping is insertion-stable: rows appear in the order their first face
//! was seen. Name comparisons use the same trimmed, case-insensitive rule as
//! duplicate-name validation; rows display the first spelling seen.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::assets::face::FaceRecord;
use crate::assets::histogram::{RowStatus, StatusHistogram};
use crate::constants::UNASSIGNED_HOLDER;
use crate::model::{AssetStatus, Catalog, Direction};

/// Signs tab row: faces with identical content.
#[derive(Debug, Clone, PartialEq)]
pub struct SignRow {
    pub type_name: String,
    pub sub_type_name: Option<String>,
    pub direction: Direction,
    pub notes: Option<String>,
    pub color: String,
    pub icon: Option<String>,
    /// Number of faces
    pub quantity: usize,
    pub statuses: StatusHistogram,
    /// Annotations contributing faces, first-seen order, no repeats
    pub annotation_ids: Vec<String>,
}

impl SignRow {
    /// Status column value.
    pub fn status(&self) -> RowStatus {
        self.statuses.row_status()
    }
}

/// Stands tab row: placed holders of one type.
#[derive(Debug, Clone, PartialEq)]
pub struct StandRow {
    pub holder_name: String,
    pub sides: u8,
    /// Number of placed stands
    pub quantity: usize,
    /// Number of faces across those stands
    pub faces: usize,
    /// Status of each stand's primary face
    pub statuses: StatusHistogram,
    pub annotation_ids: Vec<String>,
}

impl StandRow {
    /// Status column value.
    pub fn status(&self) -> RowStatus {
        self.statuses.row_status()
    }
}

/// Designs tab row: one printable artwork.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignRow {
    pub type_name: String,
    pub sub_type_name: Option<String>,
    pub color: String,
    pub icon: Option<String>,
    pub image_url: Option<String>,
    /// Number of faces printed with this design
    pub quantity: usize,
    pub statuses: StatusHistogram,
}

impl DesignRow {
    /// Status column value.
    pub fn status(&self) -> RowStatus {
        self.statuses.row_status()
    }

    /// Whether artwork is attached (directly or inherited).
    pub fn has_artwork(&self) -> bool {
        self.image_url.as_deref().is_some_and(|u| !u.trim().is_empty())
    }
}

/// Ordered grouping of items into rows keyed by `K`.
struct Grouper<K, R> {
    index: HashMap<K, usize>,
    rows: Vec<R>,
}

impl<K: Eq + Hash, R> Grouper<K, R> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            rows: Vec::new(),
        }
    }

    /// Row for `key`, created with `make` on first sight.
    fn entry(&mut self, key: K, make: impl FnOnce() -> R) -> &mut R {
        let idx = *self.index.entry(key).or_insert_with(|| {
            self.rows.push(make());
            self.rows.len() - 1
        });
        &mut self.rows[idx]
    }

    fn into_rows(self) -> Vec<R> {
        self.rows
    }
}

fn fold(name: &str) -> String {
    name.trim().to_lowercase()
}

fn fold_opt(name: Option<&str>) -> Option<String> {
    name.map(fold)
}

fn push_unique(ids: &mut Vec<String>, id: &str) {
    if !ids.iter().any(|i| i == id) {
        ids.push(id.to_string());
    }
}

/// Group faces into sign rows by (type, sub-type, direction, notes).
///
/// Notes take part in the key, so annotated faces only group with faces
/// carrying the very same note.
pub fn group_signs(faces: &[FaceRecord], catalog: &Catalog) -> Vec<SignRow> {
    let mut grouper = Grouper::new();

    for face in faces {
        let key = (
            fold(&face.type_name),
            fold_opt(face.sub_type_name.as_deref()),
            face.direction,
            face.notes.clone(),
        );
        let row = grouper.entry(key, || {
            let design = catalog.resolve_design(&face.type_name, face.sub_type_name.as_deref());
            SignRow {
                type_name: face.type_name.clone(),
                sub_type_name: face.sub_type_name.clone(),
                direction: face.direction,
                notes: face.notes.clone(),
                color: design.color,
                icon: design.icon,
                quantity: 0,
                statuses: StatusHistogram::new(),
                annotation_ids: Vec::new(),
            }
        });
        row.quantity += 1;
        row.statuses.add(face.status);
        push_unique(&mut row.annotation_ids, &face.annotation_id);
    }

    grouper.into_rows()
}

/// Group stands by holder type; markers without a holder are "Unassigned".
///
/// Each annotation counts once, using the status of its first face.
pub fn group_stands(faces: &[FaceRecord], catalog: &Catalog) -> Vec<StandRow> {
    let mut grouper: Grouper<Option<String>, StandRow> = Grouper::new();
    // (layout, annotation) pairs already counted as a stand
    let mut seen: HashSet<(&str, &str)> = HashSet::new();

    for face in faces {
        let holder = face.holder_type.as_deref().map(str::trim).filter(|h| !h.is_empty());
        let row = grouper.entry(fold_opt(holder), || {
            let known = holder.and_then(|h| catalog.holder_type(h));
            StandRow {
                holder_name: known
                    .map(|h| h.name.clone())
                    .or_else(|| holder.map(str::to_string))
                    .unwrap_or_else(|| UNASSIGNED_HOLDER.to_string()),
                sides: catalog.holder_sides(holder),
                quantity: 0,
                faces: 0,
                statuses: StatusHistogram::new(),
                annotation_ids: Vec::new(),
            }
        });

        row.faces += 1;
        if seen.insert((face.layout_id.as_str(), face.annotation_id.as_str())) {
            row.quantity += 1;
            row.statuses.add(face.status);
            row.annotation_ids.push(face.annotation_id.clone());
        }
    }

    grouper.into_rows()
}

/// Group faces by design (type, sub-type) with inherited colour and artwork.
pub fn group_designs(faces: &[FaceRecord], catalog: &Catalog) -> Vec<DesignRow> {
    let mut grouper = Grouper::new();

    for face in faces {
        let key = (
            fold(&face.type_name),
            fold_opt(face.sub_type_name.as_deref()),
        );
        let row = grouper.entry(key, || {
            let design = catalog.resolve_design(&face.type_name, face.sub_type_name.as_deref());
            DesignRow {
                type_name: face.type_name.clone(),
                sub_type_name: face.sub_type_name.clone(),
                color: design.color,
                icon: design.icon,
                image_url: design.image_url,
                quantity: 0,
                statuses: StatusHistogram::new(),
            }
        });
        row.quantity += 1;
        row.statuses.add(face.status);
    }

    grouper.into_rows()
}

/// Sum row histograms into a dashboard-wide histogram.
pub fn total_statuses<'a>(rows: impl IntoIterator<Item = &'a StatusHistogram>) -> StatusHistogram {
    let mut total = StatusHistogram::new();
    for h in rows {
        total += *h;
    }
    total
}

/// Count of faces per status across sign rows (for quick badges).
pub fn count_status(rows: &[SignRow], status: AssetStatus) -> usize {
    rows.iter().map(|r| r.statuses.get(status)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FaceSide;

    fn face(annotation: &str, type_name: &str, notes: Option<&str>) -> FaceRecord {
        FaceRecord {
            layout_id: "l".to_string(),
            annotation_id: annotation.to_string(),
            side: FaceSide::Side1,
            type_name: type_name.to_string(),
            sub_type_name: None,
            direction: Direction::None,
            status: AssetStatus::Pending,
            notes: notes.map(str::to_string),
            holder_type: None,
        }
    }

    #[test]
    fn test_sign_grouping_is_insertion_stable() {
        let faces = vec![
            face("a", "Washroom", None),
            face("b", "Tickets", None),
            face("c", "washroom", None),
        ];
        let rows = group_signs(&faces, &Catalog::new());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].type_name, "Washroom");
        assert_eq!(rows[0].quantity, 2);
        assert_eq!(rows[0].annotation_ids, vec!["a", "c"]);
        assert_eq!(rows[1].type_name, "Tickets");
    }

    #[test]
    fn test_notes_split_groups() {
        let faces = vec![
            face("a", "Exit", None),
            face("b", "Exit", Some("near stage")),
            face("c", "Exit", Some("by bar")),
            face("d", "Exit", None),
        ];
        let rows = group_signs(&faces, &Catalog::new());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].quantity, 2);
        assert_eq!(rows[1].notes.as_deref(), Some("near stage"));
        assert_eq!(rows[1].quantity, 1);
    }

    #[test]
    fn test_direction_splits_groups() {
        let mut left = face("a", "Exit", None);
        left.direction = Direction::Left;
        let faces = vec![left, face("b", "Exit", None)];
        assert_eq!(group_signs(&faces, &Catalog::new()).len(), 2);
    }

    #[test]
    fn test_two_faces_of_one_annotation_list_id_once() {
        let mut back = face("a", "Exit", None);
        back.side = FaceSide::Side2;
        let faces = vec![face("a", "Exit", None), back];
        let rows = group_signs(&faces, &Catalog::new());
        assert_eq!(rows[0].quantity, 2);
        assert_eq!(rows[0].annotation_ids, vec!["a"]);
    }

    #[test]
    fn test_stand_rows_count_annotations_once() {
        let mut catalog = Catalog::new();
        catalog.add_holder_type("A-frame", 2).unwrap();

        let mut front = face("a", "Exit", None);
        front.holder_type = Some("a-frame".to_string());
        front.status = AssetStatus::Installed;
        let mut back = front.clone();
        back.side = FaceSide::Side2;
        back.status = AssetStatus::Damaged;

        let faces = vec![front, back, face("b", "Exit", None)];
        let rows = group_stands(&faces, &catalog);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].holder_name, "A-frame");
        assert_eq!(rows[0].sides, 2);
        assert_eq!(rows[0].quantity, 1);
        assert_eq!(rows[0].faces, 2);
        assert_eq!(rows[0].status(), RowStatus::Uniform(AssetStatus::Installed));
        assert_eq!(rows[1].holder_name, UNASSIGNED_HOLDER);
        assert_eq!(rows[1].sides, 1);
    }

    #[test]
    fn test_design_rows_inherit_artwork() {
        let mut catalog = Catalog::new();
        let id = catalog.add_signage_type("Washroom").unwrap();
        catalog
            .set_type_image(&id, Some("washroom.svg".to_string()))
            .unwrap();
        catalog.add_sub_type(&id, "Accessible").unwrap();

        let mut accessible = face("a", "Washroom", None);
        accessible.sub_type_name = Some("Accessible".to_string());
        let faces = vec![accessible, face("b", "Washroom", None), face("c", "Merch", None)];

        let rows = group_designs(&faces, &catalog);
        assert_eq!(rows.len(), 3);
        assert!(rows[0].has_artwork());
        assert_eq!(rows[0].image_url.as_deref(), Some("washroom.svg"));
        assert!(rows[1].has_artwork());
        assert!(!rows[2].has_artwork());
    }

    #[test]
    fn test_design_row_status() {
        let mut printed = face("b", "Exit", None);
        printed.status = AssetStatus::Printed;
        let faces = vec![face("a", "Exit", None), face("c", "Bar", None), printed];

        let rows = group_designs(&faces, &Catalog::new());
        assert_eq!(rows[0].quantity, 2);
        assert_eq!(rows[0].status(), RowStatus::Mixed);
        assert_eq!(rows[1].status(), RowStatus::Uniform(AssetStatus::Pending));
    }

    #[test]
    fn test_total_statuses() {
        let faces = vec![face("a", "Exit", None), face("b", "Bar", None)];
        let rows = group_signs(&faces, &Catalog::new());
        let total = total_statuses(rows.iter().map(|r| &r.statuses));
        assert_eq!(total.total(), 2);
        assert_eq!(count_status(&rows, AssetStatus::Pending), 2);
    }
}
