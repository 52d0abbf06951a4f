//! Unit tests for export format implementations.

mod csv_tables_tests;

use crate::format::ExportBundle;
use crate::model::{
    Annotation, AnnotationCategory, AssetStatus, Catalog, Event, FloorPlan, PercentPoint,
    SideData,
};

/// Catalog with three signage types (only "Exit" has artwork) and two holders.
fn sample_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    let exit = catalog.add_signage_type("Exit").unwrap();
    catalog
        .set_type_image(&exit, Some("art/exit.svg".to_string()))
        .unwrap();
    catalog.add_signage_type("Tickets").unwrap();
    catalog.add_signage_type("Washroom").unwrap();
    catalog.add_holder_type("A-frame", 2).unwrap();
    catalog.add_holder_type("Pole", 1).unwrap();
    catalog
}

fn sign(side1: SideData, holder: Option<&str>) -> Annotation {
    let ann = Annotation::marker(
        AnnotationCategory::Signage,
        "sign",
        PercentPoint::new(25.0, 75.0),
    )
    .unwrap()
    .with_side1(side1);
    match holder {
        Some(h) => ann.with_holder(h),
        None => ann,
    }
}

/// "Main hall" (floor plan, 3 annotations, 3 faces) and "Annex" (no floor
/// plan, 1 annotation, 1 face).
fn sample_bundle() -> ExportBundle {
    let mut event = Event::new("Summer Festival");
    event.venue = Some("Riverside Park".to_string());

    let main = event.add_layout("Main hall").unwrap();
    let annex = event.add_layout("Annex").unwrap();

    let layout = event.layout_mut(&main).unwrap();
    layout.floor_plan = Some(FloorPlan::new("plans/main.png").with_dimensions(2000, 1000));
    layout.annotations = vec![
        sign(
            SideData::new("Exit").with_status(AssetStatus::Installed),
            Some("A-frame"),
        )
        .with_side2(SideData::new("Tickets"))
        .with_notes("north gate"),
        sign(SideData::new("Exit"), Some("Pole")),
        Annotation::polyline(
            AnnotationCategory::Barrier,
            "fence",
            vec![PercentPoint::new(10.0, 10.0), PercentPoint::new(90.0, 10.0)],
        )
        .unwrap(),
    ];

    event.layout_mut(&annex).unwrap().annotations =
        vec![sign(SideData::new("Washroom"), None)];

    ExportBundle::new(event, sample_catalog())
}

/// Parse CSV output into (header, records).
fn read_csv(bytes: &[u8]) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_reader(bytes);
    let header = reader
        .headers()
        .unwrap()
        .iter()
        .map(str::to_string)
        .collect();
    let records = reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect();
    (header, records)
}
