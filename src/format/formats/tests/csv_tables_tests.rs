//! Tests for the dashboard CSV tables.

use super::{read_csv, sample_bundle};
use crate::assets::DashboardFilter;
use crate::format::formats::CsvTableFormat;
use crate::format::{ExportFormat, ExportOptions, FormatError, WarningSeverity};
use crate::model::AssetStatus;

#[test]
fn test_format_metadata() {
    assert_eq!(CsvTableFormat::signs().id(), "signs-csv");
    assert_eq!(CsvTableFormat::stands().id(), "stands-csv");
    assert_eq!(CsvTableFormat::designs().id(), "designs-csv");
    assert_eq!(CsvTableFormat::signs().extension(), "csv");
    assert!(!CsvTableFormat::signs().supports_import());
}

#[test]
fn test_signs_table() {
    let result = CsvTableFormat::signs()
        .export_to_bytes(&sample_bundle(), &ExportOptions::default())
        .unwrap();
    let (header, records) = read_csv(&result.bytes);

    assert_eq!(header.len(), 7 + AssetStatus::all().len());
    assert_eq!(header[0], "Type");
    assert_eq!(header[7], "Pending");
    assert_eq!(result.rows_exported, 4);
    assert_eq!(records.len(), 4);
    assert_eq!(result.annotations_exported, 4);

    // Notes keep the front face apart from the plain Exit sign
    assert_eq!(records[0][0], "Exit");
    assert_eq!(records[0][3], "north gate");
    assert_eq!(records[0][6], "Installed");
    assert_eq!(records[2][0], "Exit");
    assert_eq!(records[2][3], "");

    let quantity: usize = records.iter().map(|r| r[5].parse::<usize>().unwrap()).sum();
    assert_eq!(quantity, 4);
}

#[test]
fn test_stands_table() {
    let result = CsvTableFormat::stands()
        .export_to_bytes(&sample_bundle(), &ExportOptions::default())
        .unwrap();
    let (_, records) = read_csv(&result.bytes);

    let holders: Vec<&str> = records.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(holders, vec!["A-frame", "Pole", "Unassigned"]);
    assert_eq!(records[0][1], "2");
    assert_eq!(records[0][2], "1");
    assert_eq!(records[0][3], "2");
}

#[test]
fn test_designs_table_warns_about_missing_artwork() {
    let result = CsvTableFormat::designs()
        .export_to_bytes(&sample_bundle(), &ExportOptions::default())
        .unwrap();
    let (_, records) = read_csv(&result.bytes);

    assert_eq!(records.len(), 3);
    assert_eq!(records[0][4], "art/exit.svg");
    assert_eq!(records[0][6], "Mixed");
    assert_eq!(result.warnings.len(), 2);
    assert!(
        result
            .warnings
            .iter()
            .all(|w| w.severity == WarningSeverity::Warning)
    );
}

#[test]
fn test_filter_and_layout_restriction() {
    let options = ExportOptions::new()
        .layout("Main hall")
        .filter(DashboardFilter::new().with_search("exit"));
    let result = CsvTableFormat::signs()
        .export_to_bytes(&sample_bundle(), &options)
        .unwrap();

    assert_eq!(result.rows_exported, 2);
    assert_eq!(result.annotations_exported, 3);
}

#[test]
fn test_empty_table_is_reported() {
    let options =
        ExportOptions::new().filter(DashboardFilter::new().with_status(AssetStatus::Removed));
    let result = CsvTableFormat::stands()
        .export_to_bytes(&sample_bundle(), &options)
        .unwrap();

    let (header, records) = read_csv(&result.bytes);
    assert_eq!(header[0], "Holder");
    assert!(records.is_empty());
    assert_eq!(result.warnings[0].severity, WarningSeverity::Info);
}

#[test]
fn test_unknown_layout() {
    let result = CsvTableFormat::signs()
        .export_to_bytes(&sample_bundle(), &ExportOptions::new().layout("Roof"));
    assert!(matches!(result, Err(FormatError::LayoutNotFound { .. })));
}

#[test]
fn test_import_unsupported() {
    assert!(matches!(
        CsvTableFormat::signs().import_from_bytes(b"Type\n"),
        Err(FormatError::UnsupportedOperation(_))
    ));
}
