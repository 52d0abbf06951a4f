//! ZIP archive holding the JSON bundle and every dashboard table.

use std::io::{Cursor, Read, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::assets::{AssetStats, DashboardTab};
use crate::format::bundle::ExportBundle;
use crate::format::error::FormatError;
use crate::format::formats::csv_tables::write_table;
use crate::format::formats::json_bundle::JsonBundleFormat;
use crate::format::traits::{ExportFormat, ExportOptions, ExportResult};

/// Name of the bundle entry inside the archive.
pub const BUNDLE_ENTRY: &str = "bundle.json";

/// Archive entry name for a dashboard table.
pub fn table_entry(tab: DashboardTab) -> String {
    format!("{}.csv", tab.name().to_lowercase())
}

/// Everything in one download.
pub struct ZipArchiveFormat;

impl ExportFormat for ZipArchiveFormat {
    fn id(&self) -> &'static str {
        "zip"
    }

    fn display_name(&self) -> &'static str {
        "Bundle and tables (ZIP)"
    }

    fn extension(&self) -> &'static str {
        "zip"
    }

    fn supports_import(&self) -> bool {
        true
    }

    fn export_to_bytes(
        &self,
        bundle: &ExportBundle,
        options: &ExportOptions,
    ) -> Result<ExportResult, FormatError> {
        let json = JsonBundleFormat.export_to_bytes(bundle, options)?;
        let layouts = bundle.select_layouts(options.layout_id.as_deref())?;
        let stats = AssetStats::compute(layouts, &bundle.catalog);

        let file_options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        zip.start_file(BUNDLE_ENTRY, file_options)?;
        zip.write_all(&json.bytes)?;

        let mut rows = 0;
        let mut warnings = json.warnings;
        for tab in DashboardTab::all() {
            let table = write_table(*tab, &stats, &options.filter)?;
            zip.start_file(table_entry(*tab), file_options)?;
            zip.write_all(&table.bytes)?;
            rows += table.rows;
            warnings.extend(table.warnings);
        }

        let bytes = zip.finish()?.into_inner();
        log::debug!("Packed bundle and {} table rows into {} bytes", rows, bytes.len());

        let mut result = ExportResult::new(bytes);
        result.annotations_exported = json.annotations_exported;
        result.rows_exported = rows;
        result.warnings = warnings;
        Ok(result)
    }

    fn import_from_bytes(&self, bytes: &[u8]) -> Result<ExportBundle, FormatError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut entry = archive.by_name(BUNDLE_ENTRY).map_err(|e| match e {
            zip::result::ZipError::FileNotFound => FormatError::missing_field(BUNDLE_ENTRY),
            other => FormatError::Zip(other),
        })?;

        let mut json = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut json)?;
        JsonBundleFormat.import_from_bytes(&json)
    }
}
