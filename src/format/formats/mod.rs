//! Export format implementations.

mod csv_tables;
mod json_bundle;
mod zip_archive;

#[cfg(test)]
mod tests;

pub use csv_tables::CsvTableFormat;
pub use json_bundle::JsonBundleFormat;
pub use zip_archive::{BUNDLE_ENTRY, ZipArchiveFormat, table_entry};
