//! Trait definitions for export format implementations.

use std::path::{Path, PathBuf};

use crate::assets::DashboardFilter;
use crate::format::bundle::ExportBundle;
use crate::format::error::FormatError;

/// Trait for export (and optionally import) format implementations.
///
/// Formats produce bytes first; writing to disk is shared so that callers
/// without a filesystem can still export.
pub trait ExportFormat: Send + Sync {
    /// Unique identifier for this format (e.g., "json", "signs-csv").
    fn id(&self) -> &'static str;

    /// Human-readable name for display.
    fn display_name(&self) -> &'static str;

    /// File extension without the dot.
    fn extension(&self) -> &'static str;

    /// Whether bundles can be read back from this format.
    fn supports_import(&self) -> bool {
        false
    }

    /// Export a bundle to bytes.
    fn export_to_bytes(
        &self,
        bundle: &ExportBundle,
        options: &ExportOptions,
    ) -> Result<ExportResult, FormatError>;

    /// Export a bundle to a file at `path`.
    fn export(
        &self,
        bundle: &ExportBundle,
        path: &Path,
        options: &ExportOptions,
    ) -> Result<ExportResult, FormatError> {
        log::info!("Exporting {} to {:?}", self.id(), path);

        let mut result = self.export_to_bytes(bundle, options)?;
        std::fs::write(path, &result.bytes)?;
        result.files_created = vec![path.to_path_buf()];

        log::info!(
            "Wrote {} bytes ({} annotations, {} rows)",
            result.bytes.len(),
            result.annotations_exported,
            result.rows_exported
        );
        Ok(result)
    }

    /// Read a bundle from bytes.
    fn import_from_bytes(&self, _bytes: &[u8]) -> Result<ExportBundle, FormatError> {
        Err(FormatError::UnsupportedOperation(format!(
            "{} does not support import",
            self.display_name()
        )))
    }

    /// Read a bundle from a file.
    fn import(&self, path: &Path) -> Result<ExportBundle, FormatError> {
        if !self.supports_import() {
            return self.import_from_bytes(&[]);
        }
        log::info!("Importing {} from {:?}", self.id(), path);
        let bytes = std::fs::read(path)?;
        self.import_from_bytes(&bytes)
    }
}

/// Options for export operations.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Restrict the export to one layout (id or name).
    pub layout_id: Option<String>,

    /// Row filter applied to dashboard tables.
    pub filter: DashboardFilter,

    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            layout_id: None,
            filter: DashboardFilter::default(),
            pretty: true,
        }
    }
}

impl ExportOptions {
    /// Create new export options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only export one layout.
    pub fn layout(mut self, layout_id: impl Into<String>) -> Self {
        self.layout_id = Some(layout_id.into());
        self
    }

    /// Filter dashboard rows.
    pub fn filter(mut self, filter: DashboardFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Set pretty printing.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

/// Result of an export operation.
#[derive(Debug, Default)]
pub struct ExportResult {
    /// Encoded output.
    pub bytes: Vec<u8>,

    /// Number of annotations covered by the export.
    pub annotations_exported: usize,

    /// Number of table rows written (CSV formats).
    pub rows_exported: usize,

    /// Warnings generated during export.
    pub warnings: Vec<FormatWarning>,

    /// Files created during export.
    pub files_created: Vec<PathBuf>,
}

impl ExportResult {
    /// Create a result around encoded bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            ..Self::default()
        }
    }

    /// Add a warning to the result.
    pub fn add_warning(&mut self, warning: FormatWarning) {
        self.warnings.push(warning);
    }

    /// Check if there were any warnings.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if there were any errors (severe warnings).
    pub fn has_errors(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w.severity, WarningSeverity::Error))
    }
}

/// Warning generated during export.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatWarning {
    /// Layout this warning relates to (if applicable).
    pub layout: Option<String>,

    /// Human-readable warning message.
    pub message: String,

    /// Severity level of the warning.
    pub severity: WarningSeverity,
}

impl FormatWarning {
    /// Create a new warning.
    pub fn new(message: impl Into<String>, severity: WarningSeverity) -> Self {
        Self {
            layout: None,
            message: message.into(),
            severity,
        }
    }

    /// Create an info-level warning.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, WarningSeverity::Info)
    }

    /// Create a warning-level warning.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, WarningSeverity::Warning)
    }

    /// Create an error-level warning.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, WarningSeverity::Error)
    }

    /// Set the layout this warning relates to.
    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = Some(layout.into());
        self
    }
}

/// Severity level for format warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSeverity {
    /// Informational message, not a problem.
    Info,
    /// Something was skipped or looks incomplete.
    Warning,
    /// Something that may affect data integrity.
    Error,
}
