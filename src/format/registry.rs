//! Format registry for discovering and accessing export formats.

use crate::format::formats::{CsvTableFormat, JsonBundleFormat, ZipArchiveFormat};
use crate::format::traits::ExportFormat;

/// Registry of available export formats, in registration order.
pub struct FormatRegistry {
    formats: Vec<Box<dyn ExportFormat>>,
}

impl FormatRegistry {
    /// Create a new registry with all built-in formats registered.
    pub fn new() -> Self {
        let mut registry = Self {
            formats: Vec::new(),
        };

        registry.register(Box::new(JsonBundleFormat));
        registry.register(Box::new(CsvTableFormat::signs()));
        registry.register(Box::new(CsvTableFormat::stands()));
        registry.register(Box::new(CsvTableFormat::designs()));
        registry.register(Box::new(ZipArchiveFormat));

        registry
    }

    /// Register a format, replacing any format with the same id.
    pub fn register(&mut self, format: Box<dyn ExportFormat>) {
        match self.formats.iter().position(|f| f.id() == format.id()) {
            Some(idx) => self.formats[idx] = format,
            None => self.formats.push(format),
        }
    }

    /// Get a format by its ID.
    pub fn get(&self, id: &str) -> Option<&dyn ExportFormat> {
        self.formats
            .iter()
            .find(|f| f.id() == id)
            .map(|f| f.as_ref())
    }

    /// Find formats by file extension.
    pub fn by_extension(&self, ext: &str) -> Vec<&dyn ExportFormat> {
        let ext = ext.trim_start_matches('.');
        self.formats
            .iter()
            .filter(|f| f.extension().eq_ignore_ascii_case(ext))
            .map(|f| f.as_ref())
            .collect()
    }

    /// Get all registered formats.
    pub fn all(&self) -> Vec<&dyn ExportFormat> {
        self.formats.iter().map(|f| f.as_ref()).collect()
    }

    /// Get all format IDs.
    pub fn ids(&self) -> Vec<&'static str> {
        self.formats.iter().map(|f| f.id()).collect()
    }

    /// Get the native JSON bundle format.
    pub fn native(&self) -> &dyn ExportFormat {
        self.get("json").unwrap_or(&JsonBundleFormat)
    }

    /// Get formats that can be imported.
    pub fn import_formats(&self) -> Vec<&dyn ExportFormat> {
        self.all()
            .into_iter()
            .filter(|f| f.supports_import())
            .collect()
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_formats() {
        let registry = FormatRegistry::new();

        assert_eq!(
            registry.ids(),
            vec!["json", "signs-csv", "stands-csv", "designs-csv", "zip"]
        );
        assert!(registry.get("stands-csv").is_some());
        assert!(registry.get("coco").is_none());
    }

    #[test]
    fn test_native_format() {
        let registry = FormatRegistry::new();
        let native = registry.native();

        assert_eq!(native.id(), "json");
        assert!(native.supports_import());
    }

    #[test]
    fn test_by_extension() {
        let registry = FormatRegistry::new();
        assert_eq!(registry.by_extension(".csv").len(), 3);
        assert_eq!(registry.by_extension("ZIP")[0].id(), "zip");
    }

    #[test]
    fn test_import_formats() {
        let registry = FormatRegistry::new();
        let ids: Vec<_> = registry.import_formats().iter().map(|f| f.id()).collect();
        assert_eq!(ids, vec!["json", "zip"]);
    }

    #[test]
    fn test_register_replaces_same_id() {
        let mut registry = FormatRegistry::new();
        registry.register(Box::new(JsonBundleFormat));
        assert_eq!(registry.all().len(), 5);
    }
}
