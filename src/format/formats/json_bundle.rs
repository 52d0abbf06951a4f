//! JSON bundle format.
//!
//! The native format: the only one that carries the full event, so it is the
//! only one that can be imported again.

use crate::format::bundle::ExportBundle;
use crate::format::error::FormatError;
use crate::format::traits::{ExportFormat, ExportOptions, ExportResult, FormatWarning};

/// Event, layouts, annotations and catalog as one JSON document.
pub struct JsonBundleFormat;

impl JsonBundleFormat {
    /// Non-fatal problems worth reporting next to an export.
    fn collect_warnings(bundle: &ExportBundle, result: &mut ExportResult) {
        for layout in &bundle.event.layouts {
            if layout.floor_plan.is_none() {
                result.add_warning(
                    FormatWarning::info("layout has no floor plan").with_layout(&layout.name),
                );
            }
            for annotation in &layout.annotations {
                if let Err(e) = annotation.validate() {
                    result.add_warning(
                        FormatWarning::warning(format!("annotation {}: {}", annotation.id, e))
                            .with_layout(&layout.name),
                    );
                }
            }
        }
    }
}

impl ExportFormat for JsonBundleFormat {
    fn id(&self) -> &'static str {
        "json"
    }

    fn display_name(&self) -> &'static str {
        "Event bundle (JSON)"
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn supports_import(&self) -> bool {
        true
    }

    fn export_to_bytes(
        &self,
        bundle: &ExportBundle,
        options: &ExportOptions,
    ) -> Result<ExportResult, FormatError> {
        let bundle = bundle.restricted(options.layout_id.as_deref())?;

        let json = if options.pretty {
            serde_json::to_vec_pretty(&bundle)?
        } else {
            serde_json::to_vec(&bundle)?
        };

        let mut result = ExportResult::new(json);
        result.annotations_exported = bundle.total_annotations();
        Self::collect_warnings(&bundle, &mut result);

        log::debug!(
            "Encoded {} layouts with {} annotations as JSON",
            bundle.event.layouts.len(),
            result.annotations_exported
        );
        Ok(result)
    }

    fn import_from_bytes(&self, bytes: &[u8]) -> Result<ExportBundle, FormatError> {
        let bundle: ExportBundle = serde_json::from_slice(bytes)?;
        bundle.check_version()?;

        log::info!(
            "Imported event '{}' with {} layouts and {} annotations (format version {})",
            bundle.event.name,
            bundle.event.layouts.len(),
            bundle.total_annotations(),
            bundle.version
        );
        Ok(bundle)
    }
}
