//! Export and import of events.
//!
//! A trait-based system: every format implements [`ExportFormat`] and is
//! discovered through the [`FormatRegistry`].
//!
//! ## Supported Formats
//!
//! - **JSON bundle**: the event with its layouts, annotations and catalog
//!   (import supported)
//! - **Signs / Stands / Designs CSV**: the assets dashboard tables
//! - **ZIP**: the bundle plus all three tables
//!
//! ## Usage
//!
//! ```rust,ignore
//! use signplan::format::{ExportBundle, ExportOptions, FormatRegistry};
//!
//! let registry = FormatRegistry::new();
//! let format = registry.get("signs-csv").unwrap();
//! let bundle = ExportBundle::new(event, catalog);
//! let result = format.export(&bundle, path, &ExportOptions::default())?;
//! ```

mod bundle;
mod error;
pub mod formats;
mod registry;
mod traits;

pub use bundle::{BundleMetadata, ExportBundle};
pub use error::FormatError;
pub use registry::FormatRegistry;
pub use traits::{ExportFormat, ExportOptions, ExportResult, FormatWarning, WarningSeverity};
