//! signplan - venue floor-plan signage planner
//!
//! Places signage markers and barrier/flow lines on venue floor plans in
//! percentage-of-image coordinates, keeps each layout's annotations in sync
//! with a storage backend, aggregates the placed signs into an assets
//! dashboard and exports everything as JSON, CSV or ZIP.

pub mod assets;
pub mod color_utils;
pub mod config;
pub mod constants;
pub mod format;
pub mod model;
pub mod state;
pub mod timestamp;
pub mod viewport;

pub use assets::{AssetStats, Dashboard, DashboardFilter, DashboardTab};
pub use config::AppConfig;
pub use format::{ExportBundle, ExportFormat, ExportOptions, FormatRegistry};
pub use model::{Annotation, Catalog, Event, VenueLayout};
pub use state::AnnotationStore;
pub use viewport::Viewport;
