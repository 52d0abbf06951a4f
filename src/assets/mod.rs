//! Assets dashboard: faces, grouped rows, status histograms and filters.
//!
//! Signage annotations are first exploded into physical faces (one per
//! side of the holder), then grouped into the three dashboard tabs.

mod face;
mod filter;
mod histogram;
mod rows;
mod stats;

pub use face::{FaceRecord, annotation_faces, layout_faces};
pub use filter::{DashboardFilter, DashboardRow, DashboardTab, TabFilters};
pub use histogram::{RowStatus, StatusHistogram};
pub use rows::{
    DesignRow, SignRow, StandRow, count_status, group_designs, group_signs, group_stands,
    total_statuses,
};
pub use stats::{AssetStats, Dashboard};
