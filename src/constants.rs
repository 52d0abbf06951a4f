//! Global constants for the signage planner

/// Lower bound of a percentage coordinate
pub const PERCENT_MIN: f32 = 0.0;

/// Upper bound of a percentage coordinate
pub const PERCENT_MAX: f32 = 100.0;

/// Smallest zoom level the viewport allows
pub const ZOOM_MIN: f32 = 0.1;

/// Largest zoom level the viewport allows
pub const ZOOM_MAX: f32 = 10.0;

/// Zoom factor per scroll notch or zoom button press
pub const ZOOM_STEP: f32 = 1.2;

/// Hit radius for marker selection (in screen pixels)
pub const HIT_RADIUS_PX: f32 = 12.0;

/// Holder name used on the dashboard for markers without a holder type
pub const UNASSIGNED_HOLDER: &str = "Unassigned";

/// Fallback colour for signage types without one
pub const DEFAULT_SIGNAGE_COLOR: &str = "#3b82f6";
