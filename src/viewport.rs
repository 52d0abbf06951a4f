//! Pan/zoom mathematics for the floor-plan canvas.
//!
//! The floor plan is rendered `object-contain` inside its container, and the
//! container content is transformed by `translate(pan) scale(zoom)` with the
//! transform origin at the container's top-left corner:
//!
//! ```text
//! screen = pan + local * zoom
//! ```
//!
//! Annotation coordinates are percentages of the rendered image, so mapping a
//! click to an annotation point means inverting the transform, removing the
//! letterbox offset and dividing by the rendered image size.

use crate::constants::{HIT_RADIUS_PX, PERCENT_MAX, ZOOM_MAX, ZOOM_MIN, ZOOM_STEP};
use crate::model::{Annotation, PercentPoint};

/// Rectangle the image occupies inside the (untransformed) container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageBounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ImageBounds {
    /// Compute the `object-contain` placement of an image inside a container.
    ///
    /// The image is scaled to fit entirely and centered on the other axis.
    /// Returns None when either size has no area.
    pub fn contain(natural: (f32, f32), container: (f32, f32)) -> Option<Self> {
        let (nat_w, nat_h) = natural;
        let (cont_w, cont_h) = container;
        if nat_w <= 0.0 || nat_h <= 0.0 || cont_w <= 0.0 || cont_h <= 0.0 {
            return None;
        }

        let image_aspect = nat_w / nat_h;
        let container_aspect = cont_w / cont_h;

        let bounds = if image_aspect > container_aspect {
            // Image is wider than the container - fit to width, letterbox top/bottom
            let height = cont_w / image_aspect;
            Self {
                x: 0.0,
                y: (cont_h - height) / 2.0,
                width: cont_w,
                height,
            }
        } else {
            // Image is taller than the container - fit to height, pillarbox left/right
            let width = cont_h * image_aspect;
            Self {
                x: (cont_w - width) / 2.0,
                y: 0.0,
                width,
                height: cont_h,
            }
        };
        Some(bounds)
    }
}

/// Represents pan/zoom transform state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub zoom: f32,
    pub pan_x: f32,
    pub pan_y: f32,
}

impl Transform {
    /// Create a new transform with the given zoom and pan.
    pub fn new(zoom: f32, pan_x: f32, pan_y: f32) -> Self {
        Self { zoom, pan_x, pan_y }
    }

    /// Create an identity transform (zoom=1, no pan).
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    /// Map a screen position (relative to the container) to local content space.
    pub fn screen_to_local(&self, x: f32, y: f32) -> (f32, f32) {
        ((x - self.pan_x) / self.zoom, (y - self.pan_y) / self.zoom)
    }

    /// Map a local content position to screen space.
    pub fn local_to_screen(&self, x: f32, y: f32) -> (f32, f32) {
        (self.pan_x + x * self.zoom, self.pan_y + y * self.zoom)
    }

    /// Calculate zoom-to-cursor transformation.
    ///
    /// The content point under the cursor stays under the cursor:
    /// 1. Find the local point under the cursor
    /// 2. After zooming, adjust pan so that same point maps back to the cursor
    pub fn zoom_to_cursor(&self, new_zoom: f32, cursor_x: f32, cursor_y: f32) -> Transform {
        let (local_x, local_y) = self.screen_to_local(cursor_x, cursor_y);

        Transform {
            zoom: new_zoom,
            pan_x: cursor_x - local_x * new_zoom,
            pan_y: cursor_y - local_y * new_zoom,
        }
    }

    /// Apply a pan delta to the transform.
    pub fn pan_by(&self, dx: f32, dy: f32) -> Transform {
        Transform {
            zoom: self.zoom,
            pan_x: self.pan_x + dx,
            pan_y: self.pan_y + dy,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Zoom limits and step for a viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLimits {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min: ZOOM_MIN,
            max: ZOOM_MAX,
            step: ZOOM_STEP,
        }
    }
}

/// Canvas state: container size, floor-plan natural size and pan/zoom.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// Container (width, height) in screen pixels
    pub container: (f32, f32),
    /// Natural image (width, height) in pixels
    pub natural: (f32, f32),
    /// Current pan/zoom
    pub transform: Transform,
    /// Zoom clamping
    pub limits: ZoomLimits,
}

impl Viewport {
    /// Create a viewport showing the whole image.
    pub fn new(container: (f32, f32), natural: (f32, f32)) -> Self {
        Self {
            container,
            natural,
            transform: Transform::identity(),
            limits: ZoomLimits::default(),
        }
    }

    /// Use custom zoom limits.
    pub fn with_limits(mut self, limits: ZoomLimits) -> Self {
        self.limits = limits;
        self.transform.zoom = self.clamp_zoom(self.transform.zoom);
        self
    }

    /// Use a specific transform, with its zoom clamped to the limits.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = Transform {
            zoom: self.clamp_zoom(transform.zoom),
            ..transform
        };
        self
    }

    /// Clamp a zoom level to the limits. NaN falls back to fit-to-container.
    fn clamp_zoom(&self, zoom: f32) -> f32 {
        let zoom = if zoom.is_nan() { 1.0 } else { zoom };
        zoom.clamp(self.limits.min, self.limits.max)
    }

    /// Rendered image rectangle inside the container.
    pub fn image_bounds(&self) -> Option<ImageBounds> {
        ImageBounds::contain(self.natural, self.container)
    }

    /// Convert a screen point to image percentages without clamping.
    ///
    /// Values outside 0..100 mean the point lies outside the image.
    pub fn screen_to_percent_unclamped(&self, x: f32, y: f32) -> Option<PercentPoint> {
        let bounds = self.image_bounds()?;
        let (local_x, local_y) = self.transform.screen_to_local(x, y);
        Some(PercentPoint::new(
            (local_x - bounds.x) / bounds.width * PERCENT_MAX,
            (local_y - bounds.y) / bounds.height * PERCENT_MAX,
        ))
    }

    /// Convert a screen point to image percentages clamped to 0..100.
    pub fn screen_to_percent(&self, x: f32, y: f32) -> Option<PercentPoint> {
        self.screen_to_percent_unclamped(x, y)
            .map(PercentPoint::clamped)
    }

    /// Check whether a screen point falls on the image.
    pub fn contains_screen_point(&self, x: f32, y: f32) -> bool {
        self.screen_to_percent_unclamped(x, y)
            .is_some_and(|p| p.in_range())
    }

    /// Convert image percentages to a screen point (for overlays and crosshairs).
    pub fn percent_to_screen(&self, point: PercentPoint) -> Option<(f32, f32)> {
        let bounds = self.image_bounds()?;
        let local_x = bounds.x + point.x / PERCENT_MAX * bounds.width;
        let local_y = bounds.y + point.y / PERCENT_MAX * bounds.height;
        Some(self.transform.local_to_screen(local_x, local_y))
    }

    /// Multiply the zoom by `factor`, keeping the point under the cursor fixed.
    pub fn zoom_at(&mut self, cursor_x: f32, cursor_y: f32, factor: f32) {
        let new_zoom = self.clamp_zoom(self.transform.zoom * factor);
        self.transform = self.transform.zoom_to_cursor(new_zoom, cursor_x, cursor_y);
    }

    /// Zoom in one step around the container center.
    pub fn zoom_in(&mut self) {
        let (cx, cy) = self.center();
        self.zoom_at(cx, cy, self.limits.step);
    }

    /// Zoom out one step around the container center.
    pub fn zoom_out(&mut self) {
        let (cx, cy) = self.center();
        self.zoom_at(cx, cy, 1.0 / self.limits.step);
    }

    /// Pan by a screen-space delta.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.transform = self.transform.pan_by(dx, dy);
    }

    /// Back to fit-to-container.
    pub fn reset(&mut self) {
        self.transform = Transform::identity();
    }

    /// Update the container size after a resize.
    pub fn set_container(&mut self, width: f32, height: f32) {
        self.container = (width, height);
    }

    fn center(&self) -> (f32, f32) {
        (self.container.0 / 2.0, self.container.1 / 2.0)
    }

    /// Find the topmost annotation under a screen point.
    ///
    /// Markers hit within `radius` screen pixels of their point, polylines
    /// within `radius` of any segment. Later annotations are drawn on top, so
    /// they win. Returns the index into `annotations`.
    pub fn hit_test(
        &self,
        annotations: &[Annotation],
        x: f32,
        y: f32,
        radius: f32,
    ) -> Option<usize> {
        annotations
            .iter()
            .enumerate()
            .rev()
            .find(|(_, annotation)| {
                self.screen_distance(annotation, x, y)
                    .is_some_and(|d| d <= radius)
            })
            .map(|(idx, _)| idx)
    }

    /// [`Viewport::hit_test`] with the default hit radius.
    pub fn hit_test_default(&self, annotations: &[Annotation], x: f32, y: f32) -> Option<usize> {
        self.hit_test(annotations, x, y, HIT_RADIUS_PX)
    }

    fn screen_distance(&self, annotation: &Annotation, x: f32, y: f32) -> Option<f32> {
        let screen: Vec<(f32, f32)> = annotation
            .points
            .iter()
            .map(|p| self.percent_to_screen(*p))
            .collect::<Option<_>>()?;

        match screen.as_slice() {
            [] => None,
            [(px, py)] => Some(((x - px).powi(2) + (y - py).powi(2)).sqrt()),
            segments => segments
                .windows(2)
                .map(|w| distance_to_segment((x, y), w[0], w[1]))
                .reduce(f32::min),
        }
    }
}

/// Distance from `p` to the segment `a`-`b`.
fn distance_to_segment(p: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq > 0.0 {
        (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
    ((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt()
}
