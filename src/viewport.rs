//! Viewport pan/zoom transform control.
//!
//! Maps user gestures onto a clamped affine transform of the map
//! content: `screen = translate + content * scale`. The math is pure;
//! the controller stores only the current transform, the fixed content
//! bounds, and the viewport size. Easing and animation belong to the
//! presentation layer, which receives target transforms and interpolates
//! however it likes.

use crate::config::{MAX_SCALE, MIN_SCALE, ZOOM_STEP};
use crate::map::geometry::{BBox, Point};

/// A uniform-scale affine map transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Transform = Transform {
        scale: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
    };

    /// Maps a content-space point to screen space.
    pub fn content_to_screen(&self, p: Point) -> Point {
        Point::new(
            p.x * self.scale + self.translate_x,
            p.y * self.scale + self.translate_y,
        )
    }

    /// Maps a screen-space point back to content space.
    pub fn screen_to_content(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.translate_x) / self.scale,
            (p.y - self.translate_y) / self.scale,
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Transform::IDENTITY
    }
}

/// Direction of a wheel zoom step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

/// Computes and stores the clamped viewport transform.
#[derive(Debug, Clone)]
pub struct ViewportController {
    transform: Transform,
    content_bounds: Option<BBox>,
    view_width: f64,
    view_height: f64,
}

impl ViewportController {
    /// Creates a controller at the identity transform. `content_bounds`
    /// is the union box of all regions, fixed for the session.
    pub fn new(content_bounds: Option<BBox>, view_width: f64, view_height: f64) -> Self {
        ViewportController {
            transform: Transform::IDENTITY,
            content_bounds,
            view_width,
            view_height,
        }
    }

    /// The current transform.
    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// The content bounds the controller clamps against.
    pub fn content_bounds(&self) -> Option<BBox> {
        self.content_bounds
    }

    /// Updates the viewport size (e.g. on window resize) and re-clamps.
    pub fn set_view_size(&mut self, width: f64, height: f64) -> Transform {
        self.view_width = width;
        self.view_height = height;
        self.apply_clamp()
    }

    /// Zooms one step toward or away from a fixed screen point.
    ///
    /// The scale moves by the fixed step factor (its reciprocal for
    /// zooming out) and is clamped to the scale bounds; the translate is
    /// recomputed so the content point under the cursor stays visually
    /// stationary, then the whole transform is clamped.
    pub fn zoom_at(&mut self, screen: Point, direction: ZoomDirection) -> Transform {
        let factor = match direction {
            ZoomDirection::In => ZOOM_STEP,
            ZoomDirection::Out => 1.0 / ZOOM_STEP,
        };
        let old_scale = self.transform.scale;
        let new_scale = (old_scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        let ratio = new_scale / old_scale;

        self.transform.translate_x = screen.x - (screen.x - self.transform.translate_x) * ratio;
        self.transform.translate_y = screen.y - (screen.y - self.transform.translate_y) * ratio;
        self.transform.scale = new_scale;
        self.apply_clamp()
    }

    /// Pans by a screen-space delta.
    ///
    /// The delta is divided by the current scale so panning speed is
    /// visually consistent at any zoom level.
    pub fn pan_by(&mut self, dx: f64, dy: f64) -> Transform {
        self.transform.translate_x += dx / self.transform.scale;
        self.transform.translate_y += dy / self.transform.scale;
        self.apply_clamp()
    }

    /// Computes the target transform that centers `bounds` in the
    /// viewport at `target_scale` (clamped to the scale bounds), then
    /// clamps against the content bounds.
    pub fn focus_on(&mut self, bounds: BBox, target_scale: f64) -> Transform {
        let scale = target_scale.clamp(MIN_SCALE, MAX_SCALE);
        let center = bounds.center();
        self.transform = Transform {
            scale,
            translate_x: self.view_width / 2.0 - center.x * scale,
            translate_y: self.view_height / 2.0 - center.y * scale,
        };
        self.apply_clamp()
    }

    fn apply_clamp(&mut self) -> Transform {
        self.transform = clamp_transform(
            self.transform,
            self.content_bounds,
            self.view_width,
            self.view_height,
        );
        self.transform
    }
}

/// Clamps a transform so the content cannot be dragged out of view.
///
/// Per axis: when the scaled content covers the viewport, the translate
/// is bounded so the content keeps covering it (its near edge never
/// crosses the viewport origin, its far edge never crosses the far
/// edge); when the content is smaller than the viewport, the roles
/// invert and the content stays between flush-near and flush-far.
/// Unknown or degenerate content bounds disable clamping.
pub fn clamp_transform(
    mut transform: Transform,
    bounds: Option<BBox>,
    view_width: f64,
    view_height: f64,
) -> Transform {
    let bounds = match bounds {
        Some(b) if !b.is_degenerate() => b,
        _ => return transform,
    };
    transform.translate_x = clamp_axis(
        transform.translate_x,
        bounds.x,
        bounds.width,
        transform.scale,
        view_width,
    );
    transform.translate_y = clamp_axis(
        transform.translate_y,
        bounds.y,
        bounds.height,
        transform.scale,
        view_height,
    );
    transform
}

fn clamp_axis(translate: f64, origin: f64, size: f64, scale: f64, view: f64) -> f64 {
    // Translate value with the content's near edge on the viewport
    // origin, and with its far edge on the viewport's far edge.
    let near_flush = -origin * scale;
    let far_flush = view - (origin + size) * scale;

    let (lo, hi) = if size * scale >= view {
        (far_flush, near_flush)
    } else {
        (near_flush, far_flush)
    };
    translate.clamp(lo, hi)
}
