//! Cover-fit geometry: how a source photo is scaled and positioned inside a
//! destination rectangle under CSS `background-size: cover` semantics, with a
//! user-adjustable zoom and pan.
//!
//! The invariant the whole crate leans on: for any in-range zoom and *any*
//! pan input, the computed draw rectangle fully contains the destination
//! rectangle. Pan is clamped, never rejected; non-finite inputs normalize to
//! the identity transform so a bad drag event can't fail a render.

use serde::{Deserialize, Serialize};

/// Maximum zoom factor exposed to the user.
pub const MAX_ZOOM: f32 = 1.5;

/// An axis-aligned rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.h / 2.0
    }

    /// True if `other` lies entirely inside `self` (with a small tolerance
    /// for accumulated floating-point error).
    pub fn contains_rect(&self, other: &Rect) -> bool {
        const EPS: f32 = 1e-3;
        self.x <= other.x + EPS
            && self.y <= other.y + EPS
            && self.right() >= other.right() - EPS
            && self.bottom() >= other.bottom() - EPS
    }

    /// Intersection of two rectangles. Zero-sized when disjoint.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let r = self.right().min(other.right());
        let b = self.bottom().min(other.bottom());
        Rect::new(x, y, (r - x).max(0.0), (b - y).max(0.0))
    }
}

/// User-adjustable view of a photo inside its crop region.
///
/// `zoom` scales the cover-fit base size; `pan_x`/`pan_y` translate the
/// scaled image within the destination box, in destination-space pixels.
/// Values are session state owned by the orchestrator and are sanitized at
/// render time, so stale or garbage inputs degrade to the identity view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Transform {
    pub zoom: f32,
    pub pan_x: f32,
    pub pan_y: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

impl Transform {
    /// Zoom clamped to `[1, MAX_ZOOM]`; non-finite values fall back to 1.
    pub fn effective_zoom(&self) -> f32 {
        if self.zoom.is_finite() {
            self.zoom.clamp(1.0, MAX_ZOOM)
        } else {
            1.0
        }
    }

    /// Pure pan update: returns a new transform with the offset applied.
    /// Clamping happens at render time, so consecutive drags accumulate
    /// freely without losing the user's intent at the edges.
    pub fn panned(&self, dx: f32, dy: f32) -> Transform {
        let dx = if dx.is_finite() { dx } else { 0.0 };
        let dy = if dy.is_finite() { dy } else { 0.0 };
        Transform {
            zoom: self.zoom,
            pan_x: self.pan_x + dx,
            pan_y: self.pan_y + dy,
        }
    }

    /// Pure zoom update, clamped to the allowed range.
    pub fn zoomed(&self, zoom: f32) -> Transform {
        Transform {
            zoom: if zoom.is_finite() {
                zoom.clamp(1.0, MAX_ZOOM)
            } else {
                1.0
            },
            ..*self
        }
    }

    /// The transform actually used to draw into `dest`: zoom clamped to its
    /// range and pan clamped so the scaled image still covers the box.
    /// Idempotent — clamping an already-clamped transform is a no-op.
    pub fn clamped_for(&self, img_w: u32, img_h: u32, dest: Rect) -> Transform {
        let zoom = self.effective_zoom();
        let (draw_w, draw_h) = base_cover_size(img_w, img_h, dest);
        let draw_w = draw_w * zoom;
        let draw_h = draw_h * zoom;

        let max_pan_x = ((draw_w - dest.w) / 2.0).max(0.0);
        let max_pan_y = ((draw_h - dest.h) / 2.0).max(0.0);

        let pan_x = if self.pan_x.is_finite() { self.pan_x } else { 0.0 };
        let pan_y = if self.pan_y.is_finite() { self.pan_y } else { 0.0 };

        Transform {
            zoom,
            pan_x: pan_x.clamp(-max_pan_x, max_pan_x),
            pan_y: pan_y.clamp(-max_pan_y, max_pan_y),
        }
    }
}

/// Base (zoom = 1) cover-fit size of a `img_w`×`img_h` source for `dest`:
/// the smallest scale that fully covers the box while preserving aspect.
fn base_cover_size(img_w: u32, img_h: u32, dest: Rect) -> (f32, f32) {
    if img_w == 0 || img_h == 0 || dest.w <= 0.0 || dest.h <= 0.0 {
        // Degenerate source or box: fall back to the box itself.
        return (dest.w.max(0.0), dest.h.max(0.0));
    }
    let img_ratio = img_w as f32 / img_h as f32;
    let box_ratio = dest.w / dest.h;
    if img_ratio > box_ratio {
        // Image is wider: fit height
        (dest.h * img_ratio, dest.h)
    } else {
        // Image is taller: fit width
        (dest.w, dest.w / img_ratio)
    }
}

/// Compute the rectangle the source image is drawn into so that it covers
/// `dest` under the given transform. The result always contains `dest`.
pub fn cover_rect(img_w: u32, img_h: u32, dest: Rect, transform: &Transform) -> Rect {
    let t = transform.clamped_for(img_w, img_h, dest);
    let (base_w, base_h) = base_cover_size(img_w, img_h, dest);
    let draw_w = base_w * t.zoom;
    let draw_h = base_h * t.zoom;

    // Center the scaled image on the box, then apply the (clamped) pan.
    let base_x = dest.x - (draw_w - dest.w) / 2.0;
    let base_y = dest.y - (draw_h - dest.h) / 2.0;

    Rect::new(base_x + t.pan_x, base_y + t.pan_y, draw_w, draw_h)
}
