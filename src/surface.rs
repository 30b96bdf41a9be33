//! Offscreen RGBA surface and the compositing primitives the templates draw
//! with: solid and gradient fills, rounded rectangles, rotated stamping,
//! cover-fit photo blits, and sparse luminance sampling.
//!
//! Every render call owns its own `Surface`; nothing here touches shared
//! state, so calls can run in parallel freely.

use image::RgbaImage;

use crate::geometry::{Rect, Transform, cover_rect};

/// An RGBA color with an f32 alpha, matching how the layouts specify
/// translucent overlays ("rgba(0,0,0,0.25)" and friends).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    /// Same color with a different alpha.
    pub fn with_alpha(self, a: f32) -> Color {
        Color { a, ..self }
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// A fixed-size raster surface backed by an `RgbaImage`.
pub struct Surface {
    img: RgbaImage,
}

impl Surface {
    /// New fully transparent surface. Templates fill their background first;
    /// transparency matters for intermediate surfaces that get stamped.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            img: RgbaImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.img.width()
    }

    pub fn height(&self) -> u32 {
        self.img.height()
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width() as f32, self.height() as f32)
    }

    pub fn image(&self) -> &RgbaImage {
        &self.img
    }

    pub fn into_image(self) -> RgbaImage {
        self.img
    }

    /// Source-over blend of `color` at `(x, y)`, with `coverage` as an extra
    /// alpha factor (anti-aliased text and soft shadows feed fractional
    /// coverage through here).
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Color, coverage: f32) {
        let a = (color.a * coverage).clamp(0.0, 1.0);
        if a <= 0.0 || x < 0 || y < 0 || x as u32 >= self.width() || y as u32 >= self.height() {
            return;
        }
        let dst = self.img.get_pixel_mut(x as u32, y as u32);
        let inv = 1.0 - a;
        dst.0[0] = (color.r as f32 * a + dst.0[0] as f32 * inv).round() as u8;
        dst.0[1] = (color.g as f32 * a + dst.0[1] as f32 * inv).round() as u8;
        dst.0[2] = (color.b as f32 * a + dst.0[2] as f32 * inv).round() as u8;
        dst.0[3] = (255.0 * a + dst.0[3] as f32 * inv).round() as u8;
    }

    /// Fill an axis-aligned rectangle.
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let (x0, y0, x1, y1) = self.clamped_span(rect);
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend_pixel(x, y, color, 1.0);
            }
        }
    }

    /// Fill a rectangle with rounded corners. Radius is clamped to half the
    /// shorter side.
    pub fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color) {
        let r = radius.min(rect.w / 2.0).min(rect.h / 2.0).max(0.0);
        let (x0, y0, x1, y1) = self.clamped_span(rect);
        for y in y0..y1 {
            for x in x0..x1 {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;
                // Distance from the nearest corner circle center, if the
                // pixel lies inside a corner square.
                let cx = if px < rect.x + r {
                    Some(rect.x + r)
                } else if px > rect.right() - r {
                    Some(rect.right() - r)
                } else {
                    None
                };
                let cy = if py < rect.y + r {
                    Some(rect.y + r)
                } else if py > rect.bottom() - r {
                    Some(rect.bottom() - r)
                } else {
                    None
                };
                if let (Some(cx), Some(cy)) = (cx, cy) {
                    let dx = px - cx;
                    let dy = py - cy;
                    if dx * dx + dy * dy > r * r {
                        continue;
                    }
                }
                self.blend_pixel(x, y, color, 1.0);
            }
        }
    }

    /// Vertical linear gradient across `rect` between positioned color stops
    /// (`t` in [0, 1] top to bottom). Stops must be sorted by `t`.
    pub fn fill_vertical_gradient(&mut self, rect: Rect, stops: &[(f32, Color)]) {
        if stops.is_empty() {
            return;
        }
        let (x0, y0, x1, y1) = self.clamped_span(rect);
        for y in y0..y1 {
            let t = if rect.h > 0.0 {
                ((y as f32 + 0.5 - rect.y) / rect.h).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let color = sample_stops(stops, t);
            for x in x0..x1 {
                self.blend_pixel(x, y, color, 1.0);
            }
        }
    }

    /// Cover-fit blit: draw `src` so it covers `dest` under `transform`,
    /// clipped to `clip`. Bilinear sampling; the photo always fills the
    /// visible part of `dest` (see [`crate::geometry::cover_rect`]).
    pub fn draw_cover(&mut self, src: &RgbaImage, dest: Rect, transform: &Transform, clip: Rect) {
        if src.width() == 0 || src.height() == 0 {
            return;
        }
        let draw = cover_rect(src.width(), src.height(), dest, transform);
        if draw.w <= 0.0 || draw.h <= 0.0 {
            return;
        }
        let region = dest.intersect(&clip).intersect(&self.bounds());
        let (x0, y0, x1, y1) = self.clamped_span(region);
        let sw = src.width() as f32;
        let sh = src.height() as f32;
        for y in y0..y1 {
            let v = ((y as f32 + 0.5 - draw.y) / draw.h) * sh - 0.5;
            for x in x0..x1 {
                let u = ((x as f32 + 0.5 - draw.x) / draw.w) * sw - 0.5;
                let [r, g, b, a] = bilinear_sample(src, u, v);
                self.blend_pixel(
                    x,
                    y,
                    Color::rgba(r.round() as u8, g.round() as u8, b.round() as u8, 1.0),
                    a / 255.0,
                );
            }
        }
    }

    /// Stamp another surface onto this one, rotated by `angle` radians
    /// (screen-space, positive = clockwise) around its center, which lands on
    /// `(cx, cy)`.
    pub fn stamp_rotated(&mut self, overlay: &Surface, cx: f32, cy: f32, angle: f32) {
        let ow = overlay.width() as f32;
        let oh = overlay.height() as f32;
        if ow == 0.0 || oh == 0.0 {
            return;
        }
        let radius = (ow * ow + oh * oh).sqrt() / 2.0;
        let bbox = Rect::new(cx - radius, cy - radius, radius * 2.0, radius * 2.0)
            .intersect(&self.bounds());
        let (x0, y0, x1, y1) = self.clamped_span(bbox);
        let (sin, cos) = angle.sin_cos();
        for y in y0..y1 {
            for x in x0..x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                // Inverse rotation back into overlay space.
                let u = cos * dx + sin * dy + ow / 2.0 - 0.5;
                let v = -sin * dx + cos * dy + oh / 2.0 - 0.5;
                if u < -1.0 || v < -1.0 || u > ow || v > oh {
                    continue;
                }
                let [r, g, b, a] = bilinear_sample(overlay.image(), u, v);
                self.blend_pixel(
                    x,
                    y,
                    Color::rgba(r.round() as u8, g.round() as u8, b.round() as u8, 1.0),
                    a / 255.0,
                );
            }
        }
    }

    /// Sparse average relative luminance of a region, in [0, 1].
    ///
    /// Samples every 10th pixel with rec. 709 weights. An empty or fully
    /// out-of-bounds region yields a neutral 0.5 so auto-contrast decisions
    /// never fail a render.
    pub fn average_luminance(&self, rect: Rect) -> f32 {
        let (x0, y0, x1, y1) = self.clamped_span(rect);
        let mut sum = 0.0f64;
        let mut count = 0u32;
        let mut y = y0;
        while y < y1 {
            let mut x = x0;
            while x < x1 {
                let p = self.img.get_pixel(x as u32, y as u32);
                let lum =
                    0.2126 * p.0[0] as f32 + 0.7152 * p.0[1] as f32 + 0.0722 * p.0[2] as f32;
                sum += (lum / 255.0) as f64;
                count += 1;
                x += 10;
            }
            y += 10;
        }
        if count == 0 {
            0.5
        } else {
            (sum / count as f64) as f32
        }
    }

    /// Integer pixel span of `rect` clamped to the surface.
    fn clamped_span(&self, rect: Rect) -> (i32, i32, i32, i32) {
        let x0 = rect.x.round().max(0.0) as i32;
        let y0 = rect.y.round().max(0.0) as i32;
        let x1 = rect.right().round().min(self.width() as f32) as i32;
        let y1 = rect.bottom().round().min(self.height() as f32) as i32;
        (x0, y0, x1.max(x0), y1.max(y0))
    }
}

/// Bilinear sample of an RGBA image at fractional coordinates, clamped to
/// the edges. Returns channels in [0, 255].
fn bilinear_sample(img: &RgbaImage, u: f32, v: f32) -> [f32; 4] {
    let max_x = (img.width() - 1) as f32;
    let max_y = (img.height() - 1) as f32;
    let u = u.clamp(0.0, max_x);
    let v = v.clamp(0.0, max_y);
    let x0 = u.floor() as u32;
    let y0 = v.floor() as u32;
    let x1 = (x0 + 1).min(img.width() - 1);
    let y1 = (y0 + 1).min(img.height() - 1);
    let fx = u - x0 as f32;
    let fy = v - y0 as f32;

    let p00 = img.get_pixel(x0, y0);
    let p10 = img.get_pixel(x1, y0);
    let p01 = img.get_pixel(x0, y1);
    let p11 = img.get_pixel(x1, y1);

    let mut out = [0.0f32; 4];
    for (c, slot) in out.iter_mut().enumerate() {
        let top = lerp(p00.0[c] as f32, p10.0[c] as f32, fx);
        let bottom = lerp(p01.0[c] as f32, p11.0[c] as f32, fx);
        *slot = lerp(top, bottom, fy);
    }
    out
}

fn sample_stops(stops: &[(f32, Color)], t: f32) -> Color {
    let first = stops[0];
    if t <= first.0 {
        return first.1;
    }
    for pair in stops.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t <= t1 {
            let f = if t1 > t0 { (t - t0) / (t1 - t0) } else { 0.0 };
            return Color {
                r: lerp(c0.r as f32, c1.r as f32, f).round() as u8,
                g: lerp(c0.g as f32, c1.g as f32, f).round() as u8,
                b: lerp(c0.b as f32, c1.b as f32, f).round() as u8,
                a: lerp(c0.a, c1.a, f),
            };
        }
    }
    stops[stops.len() - 1].1
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn pixel(img: &RgbaImage, x: u32, y: u32) -> Rgba<u8> {
        *img.get_pixel(x, y)
    }

    fn checker(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_fn(w, h, |x, y| {
            if (x / 8 + y / 8) % 2 == 0 {
                Rgba([220, 40, 40, 255])
            } else {
                Rgba([40, 40, 220, 255])
            }
        })
    }

    #[test]
    fn fill_rect_sets_opaque_pixels() {
        let mut s = Surface::new(20, 20);
        s.fill_rect(Rect::new(5.0, 5.0, 10.0, 10.0), Color::rgb(255, 0, 140));
        assert_eq!(pixel(s.image(), 10, 10), Rgba([255, 0, 140, 255]));
        assert_eq!(pixel(s.image(), 0, 0), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn translucent_fill_blends_over_base() {
        let mut s = Surface::new(4, 4);
        s.fill_rect(s.bounds(), Color::WHITE);
        s.fill_rect(s.bounds(), Color::rgba(0, 0, 0, 0.5));
        let p = pixel(s.image(), 1, 1);
        assert!(p.0[0] > 120 && p.0[0] < 136, "got {:?}", p);
    }

    #[test]
    fn rounded_rect_leaves_corners_empty() {
        let mut s = Surface::new(40, 40);
        s.fill_rounded_rect(Rect::new(0.0, 0.0, 40.0, 40.0), 12.0, Color::WHITE);
        assert_eq!(pixel(s.image(), 0, 0).0[3], 0); // corner clipped
        assert_eq!(pixel(s.image(), 20, 20).0[3], 255); // center solid
        assert_eq!(pixel(s.image(), 20, 0).0[3], 255); // edge midpoint solid
    }

    #[test]
    fn gradient_interpolates_between_stops() {
        let mut s = Surface::new(2, 100);
        s.fill_vertical_gradient(
            s.bounds(),
            &[(0.0, Color::BLACK), (1.0, Color::WHITE)],
        );
        let top = pixel(s.image(), 0, 0).0[0];
        let mid = pixel(s.image(), 0, 50).0[0];
        let bottom = pixel(s.image(), 0, 99).0[0];
        assert!(top < 10);
        assert!((120..=136).contains(&mid), "mid {mid}");
        assert!(bottom > 245);
    }

    #[test]
    fn cover_blit_fills_entire_dest() {
        let mut s = Surface::new(100, 100);
        let photo = checker(64, 48);
        let dest = Rect::new(10.0, 20.0, 80.0, 50.0);
        s.draw_cover(&photo, dest, &Transform::default(), s.bounds());
        for y in 20..70 {
            for x in 10..90 {
                assert_eq!(pixel(s.image(), x, y).0[3], 255, "hole at {x},{y}");
            }
        }
        // Outside dest stays untouched.
        assert_eq!(pixel(s.image(), 5, 5).0[3], 0);
    }

    #[test]
    fn cover_blit_respects_clip() {
        let mut s = Surface::new(100, 100);
        let photo = checker(64, 64);
        let dest = Rect::new(0.0, 0.0, 100.0, 100.0);
        let clip = Rect::new(0.0, 40.0, 100.0, 20.0);
        s.draw_cover(&photo, dest, &Transform::default(), clip);
        assert_eq!(pixel(s.image(), 50, 10).0[3], 0);
        assert_eq!(pixel(s.image(), 50, 50).0[3], 255);
        assert_eq!(pixel(s.image(), 50, 70).0[3], 0);
    }

    #[test]
    fn stamp_rotated_lands_center_on_target() {
        let mut s = Surface::new(60, 60);
        let mut band = Surface::new(20, 6);
        band.fill_rect(band.bounds(), Color::rgb(255, 0, 0));
        s.stamp_rotated(&band, 30.0, 30.0, -std::f32::consts::PI / 9.0);
        let p = pixel(s.image(), 30, 30);
        assert!(p.0[0] > 200, "center not stamped: {p:?}");
    }

    #[test]
    fn luminance_of_flat_fills() {
        let mut s = Surface::new(50, 50);
        s.fill_rect(s.bounds(), Color::WHITE);
        assert!(s.average_luminance(s.bounds()) > 0.95);
        s.fill_rect(s.bounds(), Color::BLACK);
        assert!(s.average_luminance(s.bounds()) < 0.05);
    }

    #[test]
    fn luminance_neutral_on_degenerate_region() {
        let s = Surface::new(10, 10);
        assert_eq!(s.average_luminance(Rect::new(500.0, 500.0, 10.0, 10.0)), 0.5);
        assert_eq!(s.average_luminance(Rect::new(0.0, 0.0, 0.0, 0.0)), 0.5);
    }
}
