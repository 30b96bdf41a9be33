//! Text measurement and rendering for the banner layouts.
//!
//! Renders through ab_glyph into f32 coverage buffers, then composites onto
//! the surface in up to three passes: drop shadow (box-blurred, y-offset),
//! stroke (coverage dilated by a disk, which gives rounded joins for free),
//! and fill. The typeface set is fixed and embedded; CSS-ish weight numbers
//! from the layouts map onto the two faces.

use std::sync::OnceLock;

use ab_glyph::{Font, FontArc, ScaleFont};

use crate::geometry::Rect;
use crate::surface::{Color, Surface};

static SANS_REGULAR: OnceLock<FontArc> = OnceLock::new();
static SANS_BOLD: OnceLock<FontArc> = OnceLock::new();

fn sans_regular() -> &'static FontArc {
    SANS_REGULAR.get_or_init(|| {
        FontArc::try_from_slice(include_bytes!("fonts/DejaVuSans.ttf"))
            .expect("Failed to load DejaVu Sans Regular")
    })
}

fn sans_bold() -> &'static FontArc {
    SANS_BOLD.get_or_init(|| {
        FontArc::try_from_slice(include_bytes!("fonts/DejaVuSans-Bold.ttf"))
            .expect("Failed to load DejaVu Sans Bold")
    })
}

/// Map a CSS-style weight number to an embedded face.
fn face_for_weight(weight: u16) -> &'static FontArc {
    if weight >= 600 { sans_bold() } else { sans_regular() }
}

/// Horizontal text anchor relative to the draw position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Vertical anchor: `Alphabetic` treats `y` as the baseline, `Middle`
/// vertically centers the em box on `y`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Baseline {
    #[default]
    Alphabetic,
    Middle,
}

/// Drop shadow parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub color: Color,
    pub blur: f32,
    pub offset_y: f32,
}

/// Full styling for one drawn line of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub px: f32,
    pub weight: u16,
    pub fill: Color,
    /// Outline color; width defaults to [`derived_stroke_width`] when unset.
    pub stroke: Option<Color>,
    pub stroke_width: Option<f32>,
    pub shadow: Option<Shadow>,
    pub align: TextAlign,
    pub baseline: Baseline,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            px: 44.0,
            weight: 700,
            fill: Color::WHITE,
            stroke: None,
            stroke_width: None,
            shadow: None,
            align: TextAlign::Center,
            baseline: Baseline::Alphabetic,
        }
    }
}

/// Stroke width used when a style asks for an outline without an explicit
/// width: proportional to the font size with a floor that keeps small text
/// legible.
pub fn derived_stroke_width(px: f32) -> f32 {
    (px * 0.12).round().max(6.0)
}

/// Advance width of `text` at `px` pixels in the given weight.
pub fn measure_width(text: &str, px: f32, weight: u16) -> f32 {
    let font = face_for_weight(weight);
    let scaled = font.as_scaled(px);
    text.chars()
        .map(|ch| scaled.h_advance(font.glyph_id(ch)))
        .sum()
}

/// Largest font size in `[min_px, start_px]` (stepping down by 2) at which
/// `text` measures at most `max_width` pixels wide. Returns `min_px` when
/// even that size is too wide.
pub fn fit_text(text: &str, max_width: f32, start_px: f32, min_px: f32, weight: u16) -> f32 {
    let mut size = start_px;
    while size > min_px {
        if measure_width(text, size, weight) <= max_width {
            break;
        }
        size -= 2.0;
    }
    size.max(min_px)
}

/// Draw a styled line of text anchored at `(x, y)`.
pub fn draw_text(surface: &mut Surface, text: &str, x: f32, y: f32, style: &TextStyle) {
    draw_text_clipped(surface, text, x, y, style, None);
}

/// Like [`draw_text`], restricted to `clip` (used by the story data band so
/// oversized lines can't bleed into the photo panels).
pub fn draw_text_clipped(
    surface: &mut Surface,
    text: &str,
    x: f32,
    y: f32,
    style: &TextStyle,
    clip: Option<Rect>,
) {
    if text.is_empty() {
        return;
    }
    let font = face_for_weight(style.weight);
    let scaled = font.as_scaled(style.px);
    let ascent = scaled.ascent();
    let descent = scaled.descent();

    let stroke_width = style
        .stroke
        .map(|_| style.stroke_width.unwrap_or_else(|| derived_stroke_width(style.px)));
    let blur = style.shadow.map(|s| s.blur).unwrap_or(0.0);
    let offset_y = style.shadow.map(|s| s.offset_y).unwrap_or(0.0);
    let pad = (stroke_width.unwrap_or(0.0) / 2.0 + blur + offset_y.abs()).ceil() as usize + 2;

    let fill_cov = rasterize_line(font, style.px, text, pad);

    let stroke_cov = stroke_width.map(|w| dilate(&fill_cov, w / 2.0));

    let shadow_cov = style.shadow.map(|s| {
        // The shadow follows the outermost shape: the stroke when present,
        // otherwise the fill.
        let base = stroke_cov.as_ref().unwrap_or(&fill_cov);
        box_blur(base, (s.blur / 2.0).round() as i32)
    });

    let advance = fill_cov.advance;
    let left_x = match style.align {
        TextAlign::Left => x,
        TextAlign::Center => x - advance / 2.0,
        TextAlign::Right => x - advance,
    };
    let baseline_y = match style.baseline {
        Baseline::Alphabetic => y,
        Baseline::Middle => y + (ascent + descent) / 2.0,
    };
    let origin_x = (left_x - pad as f32).round() as i32;
    let origin_y = (baseline_y - ascent - pad as f32).round() as i32;

    if let (Some(cov), Some(shadow)) = (&shadow_cov, style.shadow) {
        composite(
            surface,
            cov,
            origin_x,
            origin_y + shadow.offset_y.round() as i32,
            shadow.color,
            clip,
        );
    }
    if let (Some(cov), Some(color)) = (&stroke_cov, style.stroke) {
        composite(surface, cov, origin_x, origin_y, color, clip);
    }
    composite(surface, &fill_cov, origin_x, origin_y, style.fill, clip);
}

/// Anti-aliased coverage buffer for one line of text, padded on all sides so
/// stroke dilation and shadow blur have room to grow.
struct Coverage {
    width: usize,
    height: usize,
    data: Vec<f32>,
    /// Total advance width of the line (unpadded).
    advance: f32,
}

fn rasterize_line(font: &FontArc, px: f32, text: &str, pad: usize) -> Coverage {
    let scaled = font.as_scaled(px);
    let ascent = scaled.ascent();
    let descent = scaled.descent();

    let mut glyphs = Vec::new();
    let mut caret = 0.0f32;
    for ch in text.chars() {
        let id = font.glyph_id(ch);
        glyphs.push((id, caret));
        caret += scaled.h_advance(id);
    }

    let advance = caret;
    let width = advance.ceil() as usize + pad * 2;
    let height = (ascent - descent).ceil() as usize + pad * 2;
    let mut data = vec![0.0f32; width * height];
    let baseline = pad as f32 + ascent;

    for &(id, glyph_x) in &glyphs {
        let glyph =
            id.with_scale_and_position(px, ab_glyph::point(pad as f32 + glyph_x, baseline));
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let bx = gx as i32 + bounds.min.x as i32;
                let by = gy as i32 + bounds.min.y as i32;
                if bx >= 0 && by >= 0 && (bx as usize) < width && (by as usize) < height {
                    let idx = by as usize * width + bx as usize;
                    data[idx] = (data[idx] + coverage).min(1.0);
                }
            });
        }
    }

    Coverage {
        width,
        height,
        data,
        advance,
    }
}

/// Morphological dilation by a disk: each output pixel takes the maximum
/// coverage within `radius`. This is what rounds the stroke joins.
fn dilate(cov: &Coverage, radius: f32) -> Coverage {
    if radius <= 0.0 {
        return Coverage {
            width: cov.width,
            height: cov.height,
            data: cov.data.clone(),
            advance: cov.advance,
        };
    }
    let r = radius.ceil() as i32;
    let r2 = radius * radius + 0.25;
    let mut offsets = Vec::new();
    for dy in -r..=r {
        for dx in -r..=r {
            if (dx * dx + dy * dy) as f32 <= r2 {
                offsets.push((dx, dy));
            }
        }
    }
    let mut out = vec![0.0f32; cov.width * cov.height];
    for y in 0..cov.height as i32 {
        for x in 0..cov.width as i32 {
            let mut max = 0.0f32;
            for &(dx, dy) in &offsets {
                let sx = x + dx;
                let sy = y + dy;
                if sx >= 0 && sy >= 0 && (sx as usize) < cov.width && (sy as usize) < cov.height {
                    let v = cov.data[sy as usize * cov.width + sx as usize];
                    if v > max {
                        max = v;
                        if max >= 1.0 {
                            break;
                        }
                    }
                }
            }
            out[y as usize * cov.width + x as usize] = max;
        }
    }
    Coverage {
        width: cov.width,
        height: cov.height,
        data: out,
        advance: cov.advance,
    }
}

/// Separable box blur, one horizontal and one vertical pass.
fn box_blur(cov: &Coverage, radius: i32) -> Coverage {
    if radius <= 0 {
        return Coverage {
            width: cov.width,
            height: cov.height,
            data: cov.data.clone(),
            advance: cov.advance,
        };
    }
    let w = cov.width as i32;
    let h = cov.height as i32;
    let window = (radius * 2 + 1) as f32;

    let mut horizontal = vec![0.0f32; cov.width * cov.height];
    for y in 0..h {
        for x in 0..w {
            let mut sum = 0.0;
            for dx in -radius..=radius {
                let sx = (x + dx).clamp(0, w - 1);
                sum += cov.data[(y * w + sx) as usize];
            }
            horizontal[(y * w + x) as usize] = sum / window;
        }
    }
    let mut out = vec![0.0f32; cov.width * cov.height];
    for y in 0..h {
        for x in 0..w {
            let mut sum = 0.0;
            for dy in -radius..=radius {
                let sy = (y + dy).clamp(0, h - 1);
                sum += horizontal[(sy * w + x) as usize];
            }
            out[(y * w + x) as usize] = sum / window;
        }
    }
    Coverage {
        width: cov.width,
        height: cov.height,
        data: out,
        advance: cov.advance,
    }
}

fn composite(
    surface: &mut Surface,
    cov: &Coverage,
    origin_x: i32,
    origin_y: i32,
    color: Color,
    clip: Option<Rect>,
) {
    for by in 0..cov.height {
        let sy = origin_y + by as i32;
        for bx in 0..cov.width {
            let coverage = cov.data[by * cov.width + bx];
            if coverage <= 0.0 {
                continue;
            }
            let sx = origin_x + bx as i32;
            if let Some(clip) = clip {
                let cx = sx as f32 + 0.5;
                let cy = sy as f32 + 0.5;
                if cx < clip.x || cx >= clip.right() || cy < clip.y || cy >= clip.bottom() {
                    continue;
                }
            }
            surface.blend_pixel(sx, sy, color, coverage);
        }
    }
}
