//! The banner template library: five layouts sharing one drawing toolkit.
//!
//! Square layouts are 1080×1080, the story composite is 1080×1920. The
//! `sale`, `sold` and `congratulations` layouts share the banded chrome
//! (black header with the dealer wordmark, magenta accent rules, black
//! footer); `cover_listing` is full-bleed; `story` stacks four bands.
//!
//! Layout constants live next to the template that uses them. Anything two
//! templates share (chrome metrics, accent colors, the summary line) lives
//! here.

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::surface::{Color, Surface};
use crate::text::{Baseline, Shadow, TextAlign, TextStyle, draw_text};
use crate::vehicle::{VehicleData, format_mileage, upper};

pub mod congratulations;
pub mod cover_listing;
pub mod sale;
pub mod sold;
pub mod story;

/// Side of the square layouts.
pub const SQUARE: u32 = 1080;

/// Brand accent.
pub const MAGENTA: Color = Color::rgb(255, 0, 140);
/// Near-black chrome background.
pub const CHROME_BG: Color = Color::rgb(0x11, 0x11, 0x14);

const HEADER_HEIGHT: f32 = 180.0;
const RULE_HEIGHT: f32 = 6.0;

/// Fixed dealer identity printed on the chrome. Overridable by the caller,
/// but these are brand constants, not per-vehicle data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Branding {
    pub header_title: String,
    pub header_subtitle: String,
    pub footer_left: String,
    pub footer_right: String,
    pub phone: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            header_title: "Jesús DIAZ".to_string(),
            header_subtitle: "AUTOMOTORES".to_string(),
            footer_left: "Jesus Diaz Automotores".to_string(),
            footer_right: "Jesus Diaz Automotores".to_string(),
            phone: "2494 587046".to_string(),
        }
    }
}

/// The five banner layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Template {
    CoverListing,
    Sale,
    Sold,
    Congratulations,
    Story,
}

impl Template {
    /// Canonical output resolution, independent of preview scaling.
    pub fn resolution(self) -> (u32, u32) {
        match self {
            Template::Story => (crate::story::STORY_WIDTH, crate::story::STORY_HEIGHT),
            _ => (SQUARE, SQUARE),
        }
    }

    /// File-name prefix for exports of this layout.
    pub fn prefix(self) -> &'static str {
        match self {
            Template::CoverListing => "portada",
            Template::Sale => "venta",
            Template::Sold => "vendido",
            Template::Congratulations => "felicitaciones",
            Template::Story => "historia",
        }
    }

    /// Story renders once per batch instead of once per image.
    pub fn is_story(self) -> bool {
        self == Template::Story
    }
}

/// Rectangles of the banded square layouts for a given footer height:
/// `(content, footer)`. The header is fixed at 180 px.
pub(crate) fn band_rects(footer_height: f32) -> (Rect, Rect) {
    let w = SQUARE as f32;
    let h = SQUARE as f32;
    let content = Rect::new(
        0.0,
        HEADER_HEIGHT,
        w,
        h - HEADER_HEIGHT - footer_height,
    );
    let footer = Rect::new(0.0, h - footer_height, w, footer_height);
    (content, footer)
}

/// Paint the shared chrome of the banded layouts: background already drawn by
/// the caller is assumed; this fills the header and footer bands, the magenta
/// rules framing the content, and the dealer wordmark.
///
/// Call this after the photo so the rules sit on top of the content edges.
pub(crate) fn draw_banded_chrome(surface: &mut Surface, branding: &Branding, footer_height: f32) {
    let w = SQUARE as f32;
    let (content, footer) = band_rects(footer_height);

    surface.fill_rect(Rect::new(0.0, 0.0, w, HEADER_HEIGHT), CHROME_BG);
    surface.fill_rect(footer, CHROME_BG);
    surface.fill_rect(
        Rect::new(0.0, content.y - RULE_HEIGHT, w, RULE_HEIGHT),
        MAGENTA,
    );
    surface.fill_rect(Rect::new(0.0, footer.y, w, RULE_HEIGHT), MAGENTA);

    let cx = w / 2.0;
    draw_text(
        surface,
        &branding.header_title,
        cx,
        95.0,
        &TextStyle {
            px: 78.0,
            weight: 900,
            fill: Color::WHITE,
            shadow: Some(Shadow {
                color: Color::rgba(0, 0, 0, 0.25),
                blur: 10.0,
                offset_y: 4.0,
            }),
            ..Default::default()
        },
    );
    surface.fill_rect(Rect::new(cx - 180.0, 108.0, 360.0, 6.0), MAGENTA);
    draw_text(
        surface,
        &branding.header_subtitle,
        cx,
        150.0,
        &TextStyle {
            px: 34.0,
            weight: 700,
            fill: MAGENTA,
            ..Default::default()
        },
    );
}

/// The footer summary of the sale/sold layouts: non-empty fields of
/// model/year/version/engine uppercased and joined with "/", with the
/// formatted mileage appended as "…KM" when present.
pub(crate) fn summary_line(data: &VehicleData) -> String {
    let mut parts: Vec<String> = [&data.model, &data.year, &data.version, &data.engine]
        .iter()
        .map(|f| upper(f))
        .filter(|s| !s.is_empty())
        .collect();
    let km = format_mileage(&data.km);
    if !km.is_empty() && !data.km_hidden {
        parts.push(format!("{km}KM"));
    }
    parts.join(" / ")
}

/// Centered middle-baseline style used across footers.
pub(crate) fn footer_style(px: f32, weight: u16) -> TextStyle {
    TextStyle {
        px,
        weight,
        fill: Color::WHITE,
        align: TextAlign::Center,
        baseline: Baseline::Middle,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn resolutions_and_prefixes() {
        assert_eq!(Template::CoverListing.resolution(), (1080, 1080));
        assert_eq!(Template::Story.resolution(), (1080, 1920));
        assert_eq!(Template::Sold.prefix(), "vendido");
        assert!(Template::Story.is_story());
        assert!(!Template::Sale.is_story());
    }

    #[test]
    fn template_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&Template::CoverListing).unwrap(),
            r#""cover-listing""#
        );
        let t: Template = serde_json::from_str(r#""sold""#).unwrap();
        assert_eq!(t, Template::Sold);
    }

    #[test]
    fn summary_joins_present_fields() {
        let data = VehicleData {
            model: "Fiesta".into(),
            year: "2020".into(),
            engine: "1.6n".into(),
            km: "85000".into(),
            ..Default::default()
        };
        assert_eq!(summary_line(&data), "FIESTA / 2020 / 1.6N / 85.000KM");
    }

    #[test]
    fn summary_omits_hidden_or_invalid_mileage() {
        let mut data = VehicleData {
            model: "Fiesta".into(),
            km: "85000".into(),
            km_hidden: true,
            ..Default::default()
        };
        assert_eq!(summary_line(&data), "FIESTA");
        data.km_hidden = false;
        data.km = "abc".into();
        assert_eq!(summary_line(&data), "FIESTA");
    }

    #[test]
    fn band_rects_partition_the_square() {
        let (content, footer) = band_rects(210.0);
        assert_eq!(content.y, 180.0);
        assert_eq!(content.h, 690.0);
        assert_eq!(footer.y, 870.0);
        assert_eq!(content.bottom(), footer.y);
    }

    #[test]
    fn chrome_paints_header_and_rules() {
        let mut s = Surface::new(SQUARE, SQUARE);
        draw_banded_chrome(&mut s, &Branding::default(), 210.0);
        let img = s.image();
        // Header band is chrome-colored, rules are magenta.
        assert_eq!(img.get_pixel(10, 10).0[0], 0x11);
        assert_eq!(img.get_pixel(540, 177).0, [255, 0, 140, 255]);
        assert_eq!(img.get_pixel(540, 872).0, [255, 0, 140, 255]);
    }
}
