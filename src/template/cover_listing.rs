//! Full-bleed listing cover: the photo fills the whole square, a vignette
//! keeps the edges readable, and the vehicle data is stacked over it with
//! stroked, shadowed text. Because the text sits on an arbitrary photo, the
//! regions behind the titles and the detail column are luminance-sampled and
//! the outline/shadow get boosted over bright backgrounds.

use image::RgbaImage;

use crate::geometry::{Rect, Transform};
use crate::surface::{Color, Surface};
use crate::template::Branding;
use crate::text::{Baseline, Shadow, TextAlign, TextStyle, draw_text, fit_text};
use crate::vehicle::{VehicleData, clean_spaces, format_mileage, upper};

const W: f32 = super::SQUARE as f32;
const H: f32 = super::SQUARE as f32;

const BLUE_PILL: Color = Color::rgba(0, 92, 255, 0.86);
const BLUE_BAR: Color = Color::rgba(0, 92, 255, 0.90);

/// Backgrounds brighter than this get heavier outlines and shadows.
const BRIGHT_THRESHOLD: f32 = 0.65;

const VIGNETTE: [(f32, Color); 3] = [
    (0.0, Color::rgba(0, 0, 0, 0.15)),
    (0.55, Color::rgba(0, 0, 0, 0.06)),
    (1.0, Color::rgba(0, 0, 0, 0.25)),
];

/// The lines under the mileage headline, in display order with empties
/// omitted. The first entry is the mileage itself when it renders at all.
pub fn detail_lines(data: &VehicleData) -> Vec<String> {
    let mut lines = Vec::new();
    let km = format_mileage(&data.km);
    if !km.is_empty() && !data.km_hidden {
        lines.push(format!("{km}KM"));
    }
    let gearbox = upper(&data.gearbox);
    if !gearbox.is_empty() {
        lines.push(format!("Caja: {gearbox}"));
    }
    let year = clean_spaces(&data.year);
    if !year.is_empty() {
        lines.push(format!("Año: {year}"));
    }
    for extra in [&data.extra1, &data.extra2] {
        let extra = clean_spaces(extra);
        if !extra.is_empty() {
            lines.push(extra);
        }
    }
    lines
}

pub fn draw(
    surface: &mut Surface,
    photo: &RgbaImage,
    transform: &Transform,
    data: &VehicleData,
    branding: &Branding,
) {
    let bounds = surface.bounds();
    surface.fill_rect(bounds, Color::BLACK);
    surface.draw_cover(photo, bounds, transform, bounds);
    surface.fill_vertical_gradient(bounds, &VIGNETTE);

    // Sample the photo regions the text will land on, before drawing any of
    // it, so the titles don't skew the detail sample.
    let title_bright = surface.average_luminance(Rect::new(40.0, 140.0, 1000.0, 220.0))
        > BRIGHT_THRESHOLD;
    let detail_bright = surface.average_luminance(Rect::new(40.0, 560.0, 1000.0, 360.0))
        > BRIGHT_THRESHOLD;

    draw_titles(surface, data, title_bright);
    draw_version_pill(surface, data);
    draw_details(surface, data, detail_bright);
    draw_bottom_bar(surface, branding);
}

fn title_style(px: f32, bright: bool) -> TextStyle {
    TextStyle {
        px,
        weight: 900,
        fill: Color::WHITE,
        stroke: Some(Color::BLACK),
        stroke_width: Some(if bright { 14.0 } else { 10.0 }),
        shadow: Some(Shadow {
            color: Color::rgba(0, 0, 0, if bright { 0.45 } else { 0.20 }),
            blur: if bright { 18.0 } else { 14.0 },
            offset_y: 6.0,
        }),
        ..Default::default()
    }
}

fn draw_titles(surface: &mut Surface, data: &VehicleData, bright: bool) {
    let brand = upper(&data.brand);
    let model = upper(&data.model);
    if !brand.is_empty() {
        let px = fit_text(&brand, 1000.0, 92.0, 56.0, 900);
        draw_text(surface, &brand, W / 2.0, 230.0, &title_style(px, bright));
    }
    if !model.is_empty() {
        let px = fit_text(&model, 1000.0, 92.0, 56.0, 900);
        draw_text(surface, &model, W / 2.0, 330.0, &title_style(px, bright));
    }
}

fn draw_version_pill(surface: &mut Surface, data: &VehicleData) {
    let version = upper(&data.version);
    if version.is_empty() {
        return;
    }
    let px = fit_text(&version, W - 240.0, 54.0, 30.0, 900);
    let text_w = crate::text::measure_width(&version, px, 900);
    let pill_w = (text_w + 80.0).min(W - 160.0);
    let pill_h = 84.0;
    let pill = Rect::new(W / 2.0 - pill_w / 2.0, H / 2.0 - pill_h / 2.0, pill_w, pill_h);
    surface.fill_rounded_rect(pill, 18.0, BLUE_PILL);
    draw_text(
        surface,
        &version,
        W / 2.0,
        pill.center_y(),
        &TextStyle {
            px,
            weight: 900,
            fill: Color::WHITE,
            baseline: Baseline::Middle,
            ..Default::default()
        },
    );
}

fn detail_style(px: f32, weight: u16, bright: bool) -> TextStyle {
    TextStyle {
        px,
        weight,
        fill: Color::WHITE,
        stroke: bright.then_some(Color::BLACK),
        stroke_width: bright.then_some(6.0),
        shadow: Some(Shadow {
            color: Color::rgba(0, 0, 0, if bright { 0.55 } else { 0.35 }),
            blur: if bright { 16.0 } else { 12.0 },
            offset_y: 6.0,
        }),
        baseline: Baseline::Middle,
        ..Default::default()
    }
}

fn draw_details(surface: &mut Surface, data: &VehicleData, bright: bool) {
    let lines = detail_lines(data);
    let km = format_mileage(&data.km);
    let has_headline = !km.is_empty() && !data.km_hidden;

    let mut y = 650.0;
    let mut rest = lines.as_slice();
    if has_headline {
        draw_text(surface, &lines[0], W / 2.0, y, &detail_style(74.0, 900, bright));
        y += 90.0;
        rest = &lines[1..];
    }
    for line in rest {
        draw_text(surface, line, W / 2.0, y, &detail_style(44.0, 700, bright));
        y += 58.0;
    }
}

fn draw_bottom_bar(surface: &mut Surface, branding: &Branding) {
    let bar = Rect::new(0.0, H - 70.0, W, 70.0);
    surface.fill_rect(bar, BLUE_BAR);
    let style = TextStyle {
        px: 26.0,
        weight: 700,
        fill: Color::WHITE,
        baseline: Baseline::Middle,
        ..Default::default()
    };
    let y = bar.center_y();
    draw_text(
        surface,
        &branding.footer_left,
        24.0,
        y,
        &TextStyle {
            align: TextAlign::Left,
            ..style
        },
    );
    draw_text(surface, &branding.phone, W / 2.0, y, &style);
    draw_text(
        surface,
        &branding.footer_right,
        W - 24.0,
        y,
        &TextStyle {
            align: TextAlign::Right,
            ..style
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_data() -> VehicleData {
        VehicleData {
            brand: "Ford".into(),
            model: "Fiesta".into(),
            year: "2020".into(),
            gearbox: "manual".into(),
            km: "85000".into(),
            ..Default::default()
        }
    }

    #[test]
    fn detail_lines_in_display_order() {
        assert_eq!(
            detail_lines(&sample_data()),
            vec!["85.000KM", "Caja: MANUAL", "Año: 2020"]
        );
    }

    #[test]
    fn detail_lines_omit_hidden_mileage_and_empties() {
        let mut data = sample_data();
        data.km_hidden = true;
        data.extra2 = "  Permuta  financia ".into();
        assert_eq!(
            detail_lines(&data),
            vec!["Caja: MANUAL", "Año: 2020", "Permuta financia"]
        );
        data.km_hidden = false;
        data.km = "junk".into();
        assert_eq!(
            detail_lines(&data),
            vec!["Caja: MANUAL", "Año: 2020", "Permuta financia"]
        );
    }

    #[test]
    fn detail_lines_empty_for_blank_record() {
        assert_eq!(detail_lines(&VehicleData::default()), Vec::<String>::new());
    }

    #[test]
    fn draw_covers_canvas_and_paints_bar() {
        let mut s = Surface::new(super::super::SQUARE, super::super::SQUARE);
        let photo = RgbaImage::from_pixel(1200, 800, image::Rgba([90, 90, 90, 255]));
        draw(
            &mut s,
            &photo,
            &Transform::default(),
            &sample_data(),
            &Branding::default(),
        );
        // Photo reaches the top-left corner (full bleed, vignette-darkened).
        assert!(s.image().get_pixel(2, 2).0[3] == 255);
        // Bottom bar is blue (sampled below the text line).
        let bar = s.image().get_pixel(540, 1072);
        assert!(bar.0[2] > 180 && bar.0[2] > bar.0[0], "bar pixel {bar:?}");
    }
}
