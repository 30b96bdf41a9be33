//! Story composite: three photo panels and one data band stacked on the
//! 1080×1920 canvas, with the magenta separator bars painted last so they
//! always sit on top of the panels.

use image::RgbaImage;

use crate::geometry::Rect;
use crate::story::{PHOTO_BLOCKS, SEPARATOR_THICKNESS, StoryState, block_rect};
use crate::surface::{Color, Surface};
use crate::template::MAGENTA;
use crate::text::{Baseline, Shadow, TextStyle, draw_text_clipped, fit_text};
use crate::vehicle::{VehicleData, capitalize, clean_spaces, format_mileage, upper};

const TEXT_MAX_W: f32 = 920.0;

pub fn draw(surface: &mut Surface, photos: &[RgbaImage], state: &StoryState, data: &VehicleData) {
    surface.fill_rect(surface.bounds(), Color::BLACK);

    for id in PHOTO_BLOCKS {
        let Some(block) = state.block(id) else { continue };
        // A stale index (images removed mid-session) falls back to the last
        // photo instead of leaving a black panel.
        let Some(photo) = photos
            .get(block.image_index)
            .or_else(|| photos.last())
        else {
            continue;
        };
        let rect = block_rect(id);
        surface.draw_cover(photo, rect, &block.transform, rect);
    }

    draw_data_band(surface, data);

    for s in state.separators.clamped().as_array() {
        surface.fill_rect(
            Rect::new(
                0.0,
                s - SEPARATOR_THICKNESS / 2.0,
                surface.width() as f32,
                SEPARATOR_THICKNESS,
            ),
            MAGENTA,
        );
    }
}

/// Mileage and year on one line; either side drops out when absent.
fn mileage_year_line(data: &VehicleData) -> String {
    let mut parts = Vec::new();
    let km = format_mileage(&data.km);
    if !km.is_empty() && !data.km_hidden {
        parts.push(format!("{km}KM"));
    }
    let year = clean_spaces(&data.year);
    if !year.is_empty() {
        parts.push(year);
    }
    parts.join(" • ")
}

/// Engine and drivetrain joined on one line.
fn engine_line(data: &VehicleData) -> String {
    [&data.engine, &data.motor_traction]
        .iter()
        .map(|f| upper(f))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn draw_data_band(surface: &mut Surface, data: &VehicleData) {
    let band = block_rect(3);
    let cx = band.center_x();

    let model = upper(&data.model);
    if !model.is_empty() {
        let px = fit_text(&model, TEXT_MAX_W, 120.0, 72.0, 900);
        draw_text_clipped(
            surface,
            &model,
            cx,
            band.y + 135.0,
            &TextStyle {
                px,
                weight: 900,
                fill: Color::WHITE,
                stroke: Some(Color::rgba(0, 0, 0, 0.85)),
                stroke_width: Some((px * 0.11).round().max(6.0)),
                shadow: Some(Shadow {
                    color: Color::rgba(0, 0, 0, 0.35),
                    blur: 16.0,
                    offset_y: 6.0,
                }),
                ..Default::default()
            },
            Some(band),
        );
    }

    let km_year = mileage_year_line(data);
    if !km_year.is_empty() {
        let px = fit_text(&km_year, TEXT_MAX_W, 80.0, 44.0, 900);
        draw_text_clipped(
            surface,
            &km_year,
            cx,
            band.y + 255.0,
            &TextStyle {
                px,
                weight: 900,
                fill: Color::WHITE,
                stroke: Some(Color::rgba(0, 0, 0, 0.80)),
                stroke_width: Some((px * 0.10).round().max(5.0)),
                shadow: Some(Shadow {
                    color: Color::rgba(0, 0, 0, 0.30),
                    blur: 12.0,
                    offset_y: 5.0,
                }),
                baseline: Baseline::Middle,
                ..Default::default()
            },
            Some(band),
        );
    }

    let secondary = |px: f32| TextStyle {
        px,
        weight: 700,
        fill: Color::WHITE,
        shadow: Some(Shadow {
            color: Color::rgba(0, 0, 0, 0.30),
            blur: 10.0,
            offset_y: 4.0,
        }),
        baseline: Baseline::Middle,
        ..Default::default()
    };

    let engine = engine_line(data);
    if !engine.is_empty() {
        let px = fit_text(&engine, TEXT_MAX_W, 64.0, 36.0, 700);
        draw_text_clipped(surface, &engine, cx, band.y + 335.0, &secondary(px), Some(band));
    }

    let gearbox = capitalize(&data.gearbox);
    if !gearbox.is_empty() {
        let line = format!("Caja: {gearbox}");
        let px = fit_text(&line, TEXT_MAX_W, 64.0, 36.0, 700);
        draw_text_clipped(surface, &line, cx, band.y + 420.0, &secondary(px), Some(band));
    }
}
