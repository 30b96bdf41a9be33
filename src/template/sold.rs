//! Sold banner: the sale layout with a rotated translucent red band stamped
//! across the photo carrying the sold caption.

use image::RgbaImage;

use crate::geometry::{Rect, Transform};
use crate::surface::{Color, Surface};
use crate::template::{Branding, sale};
use crate::text::{Baseline, Shadow, TextStyle, draw_text};
use crate::vehicle::{VehicleData, upper};

const BAND_W: f32 = 980.0;
const BAND_H: f32 = 160.0;
const BAND_ANGLE: f32 = -std::f32::consts::PI / 9.0; // -20°

/// Caption printed on the band; falls back when the field is blank.
fn caption(data: &VehicleData) -> String {
    let text = upper(&data.sold_text);
    if text.is_empty() { "VENDIDO".to_string() } else { text }
}

pub fn draw(
    surface: &mut Surface,
    photo: &RgbaImage,
    transform: &Transform,
    data: &VehicleData,
    branding: &Branding,
) {
    sale::draw(surface, photo, transform, data, branding);

    // The band is drawn axis-aligned on its own surface, then stamped
    // rotated so the caption rotates with it.
    let mut band = Surface::new(BAND_W as u32, BAND_H as u32);
    band.fill_rounded_rect(
        Rect::new(0.0, 0.0, BAND_W, BAND_H),
        18.0,
        Color::rgba(255, 0, 0, 0.55),
    );
    draw_text(
        &mut band,
        &caption(data),
        BAND_W / 2.0,
        BAND_H / 2.0 + 6.0,
        &TextStyle {
            px: 96.0,
            weight: 900,
            fill: Color::rgba(255, 255, 255, 0.96),
            shadow: Some(Shadow {
                color: Color::rgba(0, 0, 0, 0.35),
                blur: 10.0,
                offset_y: 6.0,
            }),
            baseline: Baseline::Middle,
            ..Default::default()
        },
    );
    surface.stamp_rotated(&band, 540.0, 525.0, BAND_ANGLE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::SQUARE;
    use image::Rgba;
    use pretty_assertions::assert_eq;

    #[test]
    fn caption_defaults_and_uppercases() {
        let mut data = VehicleData::default();
        assert_eq!(caption(&data), "VENDIDO");
        data.sold_text = "  reservado ".into();
        assert_eq!(caption(&data), "RESERVADO");
    }

    #[test]
    fn band_tints_the_photo_center() {
        let mut s = Surface::new(SQUARE, SQUARE);
        let photo = RgbaImage::from_pixel(1600, 900, Rgba([10, 10, 10, 255]));
        draw(
            &mut s,
            &photo,
            &Transform::default(),
            &VehicleData::default(),
            &Branding::default(),
        );
        // Off-center along the band axis, away from the caption glyphs.
        let p = s.image().get_pixel(870, 420);
        assert!(p.0[0] > 100 && p.0[0] > p.0[2], "band not visible: {p:?}");
    }
}
