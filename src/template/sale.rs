//! Sale banner: dealer chrome top and bottom, the photo cover-fit between
//! the bands, and a single auto-fit summary line in the footer.

use image::RgbaImage;

use crate::geometry::Transform;
use crate::surface::{Color, Surface};
use crate::template::{Branding, band_rects, draw_banded_chrome, footer_style, summary_line};
use crate::text::{draw_text, fit_text};
use crate::vehicle::VehicleData;

pub(crate) const FOOTER_HEIGHT: f32 = 210.0;

pub fn draw(
    surface: &mut Surface,
    photo: &RgbaImage,
    transform: &Transform,
    data: &VehicleData,
    branding: &Branding,
) {
    let (content, footer) = band_rects(FOOTER_HEIGHT);
    surface.fill_rect(surface.bounds(), Color::BLACK);
    surface.draw_cover(photo, content, transform, content);
    draw_banded_chrome(surface, branding, FOOTER_HEIGHT);

    let line = summary_line(data);
    if !line.is_empty() {
        let px = fit_text(&line, 980.0, 54.0, 26.0, 900);
        draw_text(
            surface,
            &line,
            content.center_x(),
            footer.y + 113.0,
            &footer_style(px, 900),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::SQUARE;
    use image::Rgba;

    #[test]
    fn photo_stays_between_the_bands() {
        let mut s = Surface::new(SQUARE, SQUARE);
        let photo = RgbaImage::from_pixel(1600, 900, Rgba([10, 200, 10, 255]));
        draw(
            &mut s,
            &photo,
            &Transform::default(),
            &VehicleData::default(),
            &Branding::default(),
        );
        // Header and footer are chrome, content is the photo.
        assert_eq!(s.image().get_pixel(100, 40).0[1], 0x11);
        assert!(s.image().get_pixel(540, 500).0[1] > 150);
        assert_eq!(s.image().get_pixel(540, 1050).0[1], 0x11);
    }
}
