//! Delivery banner: dealer chrome with a taller footer that congratulates
//! the buyer by name under a fixed headline.

use image::RgbaImage;

use crate::geometry::Transform;
use crate::surface::{Color, Surface};
use crate::template::{Branding, MAGENTA, band_rects, draw_banded_chrome};
use crate::text::{Shadow, TextStyle, draw_text, fit_text};
use crate::vehicle::{VehicleData, clean_spaces};

const FOOTER_HEIGHT: f32 = 280.0;
const HEADLINE: &str = "FELICITACIONES!!";

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

    draw_text(
        surface,
        HEADLINE,
        content.center_x(),
        footer.y + 110.0,
        &TextStyle {
            px: 74.0,
            weight: 900,
            fill: Color::WHITE,
            shadow: Some(Shadow {
                color: MAGENTA.with_alpha(0.30),
                blur: 18.0,
                offset_y: 6.0,
            }),
            ..Default::default()
        },
    );

    let name = clean_spaces(&data.client_name).to_uppercase();
    if !name.is_empty() {
        let px = fit_text(&name, 980.0, 48.0, 26.0, 800);
        draw_text(
            surface,
            &name,
            content.center_x(),
            footer.y + 200.0,
            &TextStyle {
                px,
                weight: 800,
                fill: Color::WHITE,
                shadow: Some(Shadow {
                    color: Color::rgba(0, 0, 0, 0.35),
                    blur: 12.0,
                    offset_y: 6.0,
                }),
                ..Default::default()
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::SQUARE;
    use image::Rgba;

    #[test]
    fn footer_carries_the_headline() {
        let mut s = Surface::new(SQUARE, SQUARE);
        let photo = RgbaImage::from_pixel(800, 800, Rgba([60, 60, 60, 255]));
        let data = VehicleData {
            client_name: "  maría  lópez ".into(),
            ..Default::default()
        };
        draw(&mut s, &photo, &Transform::default(), &data, &Branding::default());

        // Footer band starts at 800; headline glyphs put white pixels there.
        let footer_y = SQUARE - 280;
        let lit = s
            .image()
            .enumerate_pixels()
            .filter(|(_, y, p)| *y > footer_y + 20 && p.0[0] > 200)
            .count();
        assert!(lit > 100, "expected headline pixels in the footer, got {lit}");
    }
}
