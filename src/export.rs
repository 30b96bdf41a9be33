//! Render adapter: template dispatch onto a fresh surface, jpeg/png
//! encoding, the output file-name policy, and the parallel batch helper.
//!
//! Every render owns its surface, so batch items run on the rayon pool
//! without any shared mutable state. A failed item is logged and skipped;
//! one bad photo must not sink the rest of the batch.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbaImage};
use rayon::prelude::*;
use tracing::warn;

use crate::error::VitrinaError;
use crate::geometry::Transform;
use crate::story::StoryState;
use crate::surface::Surface;
use crate::template::{self, Branding, Template};
use crate::vehicle::{ExportFormat, VehicleData, pad2, slugify};

/// One encoded banner, ready to hand to the caller for download/upload.
#[derive(Debug, Clone)]
pub struct EncodedBanner {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
}

/// Everything one render call reads. Square layouts draw the photo at
/// `photo_index` under `transform`; the story layout reads the whole photo
/// slice through `story`.
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    pub photos: &'a [RgbaImage],
    pub photo_index: usize,
    pub transform: Transform,
    pub data: &'a VehicleData,
    pub story: &'a StoryState,
    pub branding: &'a Branding,
}

/// Render one banner at the template's canonical resolution and encode it
/// per the data record's export directives.
pub fn render(template: Template, input: &RenderInput<'_>) -> Result<EncodedBanner, VitrinaError> {
    let (w, h) = template.resolution();
    let mut surface = Surface::new(w, h);

    match template {
        Template::Story => {
            if input.photos.is_empty() {
                return Err(VitrinaError::MissingImage(template.prefix()));
            }
            template::story::draw(&mut surface, input.photos, input.story, input.data);
        }
        _ => {
            let photo = input
                .photos
                .get(input.photo_index)
                .ok_or(VitrinaError::MissingImage(template.prefix()))?;
            match template {
                Template::CoverListing => template::cover_listing::draw(
                    &mut surface,
                    photo,
                    &input.transform,
                    input.data,
                    input.branding,
                ),
                Template::Sale => template::sale::draw(
                    &mut surface,
                    photo,
                    &input.transform,
                    input.data,
                    input.branding,
                ),
                Template::Sold => template::sold::draw(
                    &mut surface,
                    photo,
                    &input.transform,
                    input.data,
                    input.branding,
                ),
                Template::Congratulations => template::congratulations::draw(
                    &mut surface,
                    photo,
                    &input.transform,
                    input.data,
                    input.branding,
                ),
                Template::Story => unreachable!(),
            }
        }
    }

    encode(surface.into_image(), input.data)
}

fn encode(img: RgbaImage, data: &VehicleData) -> Result<EncodedBanner, VitrinaError> {
    let (w, h) = (img.width(), img.height());
    let mut bytes = Vec::new();
    match data.export_format {
        ExportFormat::Jpg => {
            // Jpeg has no alpha channel; flatten first.
            let rgb = DynamicImage::ImageRgba8(img).to_rgb8();
            let quality = (data.effective_quality() * 100.0).round().clamp(1.0, 100.0) as u8;
            JpegEncoder::new_with_quality(&mut bytes, quality)
                .write_image(rgb.as_raw(), w, h, ExtendedColorType::Rgb8)
                .map_err(|e| VitrinaError::Encode(e.to_string()))?;
        }
        ExportFormat::Png => {
            PngEncoder::new(&mut bytes)
                .write_image(img.as_raw(), w, h, ExtendedColorType::Rgba8)
                .map_err(|e| VitrinaError::Encode(e.to_string()))?;
        }
    }
    Ok(EncodedBanner {
        bytes,
        mime: data.export_format.mime(),
    })
}

/// Output file name for the `index`-th banner (1-based) of a batch:
/// `{prefix}-{brand}-{model}-{year}-{NN}.{ext}` with empty slug segments
/// dropped. Congratulations substitutes the client-name slug for the index;
/// the story composite is a single file and always numbers itself 01.
pub fn output_name(template: Template, data: &VehicleData, index: usize) -> String {
    let mut segments = vec![template.prefix().to_string()];
    let brand = slugify(&data.brand);
    if !brand.is_empty() {
        segments.push(brand);
    }
    let model = slugify(&data.model);
    segments.push(if model.is_empty() { "auto".to_string() } else { model });
    let year = slugify(&data.year);
    if !year.is_empty() {
        segments.push(year);
    }
    match template {
        Template::Congratulations => {
            let client = slugify(&data.client_name);
            segments.push(if client.is_empty() {
                "cliente".to_string()
            } else {
                client
            });
        }
        Template::Story => segments.push(pad2(1)),
        _ => segments.push(pad2(index)),
    }
    format!("{}.{}", segments.join("-"), data.export_format.extension())
}

/// One successfully rendered batch entry, keyed by its source photo index.
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub photo_index: usize,
    pub name: String,
    pub banner: EncodedBanner,
}

/// Render a template across a photo batch in parallel. Square layouts yield
/// one banner per photo (with that photo's transform); the story layout
/// yields a single composite. Failed items are logged and skipped.
pub fn render_batch(
    template: Template,
    photos: &[RgbaImage],
    transforms: &[Transform],
    data: &VehicleData,
    story: &StoryState,
    branding: &Branding,
) -> Vec<BatchItem> {
    if template.is_story() {
        let input = RenderInput {
            photos,
            photo_index: 0,
            transform: Transform::default(),
            data,
            story,
            branding,
        };
        return match render(template, &input) {
            Ok(banner) => vec![BatchItem {
                photo_index: 0,
                name: output_name(template, data, 1),
                banner,
            }],
            Err(error) => {
                warn!(%error, "skipping story render");
                Vec::new()
            }
        };
    }

    (0..photos.len())
        .into_par_iter()
        .filter_map(|i| {
            let input = RenderInput {
                photos,
                photo_index: i,
                transform: transforms.get(i).copied().unwrap_or_default(),
                data,
                story,
                branding,
            };
            match render(template, &input) {
                Ok(banner) => Some(BatchItem {
                    photo_index: i,
                    name: output_name(template, data, i + 1),
                    banner,
                }),
                Err(error) => {
                    warn!(photo_index = i, %error, "skipping failed render");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn data() -> VehicleData {
        VehicleData {
            brand: "Ford".into(),
            model: "Fiesta Kinetic".into(),
            year: "2020".into(),
            client_name: "María López".into(),
            ..Default::default()
        }
    }

    #[test]
    fn names_follow_the_convention() {
        assert_eq!(
            output_name(Template::CoverListing, &data(), 1),
            "portada-ford-fiesta-kinetic-2020-01.jpg"
        );
        assert_eq!(
            output_name(Template::Sale, &data(), 12),
            "venta-ford-fiesta-kinetic-2020-12.jpg"
        );
        assert_eq!(
            output_name(Template::Congratulations, &data(), 3),
            "felicitaciones-ford-fiesta-kinetic-2020-maria-lopez.jpg"
        );
        assert_eq!(
            output_name(Template::Story, &data(), 7),
            "historia-ford-fiesta-kinetic-2020-01.jpg"
        );
    }

    #[test]
    fn names_drop_empty_segments_with_fallbacks() {
        let d = VehicleData {
            export_format: ExportFormat::Png,
            ..Default::default()
        };
        assert_eq!(output_name(Template::Sold, &d, 2), "vendido-auto-02.png");
        assert_eq!(
            output_name(Template::Congratulations, &d, 1),
            "felicitaciones-auto-cliente.png"
        );
    }

    #[test]
    fn missing_photo_is_an_error() {
        let d = data();
        let story = StoryState::new(0);
        let input = RenderInput {
            photos: &[],
            photo_index: 0,
            transform: Transform::default(),
            data: &d,
            story: &story,
            branding: &Branding::default(),
        };
        assert!(matches!(
            render(Template::Sale, &input),
            Err(VitrinaError::MissingImage("venta"))
        ));
        assert!(matches!(
            render(Template::Story, &input),
            Err(VitrinaError::MissingImage("historia"))
        ));
    }
}
