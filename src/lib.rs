//! # Vitrina - Vehicle Listing Banner Renderer
//!
//! Vitrina renders social-media-ready marketing banners for vehicle listings
//! from uploaded photos and a flat data record. It provides:
//!
//! - **Cover-fit geometry**: CSS-cover photo placement with clamped zoom/pan
//! - **Template library**: listing cover, sale, sold, congratulations, and a
//!   4-band story composite
//! - **Styled text**: embedded typefaces, auto-fit sizing, strokes and shadows
//! - **Export**: jpeg/png encoding, naming policy, parallel batch rendering
//!
//! ## Quick Start
//!
//! ```no_run
//! use vitrina::{
//!     Branding, RenderInput, StoryState, Template, Transform, VehicleData, render,
//! };
//!
//! let photo = image::open("fiesta.jpg")?.to_rgba8();
//! let photos = vec![photo];
//!
//! let data = VehicleData {
//!     brand: "Ford".into(),
//!     model: "Fiesta".into(),
//!     year: "2020".into(),
//!     km: "85000".into(),
//!     ..Default::default()
//! };
//!
//! let banner = render(
//!     Template::CoverListing,
//!     &RenderInput {
//!         photos: &photos,
//!         photo_index: 0,
//!         transform: Transform::default(),
//!         data: &data,
//!         story: &StoryState::new(photos.len()),
//!         branding: &Branding::default(),
//!     },
//! )?;
//!
//! std::fs::write(vitrina::output_name(Template::CoverListing, &data, 1), banner.bytes)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`geometry`] | Cover-fit rectangles, zoom/pan transforms |
//! | [`vehicle`] | Vehicle data record and text/number formatting |
//! | [`surface`] | RGBA raster surface and compositing primitives |
//! | [`text`] | Measurement, auto-fit, styled text rendering |
//! | [`story`] | Versioned 4-band story session state |
//! | [`template`] | The five banner layouts |
//! | [`export`] | Encoding, naming, parallel batch rendering |
//! | [`error`] | Error types |

pub mod error;
pub mod export;
pub mod geometry;
pub mod story;
pub mod surface;
pub mod template;
pub mod text;
pub mod vehicle;

pub use error::VitrinaError;
pub use export::{BatchItem, EncodedBanner, RenderInput, output_name, render, render_batch};
pub use geometry::{MAX_ZOOM, Rect, Transform, cover_rect};
pub use story::{BlockState, StoryState, block_from_y, block_rect};
pub use surface::{Color, Surface};
pub use template::{Branding, Template};
pub use text::{fit_text, measure_width};
pub use vehicle::{ExportFormat, VehicleData, format_mileage, slugify};
