// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page renderer — rasterises source PDF pages to RGB pixel buffers using the
// `pdfium-render` crate.
//
// Scale 1.0 renders one pixel per PDF point (72 DPI). Pdfium is not safely
// reentrant across pages, so callers render strictly sequentially.

use image::{Rgb, RgbImage, RgbaImage};
use pdfium_render::prelude::*;
use svelto_core::error::SveltoError;
use tracing::{debug, instrument};

/// Owns the pdfium library binding and opens source documents.
pub struct PageRenderer {
    pdfium: Pdfium,
}

impl PageRenderer {
    /// Bind the pdfium library.
    ///
    /// Searches next to the executable first, then the system library paths.
    pub fn new() -> Result<Self, SveltoError> {
        let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|err| {
                SveltoError::Render(format!("failed to bind pdfium library: {:?}", err))
            })?;

        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }

    /// Parse raw PDF bytes into a renderable source document.
    ///
    /// The document borrows both the renderer and the input bytes for the
    /// duration of one compression run.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn open<'a>(&'a self, data: &'a [u8]) -> Result<SourceDocument<'a>, SveltoError> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(data, None)
            .map_err(|err| {
                SveltoError::Parse(format!("failed to load PDF from memory: {:?}", err))
            })?;

        debug!(pages = document.pages().len(), "PDF loaded from bytes");

        Ok(SourceDocument { document })
    }
}

/// An opened, parsed source document.
pub struct SourceDocument<'a> {
    document: PdfDocument<'a>,
}

impl SourceDocument<'_> {
    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.document.pages().len() as u32
    }

    /// Rasterise one page (0-indexed) at the given scale.
    ///
    /// The resulting frame is opaque RGB: any transparency in the source page
    /// is flattened onto white here, before encoding, because the JPEG codec
    /// downstream has no alpha channel and undefined regions must not come
    /// out black.
    #[instrument(skip(self))]
    pub fn render_page(&self, index: u32, scale: f32) -> Result<RasterFrame, SveltoError> {
        let page = self.document.pages().get(index as u16).map_err(|err| {
            SveltoError::Render(format!("page {} not found: {:?}", index + 1, err))
        })?;

        // Page dimensions are in PDF points; at scale 1.0 one point maps to
        // one pixel.
        let width_px = (page.width().value * scale).round().max(1.0) as i32;
        let height_px = (page.height().value * scale).round().max(1.0) as i32;

        let render_config = PdfRenderConfig::new()
            .set_target_width(width_px)
            .set_target_height(height_px);

        let bitmap = page.render_with_config(&render_config).map_err(|err| {
            SveltoError::Render(format!("failed to rasterise page {}: {:?}", index + 1, err))
        })?;

        let rgba = bitmap.as_image().to_rgba8();
        debug!(
            width = rgba.width(),
            height = rgba.height(),
            "page rasterised"
        );

        Ok(RasterFrame::from_rgba(&rgba))
    }
}

/// An opaque RGB pixel buffer produced by rendering one page.
///
/// Ephemeral: created, encoded, and dropped per page.
pub struct RasterFrame {
    image: RgbImage,
}

impl RasterFrame {
    /// Build a frame from an RGBA raster, flattening alpha onto white.
    pub fn from_rgba(rgba: &RgbaImage) -> Self {
        Self {
            image: flatten_onto_white(rgba),
        }
    }

    /// Wrap an already-opaque RGB buffer.
    pub fn from_rgb(image: RgbImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the underlying RGB buffer.
    pub fn as_rgb(&self) -> &RgbImage {
        &self.image
    }
}

/// Composite an RGBA image over an opaque white background.
fn flatten_onto_white(rgba: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let image::Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
        let blend = |channel: u8| -> u8 {
            let alpha = a as u32;
            ((channel as u32 * alpha + 255 * (255 - alpha)) / 255) as u8
        };
        Rgb([blend(r), blend(g), blend(b)])
    })
}
