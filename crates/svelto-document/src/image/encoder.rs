// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image encoder — compresses raster frames to baseline JPEG.

use svelto_core::error::SveltoError;

use crate::pdf::renderer::RasterFrame;

/// A compressed page image plus the pixel dimensions needed to place it on an
/// output page with the correct aspect ratio.
///
/// Ephemeral: consumed by the assembler immediately after encoding.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl EncodedImage {
    /// Encoded payload size in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Encode a frame as JPEG at the given quality factor.
///
/// `quality` is the planner's (0, 1] factor; it maps onto the codec's 1-100
/// scale, so encoded size grows with quality for a fixed frame.
pub fn encode_frame(frame: &RasterFrame, quality: f32) -> Result<EncodedImage, SveltoError> {
    let mut buffer = Vec::new();
    let encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, jpeg_quality(quality));
    frame
        .as_rgb()
        .write_with_encoder(encoder)
        .map_err(|err| SveltoError::Encode(format!("JPEG encoding failed: {}", err)))?;

    Ok(EncodedImage {
        bytes: buffer,
        width: frame.width(),
        height: frame.height(),
    })
}

/// Map a (0, 1] quality factor to the JPEG 1-100 scale.
fn jpeg_quality(quality: f32) -> u8 {
    (quality.clamp(0.0, 1.0) * 100.0).round().max(1.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    /// A deterministic frame with enough variation that JPEG quality
    /// actually changes the payload size.
    fn textured_frame(width: u32, height: u32) -> RasterFrame {
        let image = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([
                ((x * 7 + y * 13) % 256) as u8,
                ((x * 3 + y * 5) % 256) as u8,
                ((x + y * 11) % 256) as u8,
            ])
        });
        RasterFrame::from_rgb(image)
    }

    #[test]
    fn encoded_image_records_frame_dimensions() {
        let frame = textured_frame(120, 80);
        let encoded = encode_frame(&frame, 0.6).unwrap();
        assert_eq!(encoded.width, 120);
        assert_eq!(encoded.height, 80);
        assert!(!encoded.bytes.is_empty());
        assert_eq!(encoded.size(), encoded.bytes.len());
    }

    #[test]
    fn output_is_jpeg() {
        let encoded = encode_frame(&textured_frame(32, 32), 0.5).unwrap();
        // JPEG SOI marker.
        assert_eq!(&encoded.bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn size_grows_with_quality() {
        let frame = textured_frame(200, 200);
        let low = encode_frame(&frame, 0.3).unwrap();
        let high = encode_frame(&frame, 0.8).unwrap();
        assert!(
            low.size() <= high.size(),
            "expected {} <= {}",
            low.size(),
            high.size()
        );
    }

    #[test]
    fn quality_mapping_stays_on_codec_scale() {
        assert_eq!(jpeg_quality(0.8), 80);
        assert_eq!(jpeg_quality(1.0), 100);
        // The planner floors quality at 0.1, but the mapping itself must
        // never produce 0.
        assert_eq!(jpeg_quality(0.0), 1);
        assert_eq!(jpeg_quality(2.0), 100);
    }
}
