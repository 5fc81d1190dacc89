// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document assembler — builds the output PDF one full-page image at a time
// using `lopdf`.
//
// Each appended JPEG becomes its own page: the payload is embedded verbatim
// as a DCTDecode image XObject. The bytes the encoder produced are the bytes
// that land in the file — no decode/re-encode round trip, which is what ties
// the planner's byte budget to the actual output size.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use svelto_core::error::SveltoError;
use tracing::{debug, instrument};

use crate::image::encoder::EncodedImage;

/// Points per millimetre (1 pt = 1/72 inch, 1 inch = 25.4 mm).
const PT_PER_MM: f64 = 72.0 / 25.4;

/// Incrementally accumulates output pages; serialised once by [`finish`].
///
/// `finish` consumes the assembler, so a handle cannot be reused after the
/// document is serialised.
///
/// [`finish`]: PdfAssembler::finish
pub struct PdfAssembler {
    document: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
    page_width_mm: f64,
}

impl PdfAssembler {
    /// Start an empty output document with a fixed page width.
    pub fn new(page_width_mm: f64) -> Self {
        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();
        Self {
            document,
            pages_id,
            page_ids: Vec::new(),
            page_width_mm,
        }
    }

    /// Number of pages appended so far.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Append one full-page image.
    ///
    /// The page height is derived from the image's aspect ratio against the
    /// fixed page width; the image fills the page from its origin.
    #[instrument(skip_all, fields(image_bytes = image.size(), width = image.width, height = image.height))]
    pub fn append_page(&mut self, image: &EncodedImage) -> Result<(), SveltoError> {
        if image.width == 0 || image.height == 0 {
            return Err(SveltoError::Assembly(format!(
                "cannot place a {}x{} image on a page",
                image.width, image.height
            )));
        }

        let page_height_mm = image.height as f64 * self.page_width_mm / image.width as f64;
        let page_width_pt = (self.page_width_mm * PT_PER_MM) as f32;
        let page_height_pt = (page_height_mm * PT_PER_MM) as f32;

        let mut image_dict = Dictionary::new();
        image_dict.set("Type", Object::Name(b"XObject".to_vec()));
        image_dict.set("Subtype", Object::Name(b"Image".to_vec()));
        image_dict.set("Width", Object::Integer(image.width as i64));
        image_dict.set("Height", Object::Integer(image.height as i64));
        image_dict.set("ColorSpace", Object::Name(b"DeviceRGB".to_vec()));
        image_dict.set("BitsPerComponent", Object::Integer(8));
        image_dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));
        image_dict.set("Length", Object::Integer(image.bytes.len() as i64));
        let image_id = self
            .document
            .add_object(Stream::new(image_dict, image.bytes.clone()));

        // Scale the unit image square to the full page and draw it at the
        // origin.
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        Object::Real(page_width_pt),
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Real(page_height_pt),
                        Object::Integer(0),
                        Object::Integer(0),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_bytes = content.encode().map_err(|err| {
            SveltoError::Assembly(format!("failed to encode page content stream: {}", err))
        })?;
        let content_id = self
            .document
            .add_object(Stream::new(Dictionary::new(), content_bytes));

        let page_id = self.document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                Object::Real(page_width_pt),
                Object::Real(page_height_pt),
            ],
            "Resources" => dictionary! {
                "XObject" => dictionary! { "Im0" => image_id },
            },
            "Contents" => content_id,
        });
        self.page_ids.push(page_id);

        debug!(
            page = self.page_ids.len(),
            page_height_mm, "page appended"
        );

        Ok(())
    }

    /// Serialise the accumulated pages into final PDF bytes.
    pub fn finish(mut self) -> Result<Vec<u8>, SveltoError> {
        if self.page_ids.is_empty() {
            return Err(SveltoError::Assembly(
                "cannot serialise a document with no pages".to_string(),
            ));
        }

        let kids: Vec<Object> = self
            .page_ids
            .iter()
            .map(|id| Object::Reference(*id))
            .collect();
        let count = self.page_ids.len() as i64;

        self.document.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = self.document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.document.trailer.set("Root", catalog_id);

        let mut output = Vec::new();
        self.document.save_to(&mut output).map_err(|err| {
            SveltoError::Assembly(format!("failed to serialise output PDF: {}", err))
        })?;

        debug!(pages = count, output_bytes = output.len(), "document serialised");
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::encoder::encode_frame;
    use crate::pdf::renderer::RasterFrame;
    use image::RgbImage;

    fn sample_image(width: u32, height: u32) -> EncodedImage {
        let frame = RasterFrame::from_rgb(RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        }));
        encode_frame(&frame, 0.6).unwrap()
    }

    fn number(object: &Object) -> f64 {
        match object {
            Object::Integer(value) => *value as f64,
            Object::Real(value) => *value as f64,
            other => panic!("expected a number, got {:?}", other),
        }
    }

    #[test]
    fn finished_document_is_a_pdf_with_one_page_per_image() {
        let mut assembler = PdfAssembler::new(210.0);
        assembler.append_page(&sample_image(100, 150)).unwrap();
        assembler.append_page(&sample_image(80, 40)).unwrap();
        assert_eq!(assembler.page_count(), 2);

        let bytes = assembler.finish().unwrap();
        assert!(bytes.starts_with(b"%PDF-"));

        let reloaded = Document::load_mem(&bytes).unwrap();
        assert_eq!(reloaded.get_pages().len(), 2);
    }

    #[test]
    fn jpeg_payload_embeds_byte_for_byte() {
        let image = sample_image(60, 60);
        let mut assembler = PdfAssembler::new(210.0);
        assembler.append_page(&image).unwrap();
        let bytes = assembler.finish().unwrap();

        let reloaded = Document::load_mem(&bytes).unwrap();
        let embedded = reloaded
            .objects
            .values()
            .find_map(|object| match object {
                Object::Stream(stream)
                    if matches!(
                        stream.dict.get(b"Subtype"),
                        Ok(Object::Name(name)) if name == b"Image"
                    ) =>
                {
                    Some(stream)
                }
                _ => None,
            })
            .expect("no image XObject in output");

        assert_eq!(embedded.content, image.bytes);
        assert!(matches!(
            embedded.dict.get(b"Filter"),
            Ok(Object::Name(name)) if name == b"DCTDecode"
        ));
    }

    #[test]
    fn page_box_preserves_image_aspect_at_fixed_width() {
        // 100x150 image on a 210 mm wide page -> 315 mm tall page.
        let mut assembler = PdfAssembler::new(210.0);
        assembler.append_page(&sample_image(100, 150)).unwrap();
        let bytes = assembler.finish().unwrap();

        let reloaded = Document::load_mem(&bytes).unwrap();
        let (_, page_id) = reloaded.get_pages().into_iter().next().unwrap();
        let page_dict = reloaded.get_object(page_id).unwrap().as_dict().unwrap();
        let media_box = match page_dict.get(b"MediaBox").unwrap() {
            Object::Array(values) => values.clone(),
            other => panic!("MediaBox is not an array: {:?}", other),
        };

        let width_pt = number(&media_box[2]);
        let height_pt = number(&media_box[3]);
        assert!((width_pt - 210.0 * PT_PER_MM).abs() < 0.1);
        assert!((height_pt / width_pt - 1.5).abs() < 1e-3);
    }

    #[test]
    fn finish_without_pages_is_an_assembly_error() {
        let assembler = PdfAssembler::new(210.0);
        let err = assembler.finish().unwrap_err();
        assert!(matches!(err, SveltoError::Assembly(_)));
    }

    #[test]
    fn zero_dimension_image_is_rejected() {
        let mut assembler = PdfAssembler::new(210.0);
        let bogus = EncodedImage {
            bytes: vec![0xFF, 0xD8],
            width: 0,
            height: 10,
        };
        assert!(matches!(
            assembler.append_page(&bogus),
            Err(SveltoError::Assembly(_))
        ));
    }

    #[test]
    fn output_survives_a_filesystem_round_trip() {
        let mut assembler = PdfAssembler::new(210.0);
        assembler.append_page(&sample_image(50, 70)).unwrap();
        let bytes = assembler.finish().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        std::fs::write(&path, &bytes).unwrap();

        let reloaded = Document::load(&path).unwrap();
        assert_eq!(reloaded.get_pages().len(), 1);
    }
}
