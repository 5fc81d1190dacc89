// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Leading-pages text extraction for the analysis side channel.
//
// Runs on its own lopdf parse of the source bytes, independent of the
// rendering pipeline, so the two can proceed concurrently without sharing
// state.

use lopdf::Document;
use svelto_core::error::SveltoError;
use tracing::{debug, instrument, warn};

/// Collect visible text from up to the first `max_pages` pages.
///
/// Each page's text is normalised to single-spaced words and emitted as
/// `Page {n}: {text}` on its own line, with 1-based page numbers. Pages whose
/// text cannot be decoded are skipped — the caller treats the whole feature
/// as best-effort.
#[instrument(skip_all, fields(bytes_len = source.len(), max_pages))]
pub fn extract_leading_text(source: &[u8], max_pages: u32) -> Result<String, SveltoError> {
    let document = Document::load_mem(source).map_err(|err| {
        SveltoError::Parse(format!("failed to load PDF from memory: {}", err))
    })?;

    let pages = document.get_pages();
    if pages.is_empty() {
        return Err(SveltoError::Parse("document has no pages".to_string()));
    }

    let mut text = String::new();
    for page_number in pages.keys().copied().take(max_pages as usize) {
        match document.extract_text(&[page_number]) {
            Ok(page_text) => {
                let normalised = page_text.split_whitespace().collect::<Vec<_>>().join(" ");
                text.push_str(&format!("Page {}: {}\n", page_number, normalised));
            }
            Err(err) => {
                warn!(page_number, %err, "text extraction failed for page, skipping");
            }
        }
    }

    debug!(chars = text.len(), "leading text collected");
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Dictionary, Object, Stream, dictionary};

    /// Build a minimal text PDF with one page per entry in `pages`.
    fn text_pdf(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let mut kids: Vec<Object> = Vec::new();
        for page_text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![100.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*page_text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
                "Resources" => dictionary! {
                    "Font" => dictionary! { "F1" => font_id },
                },
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = pages.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn pages_are_prefixed_with_their_number() {
        let source = text_pdf(&["first page words", "second page words"]);
        let text = extract_leading_text(&source, 5).unwrap();

        assert!(text.contains("Page 1: first page words"), "got: {text}");
        assert!(text.contains("Page 2: second page words"), "got: {text}");
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn page_cap_is_honoured() {
        let source = text_pdf(&["one", "two", "three"]);
        let text = extract_leading_text(&source, 2).unwrap();

        assert!(text.contains("Page 1:"));
        assert!(text.contains("Page 2:"));
        assert!(!text.contains("Page 3:"));
    }

    #[test]
    fn invalid_bytes_are_a_parse_error() {
        let err = extract_leading_text(b"this is not a pdf", 5).unwrap_err();
        assert!(matches!(err, SveltoError::Parse(_)));
    }
}
