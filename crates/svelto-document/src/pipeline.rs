// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Compression pipeline — the sole entry point for a compression run.
//
// One run: parse the source, compute a single plan, then strictly
// sequentially render -> encode -> append each page, reporting progress at
// page boundaries. Pages are never processed out of order or in parallel
// (pdfium is not reentrant across pages), and a failure on any page aborts
// the run with no partial output.

use svelto_core::error::SveltoError;
use svelto_core::{CompressionResult, PaperSize};
use tracing::{info, instrument};

use crate::pdf::assembler::PdfAssembler;
use crate::pdf::renderer::PageRenderer;
use crate::{image::encoder, planner};

/// Drives one or more compression runs against a bound renderer.
///
/// Independent runs share no mutable state; a single run owns all of its
/// intermediates (source document, frames, encoded images, assembler) and
/// drops them when it returns, on success and failure alike.
pub struct CompressionPipeline {
    renderer: PageRenderer,
}

impl CompressionPipeline {
    /// Acquire the rendering backend.
    pub fn new() -> Result<Self, SveltoError> {
        Ok(Self {
            renderer: PageRenderer::new()?,
        })
    }

    /// Compress `source` towards `target_size_bytes`.
    ///
    /// `on_progress` receives integer percentages: 0 before the first page,
    /// one tick per page boundary, and exactly 100 at the end of a
    /// successful run — N+1 monotonically non-decreasing calls for an N-page
    /// document. It is not called at all when parsing fails.
    #[instrument(skip_all, fields(source_len = source.len(), target_size_bytes))]
    pub fn compress<F>(
        &self,
        source: &[u8],
        target_size_bytes: u64,
        mut on_progress: F,
    ) -> Result<CompressionResult, SveltoError>
    where
        F: FnMut(u8),
    {
        let document = self.renderer.open(source)?;
        let page_count = document.page_count();
        if page_count == 0 {
            return Err(SveltoError::Parse("document has no pages".to_string()));
        }

        let plan = planner::plan(page_count, target_size_bytes);
        info!(
            page_count,
            target_size_bytes,
            scale = plan.scale,
            quality = plan.quality,
            "starting compression run"
        );

        let page_width_mm = PaperSize::A4.dimensions_mm().0 as f64;
        let mut assembler = PdfAssembler::new(page_width_mm);

        for index in 0..page_count {
            on_progress(progress_percent(index, page_count));

            let frame = document.render_page(index, plan.scale)?;
            let image = encoder::encode_frame(&frame, plan.quality)?;
            assembler.append_page(&image)?;
        }

        on_progress(100);

        let result = CompressionResult::new(assembler.finish()?);
        info!(
            output_bytes = result.size,
            achieved_ratio = result.ratio(source.len() as u64),
            "compression run complete"
        );
        Ok(result)
    }
}

/// Percentage reported before processing page `completed + 1` of `total`.
fn progress_percent(completed: u32, total: u32) -> u8 {
    ((completed as f64 / total as f64) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::encoder::encode_frame;
    use crate::pdf::renderer::RasterFrame;
    use image::RgbImage;

    #[test]
    fn progress_sequence_matches_contract() {
        let ticks: Vec<u8> = (0..4).map(|done| progress_percent(done, 4)).collect();
        assert_eq!(ticks, vec![0, 25, 50, 75]);
    }

    #[test]
    fn progress_rounds_to_nearest_percent() {
        assert_eq!(progress_percent(0, 3), 0);
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 67);
    }

    // The tests below exercise the full pipeline and need a pdfium library
    // at runtime; environments without one skip them.
    fn pipeline_or_skip() -> Option<CompressionPipeline> {
        match CompressionPipeline::new() {
            Ok(pipeline) => Some(pipeline),
            Err(err) => {
                eprintln!("pdfium unavailable, skipping pipeline test: {err}");
                None
            }
        }
    }

    /// A small raster-page source document built with our own assembler.
    fn source_pdf(pages: u32) -> Vec<u8> {
        let mut assembler = PdfAssembler::new(210.0);
        for _ in 0..pages {
            let frame = RasterFrame::from_rgb(RgbImage::from_fn(200, 283, |x, y| {
                image::Rgb([(x % 256) as u8, (y % 256) as u8, 140])
            }));
            let image = encode_frame(&frame, 0.8).unwrap();
            assembler.append_page(&image).unwrap();
        }
        assembler.finish().unwrap()
    }

    #[test]
    fn invalid_bytes_fail_parsing_without_progress() {
        let Some(pipeline) = pipeline_or_skip() else {
            return;
        };

        let mut ticks: Vec<u8> = Vec::new();
        let err = pipeline
            .compress(b"not a pdf at all", 1 << 20, |p| ticks.push(p))
            .unwrap_err();
        assert!(matches!(err, SveltoError::Parse(_)));
        assert!(ticks.is_empty(), "progress reported before parse: {ticks:?}");
    }

    #[test]
    fn two_page_run_reports_three_ticks_and_returns_a_pdf() {
        let Some(pipeline) = pipeline_or_skip() else {
            return;
        };

        let source = source_pdf(2);
        let mut ticks: Vec<u8> = Vec::new();
        let result = pipeline
            .compress(&source, 5 * 1024 * 1024, |p| ticks.push(p))
            .unwrap();

        assert_eq!(ticks, vec![0, 50, 100]);
        assert!(result.bytes.starts_with(b"%PDF-"));
        assert_eq!(result.size, result.bytes.len());

        let reloaded = lopdf::Document::load_mem(&result.bytes).unwrap();
        assert_eq!(reloaded.get_pages().len(), 2);
    }

    #[test]
    fn recompressing_an_output_does_not_error() {
        let Some(pipeline) = pipeline_or_skip() else {
            return;
        };

        let source = source_pdf(1);
        let first = pipeline.compress(&source, 1 << 20, |_| {}).unwrap();
        let second = pipeline
            .compress(&first.bytes, 8 * 1024 * 1024, |_| {})
            .unwrap();
        assert!(second.bytes.starts_with(b"%PDF-"));
    }
}
