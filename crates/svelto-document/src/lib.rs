// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// svelto-document — The compression core of Svelto.
//
// Provides the byte-budget planner, page rasterisation (pdfium), JPEG
// re-encoding, output PDF assembly, the pipeline that orchestrates them, and
// the text extraction feeding the analysis side channel.

pub mod image;
pub mod integrity;
pub mod pdf;
pub mod pipeline;
pub mod planner;

// Re-export the primary types so callers can use `svelto_document::CompressionPipeline` etc.
pub use image::encoder::EncodedImage;
pub use pdf::assembler::PdfAssembler;
pub use pdf::renderer::{PageRenderer, RasterFrame, SourceDocument};
pub use pipeline::CompressionPipeline;
