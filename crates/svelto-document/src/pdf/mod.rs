// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — source rasterisation, output assembly, and text extraction.

pub mod assembler;
pub mod renderer;
pub mod text;

pub use assembler::PdfAssembler;
pub use renderer::{PageRenderer, RasterFrame, SourceDocument};
