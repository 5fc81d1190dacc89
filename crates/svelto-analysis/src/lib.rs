// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// svelto-analysis — Optional document summarization for Svelto.
//
// Extracts the leading text of a source PDF and sends it to an external
// generative-language API. Strictly best-effort: runs alongside compression,
// shares no state with it, and its failures never touch the compression
// result.

pub mod summarizer;

pub use summarizer::{API_KEY_ENV, MAX_ANALYSIS_PAGES, Summarizer};
