// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Svelto.

use thiserror::Error;

/// Top-level error type for all Svelto operations.
///
/// A compression run fails with exactly one of the pipeline variants below;
/// there are no retries and no partial results, so the first sub-component
/// failure is the error the caller sees.
#[derive(Debug, Error)]
pub enum SveltoError {
    // -- Compression pipeline errors --
    #[error("PDF parsing failed: {0}")]
    Parse(String),

    #[error("page rendering failed: {0}")]
    Render(String),

    #[error("image encoding failed: {0}")]
    Encode(String),

    #[error("document assembly failed: {0}")]
    Assembly(String),

    // -- Analysis side channel --
    #[error("document analysis failed: {0}")]
    Analysis(String),

    // -- Integrity --
    #[error("integrity check failed: expected {expected}, got {actual}")]
    IntegrityMismatch { expected: String, actual: String },

    // -- Runtime --
    #[error("background task failed: {0}")]
    Task(String),

    // -- I/O and serialization --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SveltoError>;
