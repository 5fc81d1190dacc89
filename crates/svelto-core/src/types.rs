// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Svelto PDF compressor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a compression job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle states of a compression run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompressionStatus {
    /// Created, not started yet.
    Idle,
    /// Pages are being rendered and re-encoded.
    Processing,
    /// Output bytes produced.
    Completed,
    /// Compression failed — see the job error field.
    Error,
}

/// Lifecycle states of the optional analysis side channel.
///
/// Analysis runs independently of compression; its failure never affects the
/// compression status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisStatus {
    Idle,
    Analyzing,
    Completed,
    Error,
    /// No API key configured — the feature was never attempted.
    Skipped,
}

/// Standard paper sizes for output pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A5,
    Letter,
}

impl PaperSize {
    /// Dimensions in millimetres (width, height), portrait orientation.
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
        }
    }
}

/// The single (scale, quality) decision for one compression run.
///
/// Computed once from the page count and the byte target, then applied
/// uniformly to every page — there is no per-page re-planning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompressionPlan {
    /// Render scale; 1.0 is the page's native size at 72 DPI.
    pub scale: f32,
    /// JPEG quality factor in (0, 1].
    pub quality: f32,
}

/// Final output of a compression run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionResult {
    /// The serialised output document — a complete, standalone PDF.
    pub bytes: Vec<u8>,
    /// True post-hoc size of `bytes`. The target is approximate; this is
    /// what actually came out.
    pub size: usize,
}

impl CompressionResult {
    pub fn new(bytes: Vec<u8>) -> Self {
        let size = bytes.len();
        Self { bytes, size }
    }

    /// Achieved size as a fraction of the original (e.g. 0.25 = quartered).
    pub fn ratio(&self, original_size: u64) -> f64 {
        if original_size == 0 {
            return 1.0;
        }
        self.size as f64 / original_size as f64
    }
}

/// A complete compression job as tracked by the application layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionJob {
    pub id: JobId,
    pub document_name: String,
    /// SHA-256 hash of the source document bytes.
    pub document_hash: String,
    pub source_size: u64,
    pub target_size: u64,
    pub status: CompressionStatus,
    pub analysis: AnalysisStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub output_size: Option<u64>,
    pub error_message: Option<String>,
}

impl CompressionJob {
    pub fn new(
        document_name: String,
        document_hash: String,
        source_size: u64,
        target_size: u64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            document_name,
            document_hash,
            source_size,
            target_size,
            status: CompressionStatus::Idle,
            analysis: AnalysisStatus::Idle,
            created_at: now,
            updated_at: now,
            output_size: None,
            error_message: None,
        }
    }

    pub fn mark_processing(&mut self) {
        self.status = CompressionStatus::Processing;
        self.touch();
    }

    pub fn mark_completed(&mut self, output_size: u64) {
        self.status = CompressionStatus::Completed;
        self.output_size = Some(output_size);
        self.touch();
    }

    pub fn mark_failed(&mut self, message: impl Into<String>) {
        self.status = CompressionStatus::Error;
        self.error_message = Some(message.into());
        self.touch();
    }

    pub fn mark_analysis(&mut self, analysis: AnalysisStatus) {
        self.analysis = analysis;
        self.touch();
    }

    /// Output size as a fraction of the source, once completed.
    pub fn compression_ratio(&self) -> Option<f64> {
        let output = self.output_size? as f64;
        if self.source_size == 0 {
            return None;
        }
        Some(output / self.source_size as f64)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
