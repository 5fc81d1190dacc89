// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use serde::{Deserialize, Serialize};

/// Application settings.
///
/// The summarizer API key is deliberately not part of this struct: it is a
/// process-lifetime capability read from the environment once at feature
/// entry, and its absence disables analysis without being an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default target output size in megabytes when none is given.
    pub default_target_mb: f64,
    /// Whether the analysis side channel may run at all.
    pub analysis_enabled: bool,
    /// How many leading pages feed the analysis text extraction.
    pub max_analysis_pages: u32,
    /// Paper size whose width fixes the output page width.
    pub output_paper: crate::PaperSize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_target_mb: 1.0,
            analysis_enabled: true,
            max_analysis_pages: 5,
            output_paper: crate::PaperSize::A4,
        }
    }
}
