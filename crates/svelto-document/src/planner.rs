// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Budget planner — turns (page count, target size) into the single
// (scale, quality) pair used for every page of a run.
//
// The policy table is empirical: at 72 DPI an A4 page is roughly 595x842
// pixels, and a mixed text/graphics page at quality 0.6 lands around
// 50-100 KB. The thresholds below were tuned against that behaviour and are
// kept as-is.

use svelto_core::CompressionPlan;
use tracing::debug;

/// Fixed structural overhead every output document incurs, in bytes.
pub const BASE_OVERHEAD_BYTES: f64 = 5000.0;

/// Additional structural overhead per output page, in bytes.
pub const PER_PAGE_OVERHEAD_BYTES: f64 = 2000.0;

/// Per-page image budget above which the generous tier applies.
const GENEROUS_BUDGET: f64 = 300.0 * 1024.0;
/// Per-page image budget above which the standard tier applies.
const MODERATE_BUDGET: f64 = 100.0 * 1024.0;
/// Per-page image budget above which the reduced-resolution tier applies.
const TIGHT_BUDGET: f64 = 50.0 * 1024.0;

/// Legibility floors. The run will overshoot the target size rather than go
/// below these.
const MIN_SCALE: f32 = 0.4;
const MIN_QUALITY: f32 = 0.1;

/// Compute the compression plan for a run.
///
/// Pure function, no I/O. `page_count` must be at least 1 — the pipeline
/// rejects empty documents before planning. The per-page budget is what
/// remains of the target after estimated structural overhead, split evenly
/// across pages; the budget then selects a (scale, quality) tier using
/// strictly-greater-than comparisons at each threshold.
pub fn plan(page_count: u32, target_size_bytes: u64) -> CompressionPlan {
    let overhead = BASE_OVERHEAD_BYTES + page_count as f64 * PER_PAGE_OVERHEAD_BYTES;
    let available_for_images = (target_size_bytes as f64 - overhead).max(0.0);
    let budget_per_page = available_for_images / page_count as f64;

    let (scale, quality): (f32, f32) = if budget_per_page > GENEROUS_BUDGET {
        // Generous budget (>300 KB/page): good quality.
        (1.2, 0.8)
    } else if budget_per_page > MODERATE_BUDGET {
        // Moderate budget (100-300 KB/page): standard quality.
        (1.0, 0.6)
    } else if budget_per_page > TIGHT_BUDGET {
        // Tight budget (50-100 KB/page): reduced resolution.
        (0.8, 0.5)
    } else {
        // Very tight budget (<50 KB/page): aggressive compression.
        (0.6, 0.4)
    };

    let plan = CompressionPlan {
        scale: scale.max(MIN_SCALE),
        quality: quality.max(MIN_QUALITY),
    };

    debug!(
        page_count,
        target_size_bytes,
        budget_per_page_kb = (budget_per_page / 1024.0).round() as u64,
        scale = plan.scale,
        quality = plan.quality,
        "compression plan computed"
    );

    plan
}
