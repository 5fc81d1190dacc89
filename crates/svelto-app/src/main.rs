// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Svelto — size-targeted PDF recompression CLI.
//
// Entry point. Initialises logging, runs one compression job on a blocking
// thread (pdfium is synchronous), and lets the optional summarization task
// run concurrently on the async runtime.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};

use svelto_analysis::Summarizer;
use svelto_core::error::SveltoError;
use svelto_core::{AnalysisStatus, AppConfig, CompressionJob};
use svelto_document::{CompressionPipeline, integrity};

#[derive(Debug, Parser)]
#[command(name = "svelto", version, about = "Rebuild a PDF to an approximate target size")]
struct Args {
    /// Source PDF file.
    input: PathBuf,

    /// Output path. Defaults to the input path with a `.compressed.pdf`
    /// extension.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Target output size in megabytes. Approximate: the planner trades
    /// resolution and JPEG quality to get close, and never sacrifices
    /// legibility to hit a tiny target exactly.
    #[arg(short = 's', long, default_value_t = 1.0)]
    target_mb: f64,

    /// Skip the summarization side channel even if an API key is configured.
    #[arg(long)]
    no_analysis: bool,

    /// Print the finished job record as JSON on stdout.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "svelto failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), SveltoError> {
    if args.target_mb <= 0.0 {
        return Err(SveltoError::Parse(format!(
            "target size must be positive, got {} MB",
            args.target_mb
        )));
    }

    let config = AppConfig {
        default_target_mb: args.target_mb,
        analysis_enabled: !args.no_analysis,
        ..AppConfig::default()
    };

    let source = std::fs::read(&args.input)?;
    let document_name = args
        .input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.input.display().to_string());
    let target_bytes = (config.default_target_mb * 1024.0 * 1024.0) as u64;

    let mut job = CompressionJob::new(
        document_name,
        integrity::hash_bytes(&source),
        source.len() as u64,
        target_bytes,
    );
    info!(
        job = %job.id,
        document = %job.document_name,
        source_bytes = job.source_size,
        target_bytes,
        "job created"
    );

    // The analysis side channel runs concurrently with compression on its
    // own copy of the source bytes; its outcome never affects the run.
    let analysis_task = if !config.analysis_enabled {
        info!("analysis disabled by flag");
        None
    } else if let Some(summarizer) = Summarizer::from_env() {
        let bytes = source.clone();
        let max_pages = config.max_analysis_pages;
        Some(tokio::spawn(async move {
            summarizer.analyze(&bytes, max_pages).await
        }))
    } else {
        info!("no summary API key configured, skipping analysis");
        None
    };
    job.mark_analysis(if analysis_task.is_some() {
        AnalysisStatus::Analyzing
    } else {
        AnalysisStatus::Skipped
    });

    job.mark_processing();
    let compression = tokio::task::spawn_blocking(move || {
        let pipeline = CompressionPipeline::new()?;
        pipeline.compress(&source, target_bytes, |percent| {
            info!(percent, "compressing");
        })
    });

    let outcome = compression
        .await
        .map_err(|err| SveltoError::Task(format!("compression task aborted: {}", err)))?;

    let result = match outcome {
        Ok(result) => result,
        Err(err) => {
            job.mark_failed(err.to_string());
            if args.json {
                println!("{}", serde_json::to_string_pretty(&job)?);
            }
            return Err(err);
        }
    };

    let output_path = args
        .output
        .unwrap_or_else(|| args.input.with_extension("compressed.pdf"));
    std::fs::write(&output_path, &result.bytes)?;
    job.mark_completed(result.size as u64);

    info!(
        output = %output_path.display(),
        output_bytes = result.size,
        ratio = job.compression_ratio().unwrap_or(1.0),
        "compression complete"
    );

    if let Some(task) = analysis_task {
        match task.await {
            Ok(Ok(summary)) => {
                job.mark_analysis(AnalysisStatus::Completed);
                println!("{summary}");
            }
            Ok(Err(err)) => {
                job.mark_analysis(AnalysisStatus::Error);
                warn!(error = %err, "analysis failed; compression result unaffected");
            }
            Err(err) => {
                job.mark_analysis(AnalysisStatus::Error);
                warn!(error = %err, "analysis task aborted; compression result unaffected");
            }
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&job)?);
    }

    Ok(())
}
