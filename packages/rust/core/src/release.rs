//! `release` pipeline: generate a fresh docset in a scratch directory and
//! package it.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{info, instrument, warn};

use docsetgen_artifacts::{PackageResult, ReleaseSpec, package_bundle};
use docsetgen_shared::{DocsetConfig, DocsetError, Result};

use crate::assembler::{validate_bundle, verify_lookup_table};
use crate::pipeline::{CorpusSource, GenerateConfig, GenerateResult, ProgressReporter, generate};

/// Configuration for the `release` pipeline.
#[derive(Debug, Clone)]
pub struct ReleaseConfig {
    /// Docset identity, sections and exclusions.
    pub docset: DocsetConfig,
    /// Directory receiving the archive, feed, metadata and link.
    pub output_dir: PathBuf,
    /// Version string.
    pub version: String,
    /// Primary download location.
    pub base_url: Option<String>,
    /// Additional download locations.
    pub mirrors: Vec<String>,
    /// Corpus location for the generation step.
    pub source: CorpusSource,
}

impl ReleaseConfig {
    fn spec(&self) -> ReleaseSpec {
        ReleaseSpec {
            name: self.docset.docset.name.clone(),
            version: self.version.clone(),
            base_url: self.base_url.clone(),
            mirrors: self.mirrors.clone(),
        }
    }
}

/// Result of the `release` pipeline.
#[derive(Debug, Clone)]
pub struct ReleaseResult {
    pub generated: GenerateResult,
    pub package: PackageResult,
    pub elapsed: Duration,
}

/// Generate, verify and package a docset release.
///
/// Generation happens under `<tmp>/docset-release-<uuid>`, which is removed
/// afterwards whether or not the run succeeded.
#[instrument(skip_all, fields(name = %config.docset.docset.name, version = %config.version))]
pub async fn build_release(
    config: &ReleaseConfig,
    progress: &dyn ProgressReporter,
) -> Result<ReleaseResult> {
    let start = Instant::now();
    std::fs::create_dir_all(&config.output_dir)
        .map_err(|e| DocsetError::io(&config.output_dir, e))?;

    let scratch = std::env::temp_dir().join(format!("docset-release-{}", uuid::Uuid::now_v7()));
    info!(scratch = %scratch.display(), "building release");

    let outcome = build_in(config, &scratch, progress).await;

    if scratch.exists() {
        if let Err(error) = std::fs::remove_dir_all(&scratch) {
            warn!(path = %scratch.display(), %error, "failed to remove scratch directory");
        }
    }

    let (generated, package) = outcome?;
    let result = ReleaseResult {
        generated,
        package,
        elapsed: start.elapsed(),
    };
    info!(
        archive = %result.package.archive_path.display(),
        size = %result.package.metadata.archive.size_human,
        elapsed_ms = result.elapsed.as_millis() as u64,
        "release built"
    );
    Ok(result)
}

async fn build_in(
    config: &ReleaseConfig,
    scratch: &Path,
    progress: &dyn ProgressReporter,
) -> Result<(GenerateResult, PackageResult)> {
    let generate_config = GenerateConfig {
        docset: config.docset.clone(),
        output_dir: scratch.join("docset"),
        work_dir: scratch.join("temp"),
        source: config.source.clone(),
    };
    let generated = generate(&generate_config, progress).await?;

    validate_bundle(&generated.bundle_path, &config.docset.docset.index_page)?;
    let entries = verify_lookup_table(&generated.bundle_path).await?;
    info!(entries, "bundle verified");

    progress.phase("Packaging release");
    let package = package_bundle(&generated.bundle_path, &config.spec(), &config.output_dir)?;
    Ok((generated, package))
}
