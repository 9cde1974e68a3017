//! End-to-end `generate` pipeline: corpus → collect → render → assemble → docset.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{info, instrument, warn};

use docsetgen_shared::{DocsetConfig, Result};

use crate::assembler::{self, AssembleConfig};
use crate::collector::collect_sections;
use crate::fetch::fetch_corpus;
use crate::html::render_tree;

/// Where the markdown corpus comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorpusSource {
    /// Shallow-clone the configured repository into the work directory.
    Clone,
    /// Reuse a checkout already present in the work directory.
    Existing,
    /// Use a local directory as the corpus root.
    Local(PathBuf),
}

/// Configuration for the `generate` pipeline.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Docset identity, sections and exclusions.
    pub docset: DocsetConfig,
    /// Directory the bundle is written into.
    pub output_dir: PathBuf,
    /// Scratch directory for the checkout and the HTML tree.
    pub work_dir: PathBuf,
    /// Corpus location.
    pub source: CorpusSource,
}

impl GenerateConfig {
    /// Directory the corpus is read from.
    pub fn corpus_root(&self) -> PathBuf {
        match &self.source {
            CorpusSource::Clone | CorpusSource::Existing => {
                self.work_dir.join(self.docset.corpus_dir_name())
            }
            CorpusSource::Local(path) => path.clone(),
        }
    }

    /// Directory the HTML tree is rendered into.
    pub fn html_dir(&self) -> PathBuf {
        self.work_dir.join("html")
    }
}

/// Result of the `generate` pipeline.
#[derive(Debug, Clone)]
pub struct GenerateResult {
    /// Path to the assembled bundle.
    pub bundle_path: PathBuf,
    /// Markdown files found after exclusions.
    pub collected: usize,
    /// Pages written to the bundle.
    pub rendered: usize,
    /// Files skipped because they failed to render or collided.
    pub skipped: usize,
    /// Rows in the lookup table.
    pub records: usize,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each page is written.
    fn page_rendered(&self, path: &str, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, result: &GenerateResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn page_rendered(&self, _path: &str, _current: usize, _total: usize) {}
    fn done(&self, _result: &GenerateResult) {}
}

/// Run the full `generate` pipeline.
///
/// 1. Fetch the corpus (unless reusing or pointing at a local tree)
/// 2. Collect sections
/// 3. Render the HTML tree and index page
/// 4. Assemble the bundle and build its lookup table
#[instrument(skip_all, fields(name = %config.docset.docset.name, output = %config.output_dir.display()))]
pub async fn generate(
    config: &GenerateConfig,
    progress: &dyn ProgressReporter,
) -> Result<GenerateResult> {
    let start = Instant::now();
    let corpus_root = config.corpus_root();

    // --- Phase 1: Corpus ---
    match &config.source {
        CorpusSource::Clone => {
            progress.phase("Cloning documentation repository");
            fetch_corpus(&config.docset.docset.repo_url, &corpus_root)?;
        }
        CorpusSource::Existing | CorpusSource::Local(_) => {
            if !corpus_root.is_dir() {
                warn!(corpus = %corpus_root.display(), "corpus directory does not exist");
            }
        }
    }

    // --- Phase 2: Collect ---
    progress.phase("Collecting markdown files");
    let sections = collect_sections(
        &corpus_root,
        &config.docset.sections,
        &config.docset.exclusions,
    );
    let collected: usize = sections.iter().map(|s| s.files.len()).sum();
    info!(files = collected, corpus = %corpus_root.display(), "found markdown files");

    // --- Phase 3: Render ---
    progress.phase("Rendering HTML");
    let tree = render_tree(
        &corpus_root,
        &sections,
        &config.html_dir(),
        &config.docset.docset.title,
        progress,
    )?;

    // --- Phase 4: Assemble ---
    progress.phase("Assembling docset");
    let assembled = assembler::assemble(
        &AssembleConfig {
            meta: &config.docset.docset,
            output_dir: &config.output_dir,
            html_root: &tree.root,
            corpus_root: &corpus_root,
        },
        &tree.index_records(),
    )
    .await?;

    let result = GenerateResult {
        bundle_path: assembled.bundle_path,
        collected,
        rendered: tree.rendered(),
        skipped: tree.skipped,
        records: assembled.record_count,
        elapsed: start.elapsed(),
    };

    info!(
        bundle = %result.bundle_path.display(),
        rendered = result.rendered,
        skipped = result.skipped,
        records = result.records,
        elapsed_ms = result.elapsed.as_millis() as u64,
        "docset generated"
    );
    progress.done(&result);

    Ok(result)
}

/// Remove a scratch directory unless it is also the output directory.
pub fn cleanup_work_dir(work_dir: &Path, output_dir: &Path) {
    if !work_dir.exists() || same_dir(work_dir, output_dir) {
        return;
    }
    if let Err(error) = std::fs::remove_dir_all(work_dir) {
        warn!(path = %work_dir.display(), %error, "failed to remove work directory");
    } else {
        info!(path = %work_dir.display(), "removed work directory");
    }
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
