//! Docset bundle assembler.
//!
//! Takes the rendered HTML tree and its index records, then writes the final
//! `<Name>.docset` bundle to disk.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use docsetgen_shared::{DocsetError, DocsetMeta, IndexRecord, Result, escape_html};
use docsetgen_storage::{INDEX_FILE_NAME, SearchIndex};

/// Output from a successful bundle assembly.
#[derive(Debug, Clone)]
pub struct AssembleResult {
    /// Path to the `<Name>.docset` directory.
    pub bundle_path: PathBuf,
    /// Path to the lookup table inside the bundle.
    pub index_path: PathBuf,
    /// Rows actually stored (duplicates dropped).
    pub record_count: usize,
}

/// Inputs for bundle assembly.
#[derive(Debug, Clone)]
pub struct AssembleConfig<'a> {
    /// Docset identity written to `Info.plist`.
    pub meta: &'a DocsetMeta,
    /// Directory the bundle is created in.
    pub output_dir: &'a Path,
    /// Rendered HTML tree, copied into `Documents/`.
    pub html_root: &'a Path,
    /// Corpus root, searched for the icon.
    pub corpus_root: &'a Path,
}

/// Assemble a complete docset bundle.
///
/// Creates the following layout, removing any previous bundle first:
/// ```text
/// <output_dir>/<Name>.docset/
/// ├── icon.png            (if the corpus has one)
/// └── Contents/
///     ├── Info.plist
///     └── Resources/
///         ├── docSet.dsidx
///         └── Documents/
///             ├── index.html
///             └── <section>/...
/// ```
#[instrument(skip_all, fields(name = %config.meta.name, records = records.len()))]
pub async fn assemble(config: &AssembleConfig<'_>, records: &[IndexRecord]) -> Result<AssembleResult> {
    let bundle = config
        .output_dir
        .join(format!("{}.docset", config.meta.name));

    info!(path = %bundle.display(), "assembling docset bundle");

    if bundle.exists() {
        debug!("removing previous bundle");
        std::fs::remove_dir_all(&bundle).map_err(|e| DocsetError::io(&bundle, e))?;
    }

    let contents = bundle.join("Contents");
    let resources = contents.join("Resources");
    let documents = resources.join("Documents");
    std::fs::create_dir_all(&documents).map_err(|e| DocsetError::io(&documents, e))?;

    let plist = contents.join("Info.plist");
    std::fs::write(&plist, info_plist(config.meta)).map_err(|e| DocsetError::io(&plist, e))?;

    copy_tree(config.html_root, &documents)?;

    let icon = config.corpus_root.join(&config.meta.icon);
    if icon.is_file() {
        let target = bundle.join(&config.meta.icon);
        std::fs::copy(&icon, &target).map_err(|e| DocsetError::io(&target, e))?;
        debug!(icon = %icon.display(), "copied icon");
    }

    let index_path = resources.join(INDEX_FILE_NAME);
    let index = SearchIndex::create(&index_path).await?;
    let inserted = index.insert_all(records).await?;
    let record_count = index.count().await?;
    debug!(inserted, offered = records.len(), "lookup table populated");

    info!(
        path = %bundle.display(),
        record_count,
        "docset bundle complete"
    );

    Ok(AssembleResult {
        bundle_path: bundle,
        index_path,
        record_count,
    })
}

/// Verify that a bundle directory is well-formed.
pub fn validate_bundle(bundle: &Path, index_page: &str) -> Result<()> {
    if !bundle.is_dir() {
        return Err(DocsetError::validation(format!(
            "docset not found at {}",
            bundle.display()
        )));
    }

    let contents = bundle.join("Contents");
    let required = [
        contents.join("Info.plist"),
        contents.join("Resources").join(INDEX_FILE_NAME),
        contents.join("Resources").join("Documents").join(index_page),
    ];
    for path in &required {
        if !path.is_file() {
            return Err(DocsetError::validation(format!(
                "docset is missing {}",
                path.strip_prefix(bundle).unwrap_or(path).display()
            )));
        }
    }
    Ok(())
}

/// Check that every lookup-table row points at a page inside the bundle.
/// Returns the number of rows.
pub async fn verify_lookup_table(bundle: &Path) -> Result<usize> {
    let resources = bundle.join("Contents").join("Resources");
    let index = SearchIndex::open(&resources.join(INDEX_FILE_NAME)).await?;
    let documents = resources.join("Documents");

    let records = index.records().await?;
    if let Some(missing) = records.iter().find(|r| !documents.join(&r.path).is_file()) {
        return Err(DocsetError::validation(format!(
            "lookup entry '{}' points at missing page {}",
            missing.name, missing.path
        )));
    }
    Ok(records.len())
}

/// Render the bundle manifest.
pub fn info_plist(meta: &DocsetMeta) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>CFBundleIdentifier</key>
    <string>{}</string>
    <key>CFBundleName</key>
    <string>{}</string>
    <key>DocSetPlatformFamily</key>
    <string>{}</string>
    <key>isDashDocset</key>
    <true/>
    <key>dashIndexFilePath</key>
    <string>{}</string>
    <key>DashDocSetFallbackURL</key>
    <string>{}</string>
</dict>
</plist>"#,
        escape_html(&meta.bundle_id),
        escape_html(&meta.name),
        escape_html(&meta.platform_family),
        escape_html(&meta.index_page),
        escape_html(&meta.fallback_url),
    )
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Recursively copy `src` into `dst`, preserving structure.
fn copy_tree(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst).map_err(|e| DocsetError::io(dst, e))?;

    for entry in std::fs::read_dir(src).map_err(|e| DocsetError::io(src, e))? {
        let entry = entry.map_err(|e| DocsetError::io(src, e))?;
        let from = entry.path();
        let to = dst.join(entry.file_name());
        if from.is_dir() {
            copy_tree(&from, &to)?;
        } else {
            std::fs::copy(&from, &to).map_err(|e| DocsetError::io(&from, e))?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
