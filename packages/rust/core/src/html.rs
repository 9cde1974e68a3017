//! HTML tree generation: one page per collected source file plus the
//! navigation `index.html`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use docsetgen_markdown::{NavSection, index_page, render_page, title_from_content};
use docsetgen_shared::{
    DocsetError, DocumentEntry, IndexRecord, Result, Section, section_slug, target_html_path,
};

use crate::pipeline::ProgressReporter;

/// Name of the generated navigation page at the tree root.
pub const INDEX_PAGE: &str = "index.html";

/// Pages successfully rendered for one section.
#[derive(Debug, Clone)]
pub struct RenderedSection {
    pub name: String,
    pub entries: Vec<DocumentEntry>,
}

/// Result of rendering the whole corpus.
#[derive(Debug, Clone)]
pub struct HtmlTree {
    /// Root directory of the tree (`index.html` lives here).
    pub root: PathBuf,
    /// Non-empty sections in configuration order.
    pub sections: Vec<RenderedSection>,
    /// Files that were collected but not rendered.
    pub skipped: usize,
}

impl HtmlTree {
    /// Every rendered entry, section by section.
    pub fn entries(&self) -> impl Iterator<Item = &DocumentEntry> {
        self.sections.iter().flat_map(|s| s.entries.iter())
    }

    pub fn rendered(&self) -> usize {
        self.sections.iter().map(|s| s.entries.len()).sum()
    }

    /// Lookup-table rows for the rendered entries. Built from the same list
    /// as the navigation page.
    pub fn index_records(&self) -> Vec<IndexRecord> {
        self.entries().map(DocumentEntry::index_record).collect()
    }
}

/// Render every file of `sections` into `html_root` and write the navigation
/// page. Any previous tree at `html_root` is removed first.
///
/// A file that cannot be read or written is skipped with a warning, as is a
/// file whose target path was already taken by an earlier file.
#[instrument(skip_all, fields(root = %html_root.display()))]
pub fn render_tree(
    corpus_root: &Path,
    sections: &[Section],
    html_root: &Path,
    doc_title: &str,
    progress: &dyn ProgressReporter,
) -> Result<HtmlTree> {
    if html_root.exists() {
        std::fs::remove_dir_all(html_root).map_err(|e| DocsetError::io(html_root, e))?;
    }
    std::fs::create_dir_all(html_root).map_err(|e| DocsetError::io(html_root, e))?;

    let total: usize = sections.iter().map(|s| s.files.len()).sum();
    let mut current = 0;
    let mut skipped = 0;
    let mut taken = HashSet::new();
    let mut rendered = Vec::new();

    for section in sections.iter().filter(|s| !s.is_empty()) {
        let slug = section_slug(&section.name);
        let mut entries = Vec::with_capacity(section.files.len());

        for source in &section.files {
            current += 1;
            let relative = source.strip_prefix(corpus_root).unwrap_or(source);
            let html_path = target_html_path(&slug, relative);

            if !taken.insert(html_path.clone()) {
                warn!(
                    source = %source.display(),
                    html_path,
                    "target path already produced by another file, skipping"
                );
                skipped += 1;
                continue;
            }

            let entry = DocumentEntry {
                source_path: source.clone(),
                relative_path: relative.to_path_buf(),
                title: String::new(),
                html_path,
                entry_type: section.entry_type,
            };

            match render_file(entry, html_root) {
                Ok(entry) => {
                    progress.page_rendered(&entry.html_path, current, total);
                    entries.push(entry);
                }
                Err(error) => {
                    warn!(source = %source.display(), %error, "failed to render page, skipping");
                    skipped += 1;
                }
            }
        }

        if entries.is_empty() {
            debug!(section = %section.name, "no pages rendered, omitting section");
            continue;
        }
        rendered.push(RenderedSection {
            name: section.name.clone(),
            entries,
        });
    }

    let nav: Vec<_> = rendered
        .iter()
        .map(|s| NavSection {
            name: &s.name,
            entries: &s.entries,
        })
        .collect();
    let index_path = html_root.join(INDEX_PAGE);
    std::fs::write(&index_path, index_page(doc_title, &nav))
        .map_err(|e| DocsetError::io(&index_path, e))?;

    let tree = HtmlTree {
        root: html_root.to_path_buf(),
        sections: rendered,
        skipped,
    };
    info!(rendered = tree.rendered(), skipped, "HTML tree written");
    Ok(tree)
}

/// Read, title and render a single source, filling in `entry.title`.
fn render_file(mut entry: DocumentEntry, html_root: &Path) -> Result<DocumentEntry> {
    let bytes = std::fs::read(&entry.source_path).map_err(|e| DocsetError::io(&entry.source_path, e))?;
    let source = String::from_utf8(bytes).map_err(|e| {
        DocsetError::Render(format!("{} is not valid UTF-8: {e}", entry.source_path.display()))
    })?;

    entry.title = title_from_content(&source, &entry.source_path);
    let page = render_page(&source, &entry.title);

    let target = html_root.join(&entry.html_path);
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(|e| DocsetError::io(parent, e))?;
    }
    std::fs::write(&target, page).map_err(|e| DocsetError::io(&target, e))?;

    debug!(title = %entry.title, path = %entry.html_path, "rendered page");
    Ok(entry)
}
