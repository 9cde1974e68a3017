//! Content collection: walks the corpus and groups markdown files into the
//! configured sections.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use docsetgen_shared::{ExclusionsConfig, Section, SectionConfig};

const MARKDOWN_EXTENSION: &str = "md";

/// Collect one [`Section`] per configured section, in configuration order.
///
/// A missing root or section directory yields an empty section. Files are
/// sorted by path; exclusions are applied here so excluded files never reach
/// rendering or indexing.
pub fn collect_sections(
    root: &Path,
    sections: &[SectionConfig],
    exclusions: &ExclusionsConfig,
) -> Vec<Section> {
    sections
        .iter()
        .map(|config| {
            let mut section = config.to_section();
            let dir = root.join(&config.dir);
            if dir.is_dir() {
                walk(&dir, exclusions, &mut section.files);
                section.files.sort();
            } else {
                debug!(section = %config.name, dir = %dir.display(), "section directory missing");
            }
            debug!(section = %section.name, files = section.files.len(), "collected section");
            section
        })
        .collect()
}

fn walk(dir: &Path, exclusions: &ExclusionsConfig, out: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(error) => {
            warn!(dir = %dir.display(), %error, "cannot read directory, skipping");
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();

        // `DirEntry::file_type` does not follow symlinks.
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_symlink() && path.is_dir() {
            debug!(path = %path.display(), "not following directory symlink");
            continue;
        }

        if file_type.is_dir() {
            if !exclusions.excludes_dir(&name) {
                walk(&path, exclusions, out);
            }
        } else if path.extension().is_some_and(|ext| ext == MARKDOWN_EXTENSION)
            && !exclusions.excludes_file(&name)
        {
            out.push(path);
        }
    }
}
