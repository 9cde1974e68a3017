//! Display-title extraction for source pages.
//!
//! Priority: front-matter `title:`, then the first level-1 heading, then a
//! title derived from the file name. Extraction never fails.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::frontmatter::front_matter_title;

/// Title used when even the file name yields nothing.
const UNTITLED: &str = "Untitled";

/// Read `path` and extract its display title.
///
/// Read or UTF-8 decoding failures are logged and fall back to the
/// file-name title.
pub fn extract_title(path: &Path) -> String {
    let content = std::fs::read(path)
        .map_err(|e| e.to_string())
        .and_then(|bytes| String::from_utf8(bytes).map_err(|e| e.to_string()));

    match content {
        Ok(content) => title_from_content(&content, path),
        Err(error) => {
            warn!(path = %path.display(), %error, "could not extract title, using file name");
            filename_title(path)
        }
    }
}

/// Extract the title from already-loaded content.
pub fn title_from_content(content: &str, path: &Path) -> String {
    front_matter_title(content)
        .or_else(|| heading_title(content))
        .unwrap_or_else(|| filename_title(path))
}

/// Text of the first `# heading` line.
pub fn heading_title(content: &str) -> Option<String> {
    static H1_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?m)^#[ \t]+(.+)$").expect("valid regex"));

    H1_RE
        .captures_iter(content)
        .map(|c| c[1].trim().to_string())
        .find(|t| !t.is_empty())
}

/// `getting_started.md` → `Getting Started`.
pub fn filename_title(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().replace('_', " "))
        .unwrap_or_default();

    let title = title_case(stem.trim());
    if title.is_empty() {
        UNTITLED.to_string()
    } else {
        title
    }
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}
